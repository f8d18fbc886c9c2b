//! API request helpers

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::extract::Json;
use axum::extract::Path;
use axum::extract::Request;
use axum::extract::rejection::FormRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::forms::RawFields;
use crate::forms::Values;
use crate::forms::to_raw_fields;

use super::Error;

const APPLICATION_JSON: &str = "application/json";

fn parse_json<J>(json: Result<Json<J>, JsonRejection>) -> Result<J, Error> {
    match json {
        Ok(Json(json)) => Ok(json),
        Err(err) => match err {
            JsonRejection::JsonDataError(err) => {
                Err(Error::bad_request("Data error").with_description(err))
            }
            JsonRejection::JsonSyntaxError(err) => {
                let description = std::error::Error::source(&err)
                    .map_or_else(|| err.body_text(), |source| source.to_string());

                Err(Error::bad_request("JSON syntax error").with_description(description))
            }
            JsonRejection::MissingJsonContentType(_err) => Err(Error::bad_request(
                "Missing `application/json` content type",
            )),
            JsonRejection::BytesRejection(err) => {
                Err(Error::bad_request("Invalid characters in JSON").with_description(err))
            }
            err => Err(Error::bad_request("Unknown JSON error").with_description(err)),
        },
    }
}

/// Wrapper for the JSON extractor
pub struct Form<F>(pub F);

impl<S, F> FromRequest<S> for Form<F>
where
    S: Send + Sync,
    F: DeserializeOwned,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        parse_json(Json::<F>::from_request(req, state).await).map(Form)
    }
}

fn parse_form(form: Result<axum::Form<RawFields>, FormRejection>) -> Result<RawFields, Error> {
    match form {
        Ok(axum::Form(fields)) => Ok(fields),
        Err(err) => match err {
            FormRejection::InvalidFormContentType(_err) => Err(Error::bad_request(
                "Missing `application/x-www-form-urlencoded` content type",
            )),
            FormRejection::FailedToDeserializeForm(err) => {
                Err(Error::bad_request("Invalid form data").with_description(err))
            }
            FormRejection::FailedToDeserializeFormBody(err) => {
                Err(Error::bad_request("Invalid form data").with_description(err))
            }
            err => Err(Error::bad_request("Unknown form error").with_description(err)),
        },
    }
}

/// Raw fields of a submitted entity form
///
/// Accepts url-encoded forms, as sent by browsers, and flat JSON objects. JSON scalars are turned
/// into strings, so both end up in the same validation.
pub struct RawForm(pub RawFields);

impl<S> FromRequest<S> for RawForm
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|content_type| content_type.to_str().ok())
            .is_some_and(|content_type| content_type.starts_with(APPLICATION_JSON));

        if is_json {
            let values = parse_json(Json::<Values>::from_request(req, state).await)?;

            Ok(RawForm(to_raw_fields(&values)))
        } else {
            parse_form(axum::Form::<RawFields>::from_request(req, state).await).map(RawForm)
        }
    }
}

fn parse_path<P>(path: Result<Path<P>, PathRejection>) -> Result<P, Error> {
    match path {
        Ok(Path(path)) => Ok(path),
        Err(err) => match err {
            PathRejection::FailedToDeserializePathParams(err) => {
                Err(Error::bad_request("Invalid path parameter").with_description(err))
            }
            PathRejection::MissingPathParams(err) => {
                Err(Error::bad_request("Missing path parameter").with_description(err))
            }
            err => Err(Error::bad_request("Unknown path error").with_description(err)),
        },
    }
}

/// Wrapper for the path extractor
pub struct PathParameters<P>(pub P);

impl<S, P> FromRequestParts<S> for PathParameters<P>
where
    S: Send + Sync,
    P: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        parse_path(Path::<P>::from_request_parts(parts, state).await).map(PathParameters)
    }
}
