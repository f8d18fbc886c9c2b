//! Form schemas and validation
//!
//! Every entity kind declares its form as a [`Schema`]: a list of fields, each with a type, a
//! required flag and the constraints of that type. Validation turns the raw submitted strings
//! into typed JSON values, or into a map of field errors.

use std::collections::BTreeMap;
use std::collections::HashMap;

use chrono::NaiveDate;
use chrono::NaiveTime;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use url::Url;

/// Fields as submitted, before validation
pub type RawFields = HashMap<String, String>;

/// Typed values after validation, keyed by field name
pub type Values = Map<String, Value>;

const REQUIRED: &str = "This field is required.";
const INVALID_CHOICE: &str = "Not a valid choice.";
const INVALID_INTEGER: &str = "Not a valid integer value.";
const INVALID_DATE: &str = "Not a valid date value.";
const INVALID_TIME: &str = "Not a valid time value.";
const INVALID_EMAIL: &str = "Invalid email address.";
const INVALID_URL: &str = "Invalid URL.";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const SHORT_TIME_FORMAT: &str = "%H:%M";

/// Type of a form field, with the constraints of that type
#[derive(Clone, Copy, Debug)]
pub enum FieldKind {
    /// Free text
    Text,

    /// One of a fixed set of strings
    Choice(&'static [&'static str]),

    /// One of a fixed set of numbers, stored as an integer
    NumberChoice(&'static [&'static str]),

    /// Whole number within an inclusive range
    Integer { min: i64, max: i64 },

    /// `true` or `false`
    Boolean,

    /// Calendar date, `YYYY-MM-DD`
    Date,

    /// Time of day, `HH:MM` or `HH:MM:SS`
    Time,

    /// E-mail address
    Email,

    /// Absolute URL
    Url,
}

impl FieldKind {
    fn name(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Choice(_) | FieldKind::NumberChoice(_) => "choice",
            FieldKind::Integer { .. } => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::Email => "email",
            FieldKind::Url => "url",
        }
    }

    /// Message for a required value that is missing
    ///
    /// A missing number can not be parsed as one
    fn missing(self) -> &'static str {
        match self {
            FieldKind::Integer { .. } => INVALID_INTEGER,
            _ => REQUIRED,
        }
    }

    /// Parse a trimmed, non-empty raw value
    fn parse(self, raw: &str) -> Result<Value, String> {
        match self {
            FieldKind::Text => Ok(Value::String(raw.to_string())),
            FieldKind::Choice(choices) => {
                if choices.contains(&raw) {
                    Ok(Value::String(raw.to_string()))
                } else {
                    Err(INVALID_CHOICE.to_string())
                }
            }
            FieldKind::NumberChoice(choices) => {
                if choices.contains(&raw) {
                    raw.parse::<i64>()
                        .map(Value::from)
                        .map_err(|_| INVALID_CHOICE.to_string())
                } else {
                    Err(INVALID_CHOICE.to_string())
                }
            }
            FieldKind::Integer { min, max } => {
                let number = raw
                    .parse::<i64>()
                    .map_err(|_| INVALID_INTEGER.to_string())?;

                if (min..=max).contains(&number) {
                    Ok(Value::from(number))
                } else {
                    Err(format!("Enter a number between {min} and {max}."))
                }
            }
            FieldKind::Boolean => {
                if raw.eq_ignore_ascii_case("true") {
                    Ok(Value::Bool(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Ok(Value::Bool(false))
                } else {
                    Err(INVALID_CHOICE.to_string())
                }
            }
            FieldKind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map(|date| Value::String(date.format(DATE_FORMAT).to_string()))
                .map_err(|_| INVALID_DATE.to_string()),
            FieldKind::Time => NaiveTime::parse_from_str(raw, TIME_FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(raw, SHORT_TIME_FORMAT))
                .map(|time| Value::String(time.format(TIME_FORMAT).to_string()))
                .map_err(|_| INVALID_TIME.to_string()),
            FieldKind::Email => {
                if validator::validate_email(raw) {
                    Ok(Value::String(raw.to_string()))
                } else {
                    Err(INVALID_EMAIL.to_string())
                }
            }
            FieldKind::Url => Url::parse(raw)
                .ok()
                .filter(Url::has_host)
                .map(|url| Value::String(url.to_string()))
                .ok_or_else(|| INVALID_URL.to_string()),
        }
    }
}

/// A single form field
#[derive(Clone, Copy, Debug)]
pub struct Field {
    /// Name of the field, also the name of the stored value
    pub name: &'static str,

    /// Human readable label
    pub label: &'static str,

    /// Type and constraints
    pub kind: FieldKind,

    /// Missing or blank values are rejected
    pub required: bool,
}

impl Field {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }

    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub const fn choice(
        name: &'static str,
        label: &'static str,
        choices: &'static [&'static str],
    ) -> Self {
        Self::new(name, label, FieldKind::Choice(choices))
    }

    pub const fn number_choice(
        name: &'static str,
        label: &'static str,
        choices: &'static [&'static str],
    ) -> Self {
        Self::new(name, label, FieldKind::NumberChoice(choices))
    }

    pub const fn integer(name: &'static str, label: &'static str, min: i64, max: i64) -> Self {
        Self::new(name, label, FieldKind::Integer { min, max })
    }

    pub const fn boolean(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Boolean)
    }

    pub const fn date(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub const fn time(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Time)
    }

    pub const fn email(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    pub const fn url(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Url)
    }

    /// Mark the field as required
    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    fn validate(&self, raw: Option<&String>) -> Result<Value, String> {
        match raw.map(|value| value.trim()).filter(|value| !value.is_empty()) {
            Some(value) => self.kind.parse(value),
            None if self.required => Err(self.kind.missing().to_string()),
            None => Ok(Value::Null),
        }
    }
}

/// Field level errors of a rejected submission
#[derive(Debug, Default, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    fn push(&mut self, field: &'static str, message: String) {
        self.0.entry(field).or_default().push(message);
    }

    /// Errors of a single field, empty when the field is fine
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Names of all fields with errors
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The declared form of an entity kind
#[derive(Debug)]
pub struct Schema {
    fields: &'static [Field],
}

impl Schema {
    pub const fn new(fields: &'static [Field]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }

    /// Validate submitted fields
    ///
    /// Fields not in the schema are ignored. Optional fields that are left blank become `null`.
    pub fn validate(&self, raw: &RawFields) -> Result<Values, FieldErrors> {
        let mut values = Values::new();
        let mut errors = FieldErrors::default();

        for field in self.fields {
            match field.validate(raw.get(field.name)) {
                Ok(value) => {
                    values.insert(field.name.to_string(), value);
                }
                Err(message) => errors.push(field.name, message),
            }
        }

        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }

    /// Describe the form for the outside world
    ///
    /// `values` pre-fills the fields, `errors` annotates them
    pub fn describe(
        &self,
        kind: &'static str,
        action: String,
        values: &RawFields,
        errors: Option<&FieldErrors>,
    ) -> FormPage {
        let fields = self
            .fields
            .iter()
            .map(|field| {
                let (choices, min, max) = match field.kind {
                    FieldKind::Choice(choices) | FieldKind::NumberChoice(choices) => {
                        (Some(choices), None, None)
                    }
                    FieldKind::Integer { min, max } => (None, Some(min), Some(max)),
                    _ => (None, None, None),
                };

                FieldDescription {
                    name: field.name,
                    label: field.label,
                    kind: field.kind.name(),
                    required: field.required,
                    choices,
                    min,
                    max,
                    value: values.get(field.name).cloned(),
                    errors: errors.map(|e| e.get(field.name).to_vec()).unwrap_or_default(),
                }
            })
            .collect();

        FormPage {
            kind,
            action,
            fields,
        }
    }
}

/// A form ready to be filled in
#[derive(Debug, Serialize)]
pub struct FormPage {
    /// Entity kind the form is for
    pub kind: &'static str,

    /// Where to submit the form to
    pub action: String,

    /// All fields, in display order
    pub fields: Vec<FieldDescription>,
}

/// A single field of a [`FormPage`]
#[derive(Debug, Serialize)]
pub struct FieldDescription {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<&'static [&'static str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub errors: Vec<String>,
}

/// Keep only the values of fields that were part of the submission
///
/// Fields left out of an update keep their stored value, fields submitted blank are cleared
pub fn only_submitted(mut values: Values, raw: &RawFields) -> Values {
    values.retain(|name, _| raw.contains_key(name));
    values
}

/// Flatten stored or JSON submitted values back into raw form input
///
/// `null` values are left out, nested values are kept as JSON text
pub fn to_raw_fields(values: &Values) -> RawFields {
    values
        .iter()
        .filter_map(|(name, value)| {
            let raw = match value {
                Value::Null => return None,
                Value::String(value) => value.clone(),
                value => value.to_string(),
            };

            Some((name.clone(), raw))
        })
        .collect()
}
