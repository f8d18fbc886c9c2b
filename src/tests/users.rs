use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_register() {
    let mut app = helper::setup_test_app().await;

    let (status_code, body) = helper::maybe_register(&mut app, "student", "password").await;
    assert_eq!(StatusCode::CREATED, status_code);
    assert_eq!("student", body["data"]["username"]);

    // the same username again
    let (status_code, body) = helper::maybe_register(&mut app, "student", "other").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Username already taken", helper::error_message(&body));

    let (status_code, body) = helper::maybe_register(&mut app, "", "password").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Username can not be empty", helper::error_message(&body));

    let (status_code, body) = helper::maybe_register(&mut app, "teacher", "").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Password can not be empty", helper::error_message(&body));
}

#[tokio::test]
async fn test_current_user() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::register_and_login(&mut app, "student").await;

    let (status_code, body) = helper::get(&mut app, Some(&access_token), "/users/me").await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!("student", body["data"]["username"]);
    assert!(body["data"]["id"].is_string());
    assert!(body["data"].get("hashed_password").is_none());
}

#[tokio::test]
async fn test_register_at_the_same_time() {
    let app = helper::setup_test_app().await;

    let mut one = app.clone();
    let mut two = app.clone();

    let (first, second) = tokio::join!(
        helper::maybe_register(&mut one, "student", "password"),
        helper::maybe_register(&mut two, "student", "other"),
    );

    let mut status_codes = vec![first.0, second.0];
    status_codes.sort_by_key(StatusCode::as_u16);
    assert_eq!(vec![StatusCode::CREATED, StatusCode::BAD_REQUEST], status_codes);

    // only one of the passwords works
    let mut app = app;
    let (status_code, _) = helper::maybe_login(&mut app, "student", "password").await;
    let (other_status_code, _) = helper::maybe_login(&mut app, "student", "other").await;
    assert_ne!(status_code, other_status_code);
}
