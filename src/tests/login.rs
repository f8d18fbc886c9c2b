use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_login() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login(&mut app).await;
    assert!(access_token.len() > 10);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let mut app = helper::setup_test_app().await;

    let (status_code, body) = helper::maybe_login(&mut app, "admin", "notverysecret").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Invalid user", helper::error_message(&body));

    let (status_code, body) = helper::maybe_login(&mut app, "nobody", "verysecret").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Invalid user", helper::error_message(&body));
}

#[tokio::test]
async fn test_access_without_login() {
    let mut app = helper::setup_test_app().await;

    for uri in ["/moods", "/mood/new", "/users/me", "/sleep/list"] {
        let (status_code, body) = helper::get(&mut app, None, uri).await;
        assert_eq!(StatusCode::UNAUTHORIZED, status_code, "{uri}");
        assert_eq!("Missing API token", helper::error_message(&body));
    }

    let (status_code, body) = helper::get(&mut app, Some("Bearer nonsense"), "/moods").await;
    assert_eq!(StatusCode::UNAUTHORIZED, status_code);
    assert!(helper::error_message(&body).starts_with("Invalid token"));
}
