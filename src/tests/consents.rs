use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[tokio::test]
async fn test_consents() {
    let mut app = helper::setup_test_app().await;

    let student = helper::register_and_login(&mut app, "student").await;

    let id = helper::submit(
        &mut app,
        &student,
        "/consent/new",
        &[
            ("adult_first_name", "Alex"),
            ("adult_last_name", "Lee"),
            ("adult_email", "alex@example.com"),
            ("consent", "True"),
        ],
    )
    .await
    .redirect_id();

    let consent = helper::single(&mut app, &student, "consent", &id).await.unwrap();
    assert_eq!("alex@example.com", consent["adult_email"]);
    assert_eq!(true, consent["consent"]);

    // withdraw
    let submission = helper::post_raw(
        &mut app,
        Some(&student),
        &format!("/consent/edit/{id}"),
        Some(mime::APPLICATION_JSON.as_ref()),
        serde_json::to_vec(&json!({
            "adult_first_name": "Alex",
            "adult_last_name": "Lee",
            "adult_email": "alex@example.com",
            "consent": false,
        }))
        .unwrap(),
    )
    .await;
    assert_eq!(Some(format!("/consent/{id}")), submission.location);

    let consent = helper::single(&mut app, &student, "consent", &id).await.unwrap();
    assert_eq!(false, consent["consent"]);
}

#[tokio::test]
async fn test_consent_validation() {
    let mut app = helper::setup_test_app().await;

    let student = helper::register_and_login(&mut app, "student").await;

    let submission = helper::submit(
        &mut app,
        &student,
        "/consent/new",
        &[
            ("adult_first_name", "Alex"),
            ("adult_email", "not-an-email"),
            ("consent", "maybe"),
        ],
    )
    .await;
    assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, submission.status_code);
    assert_eq!(
        vec!["This field is required.".to_string()],
        submission.field_errors("adult_last_name")
    );
    assert_eq!(
        vec!["Invalid email address.".to_string()],
        submission.field_errors("adult_email")
    );
    assert_eq!(
        vec!["Not a valid choice.".to_string()],
        submission.field_errors("consent")
    );

    let consents = helper::list(&mut app, &student, "/consents").await;
    assert!(consents.is_empty());
}

#[tokio::test]
async fn test_profiles() {
    let mut app = helper::setup_test_app().await;

    let student = helper::register_and_login(&mut app, "student").await;

    let submission = helper::submit(
        &mut app,
        &student,
        "/profile/new",
        &[
            ("role", "Principal"),
            ("first_name", "Sam"),
            ("last_name", "Lee"),
            ("phone", "555-0100"),
        ],
    )
    .await;
    assert_eq!(
        vec!["Not a valid choice.".to_string()],
        submission.field_errors("role")
    );

    let id = helper::submit(
        &mut app,
        &student,
        "/profile/new",
        &[
            ("role", "Student"),
            ("first_name", "Sam"),
            ("last_name", "Lee"),
            ("phone", "555-0100"),
        ],
    )
    .await
    .redirect_id();

    let profile = helper::single(&mut app, &student, "profile", &id).await.unwrap();
    assert_eq!("Student", profile["role"]);
    assert_eq!("Sam", profile["first_name"]);

    let profiles = helper::list(&mut app, &student, "/profile/list").await;
    assert_eq!(vec![id], helper::ids(&profiles));
}
