use axum::http::StatusCode;
use serde_json::Value;

use crate::tests::helper;

#[sqlx::test]
async fn test_moods_in_order(pool: sqlx::PgPool) {
    let mut app = helper::setup_test_app_with_pool(pool).await;

    let student = helper::register_and_login(&mut app, "student").await;
    let teacher = helper::register_and_login(&mut app, "teacher").await;

    let one = helper::create_mood(&mut app, &student, "Sad", "Study", "exams").await;
    let two = helper::create_mood(&mut app, &teacher, "OK", "Work", "grading").await;
    let three = helper::create_mood(&mut app, &student, "Happy", "Friend", "passed").await;

    let moods = helper::list(&mut app, &teacher, "/moods").await;
    assert_eq!(vec![one, two, three], helper::ids(&moods));

    let mood = helper::single(&mut app, &teacher, "mood", &two).await.unwrap();
    assert_eq!("grading", mood["description"]);

    // a mood is not a sleep
    let (status_code, body) =
        helper::get(&mut app, Some(&student), &format!("/sleep/{one}")).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("Sleep not found", helper::error_message(&body));
}

#[sqlx::test]
async fn test_sleep_edit_patches_fields(pool: sqlx::PgPool) {
    let mut app = helper::setup_test_app_with_pool(pool).await;

    let student = helper::register_and_login(&mut app, "student").await;

    let id = helper::submit(
        &mut app,
        &student,
        "/sleep/new",
        &[
            ("rating", "2"),
            ("feel", "2"),
            ("start_time", "22:45"),
            ("sleep_date", "2024-05-01"),
            ("minutes_to_sleep", "45"),
        ],
    )
    .await
    .redirect_id();

    let before = helper::single(&mut app, &student, "sleep", &id).await.unwrap();

    let submission = helper::submit(
        &mut app,
        &student,
        &format!("/sleep/edit/{id}"),
        &[
            ("rating", "5"),
            ("feel", "3"),
            ("start_time", ""),
            ("minutes_to_sleep", "20"),
        ],
    )
    .await;
    assert_eq!(Some(format!("/sleep/{id}")), submission.location);

    let sleep = helper::single(&mut app, &student, "sleep", &id).await.unwrap();
    assert_eq!(5, sleep["rating"]);
    assert_eq!(20, sleep["minutes_to_sleep"]);
    assert_eq!(Value::Null, sleep["start_time"]);
    assert_eq!("2024-05-01", sleep["sleep_date"]);
    assert_eq!(before["author"], sleep["author"]);
    assert_eq!(before["created_at"], sleep["created_at"]);
}

#[sqlx::test]
async fn test_comments_by_parent(pool: sqlx::PgPool) {
    let mut app = helper::setup_test_app_with_pool(pool).await;

    let student = helper::register_and_login(&mut app, "student").await;

    let one = helper::create_mood(&mut app, &student, "Sad", "Study", "exams").await;
    let two = helper::create_mood(&mut app, &student, "OK", "Work", "shift").await;

    for (mood, content) in [(one, "first"), (two, "elsewhere"), (one, "second")] {
        let submission = helper::submit(
            &mut app,
            &student,
            &format!("/mood/{mood}/comment/new"),
            &[("content", content)],
        )
        .await;
        assert_eq!(Some(format!("/mood/{mood}")), submission.location);
    }

    let mood = helper::single(&mut app, &student, "mood", &one).await.unwrap();
    let contents: Vec<_> = mood["comments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|comment| comment["content"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(vec!["first", "second"], contents);
    assert_eq!("mood", mood["comments"][0]["parent"]["kind"]);
}

#[sqlx::test]
async fn test_delete(pool: sqlx::PgPool) {
    let mut app = helper::setup_test_app_with_pool(pool).await;

    let owner = helper::register_and_login(&mut app, "owner").await;
    let other = helper::register_and_login(&mut app, "other").await;

    let one = helper::create_mood(&mut app, &owner, "Sad", "Study", "exams").await;
    let two = helper::create_mood(&mut app, &owner, "Happy", "Study", "done").await;

    let (status_code, body) =
        helper::get(&mut app, Some(&other), &format!("/mood/delete/{one}")).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);
    assert_eq!(vec![one, two], helper::ids(body["data"].as_array().unwrap()));

    let (status_code, body) =
        helper::get(&mut app, Some(&owner), &format!("/mood/delete/{one}")).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!("The mood was deleted.", body["notice"]);
    assert_eq!(vec![two], helper::ids(body["data"].as_array().unwrap()));

    assert!(helper::single(&mut app, &owner, "mood", &one).await.is_none());
}

#[sqlx::test]
async fn test_username_taken(pool: sqlx::PgPool) {
    let mut app = helper::setup_test_app_with_pool(pool).await;

    let (status_code, _) = helper::maybe_register(&mut app, "student", "password").await;
    assert_eq!(StatusCode::CREATED, status_code);

    let (status_code, body) = helper::maybe_register(&mut app, "student", "other").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Username already taken", helper::error_message(&body));
}
