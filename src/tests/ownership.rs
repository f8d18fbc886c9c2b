use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_delete_by_someone_else() {
    let mut app = helper::setup_test_app().await;

    let owner = helper::register_and_login(&mut app, "owner").await;
    let other = helper::register_and_login(&mut app, "other").await;

    let id = helper::create_mood(&mut app, &owner, "Happy", "Work", "good day").await;

    let (status_code, body) =
        helper::get(&mut app, Some(&other), &format!("/mood/delete/{id}")).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);
    assert_eq!("You can't delete a mood you don't own.", body["notice"]);

    // the refreshed list still has the mood
    assert_eq!(vec![id], helper::ids(body["data"].as_array().unwrap()));

    let moods = helper::list(&mut app, &other, "/moods").await;
    assert_eq!(vec![id], helper::ids(&moods));
    assert!(helper::single(&mut app, &owner, "mood", &id).await.is_some());
}

#[tokio::test]
async fn test_edit_by_someone_else() {
    let mut app = helper::setup_test_app().await;

    let owner = helper::register_and_login(&mut app, "owner").await;
    let other = helper::register_and_login(&mut app, "other").await;

    let id = helper::create_mood(&mut app, &owner, "Happy", "Work", "good day").await;

    let (status_code, body) =
        helper::get(&mut app, Some(&other), &format!("/mood/edit/{id}")).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);
    assert_eq!(
        "You can't edit a mood you don't own.",
        helper::error_message(&body)
    );

    let submission = helper::submit(
        &mut app,
        &other,
        &format!("/mood/edit/{id}"),
        &[
            ("emotion", "Furious"),
            ("activity", "Work"),
            ("description", "not mine"),
        ],
    )
    .await;
    assert_eq!(StatusCode::FORBIDDEN, submission.status_code);
    assert_eq!(None, submission.location);

    // untouched
    let mood = helper::single(&mut app, &owner, "mood", &id).await.unwrap();
    assert_eq!("Happy", mood["emotion"]);
    assert_eq!("good day", mood["description"]);
}

#[tokio::test]
async fn test_comment_owned_by_its_author() {
    let mut app = helper::setup_test_app().await;

    let owner = helper::register_and_login(&mut app, "owner").await;
    let commenter = helper::register_and_login(&mut app, "commenter").await;

    let mood_id = helper::create_mood(&mut app, &owner, "Sad", "Study", "exams").await;

    let comment_id = {
        helper::submit(
            &mut app,
            &commenter,
            &format!("/mood/{mood_id}/comment/new"),
            &[("content", "you got this")],
        )
        .await;

        let mood = helper::single(&mut app, &owner, "mood", &mood_id)
            .await
            .unwrap();
        helper::ids(mood["comments"].as_array().unwrap())[0]
    };

    // the author of the mood does not own the comment
    let (status_code, body) = helper::get(
        &mut app,
        Some(&owner),
        &format!("/comment/delete/{comment_id}"),
    )
    .await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);
    assert_eq!("You can't delete a comment you don't own.", body["notice"]);

    let (status_code, body) = helper::get(
        &mut app,
        Some(&commenter),
        &format!("/comment/delete/{comment_id}"),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!("The comment was deleted.", body["notice"]);

    let mood = helper::single(&mut app, &owner, "mood", &mood_id)
        .await
        .unwrap();
    assert!(mood["comments"].as_array().unwrap().is_empty());
}
