mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::app::spawn_test_server;
use common::fixtures::register_user;
use common::http::{assert_json_error, assert_status_ok_json, call};

fn submission(question_id: u32, code: &str) -> serde_json::Value {
    json!({"questionId": question_id, "code": code, "language": "python"})
}

#[tokio::test]
async fn it_question_is_public_without_expected_output() {
    let app = spawn_test_server().await;

    let (status, body) = call(&app.app, Method::GET, "/api/technical-test/questions/3", None).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["id"], 3);
    assert_eq!(body["data"]["problemStatement"], "Print the input");
    assert!(body["data"].get("expectedOutput").is_none());

    let (status, body) =
        call(&app.app, Method::GET, "/api/technical-test/questions/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_error(&body, "QUESTION_NOT_FOUND");
}

#[tokio::test]
async fn it_start_returns_first_question_and_resets_progress() {
    let app = spawn_test_server().await;
    register_user(&app.app, "alice").await;

    let (status, body) = call(&app.app, Method::GET, "/api/users/alice/technical-test/result", None).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["solved"], 0);
    assert_eq!(body["data"]["milestone"], "Not Started");

    let (status, body) =
        call(&app.app, Method::POST, "/api/users/alice/technical-test/start", None).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["id"], 1);

    let (_, body) = call(&app.app, Method::GET, "/api/users/alice/technical-test/result", None).await;
    assert_eq!(body["data"]["milestone"], "0 Questions Solved");
}

#[tokio::test]
async fn it_correct_submission_counts_once() {
    let app = spawn_test_server().await;
    register_user(&app.app, "alice").await;
    call(&app.app, Method::POST, "/api/users/alice/technical-test/start", None).await;

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/users/alice/technical-test/submit",
        Some(submission(1, "print(input())")),
    )
    .await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["message"], "Correct answer!");
    assert_eq!(body["data"]["solved"], 1);
    assert_eq!(body["data"]["milestone"], "1 Questions Solved");
    assert_eq!(body["data"]["alreadySolved"], false);

    let (_, body) = call(
        &app.app,
        Method::POST,
        "/api/users/alice/technical-test/submit",
        Some(submission(1, "print(input())")),
    )
    .await;
    assert_eq!(body["data"]["solved"], 1);
    assert_eq!(body["data"]["alreadySolved"], true);
}

#[tokio::test]
async fn it_submission_line_bounds_are_enforced() {
    let app = spawn_test_server().await;
    register_user(&app.app, "alice").await;

    let long_code = "x = 1\n".repeat(11);
    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/users/alice/technical-test/submit",
        Some(submission(2, &long_code)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "LINE_COUNT_OUT_OF_RANGE");

    // Blank lines do not count toward the minimum.
    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/users/alice/technical-test/submit",
        Some(submission(2, "\n   \n")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "LINE_COUNT_OUT_OF_RANGE");

    let (_, body) = call(&app.app, Method::GET, "/api/users/alice/technical-test/result", None).await;
    assert_eq!(body["data"]["solved"], 0);
}

#[tokio::test]
async fn it_submission_rejects_unknown_question_and_blank_language() {
    let app = spawn_test_server().await;
    register_user(&app.app, "alice").await;

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/users/alice/technical-test/submit",
        Some(submission(404, "print(1)")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_error(&body, "QUESTION_NOT_FOUND");

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/users/alice/technical-test/submit",
        Some(json!({"questionId": 1, "code": "print(1)", "language": " "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "INVALID_INPUT");
}

#[tokio::test]
async fn it_end_reports_solved_and_unsolved() {
    let app = spawn_test_server().await;
    register_user(&app.app, "alice").await;
    call(&app.app, Method::POST, "/api/users/alice/technical-test/start", None).await;
    for id in [1, 2, 3] {
        call(
            &app.app,
            Method::POST,
            "/api/users/alice/technical-test/submit",
            Some(submission(id, "print(input())")),
        )
        .await;
    }

    let (status, body) =
        call(&app.app, Method::POST, "/api/users/alice/technical-test/end", None).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["solved"], 3);
    assert_eq!(body["data"]["milestone"], "Test Ended: 3 solved, 12 unsolved.");

    let (_, body) = call(&app.app, Method::GET, "/api/users/alice/technical-test/result", None).await;
    assert_eq!(body["data"]["milestone"], "Test Ended: 3 solved, 12 unsolved.");
}
