use std::path::Path;

use axum::http::Method;
use axum::Router;
use serde_json::{json, Value};

use super::http::{assert_status_ok_json, call};

/// One JSON file per topic with `per_tier` questions of each difficulty.
/// Every correct answer is "right".
pub fn write_gap_bank(dir: &Path, topics: &[&str], per_tier: u32) {
    std::fs::create_dir_all(dir).expect("create bank dir");
    for (index, topic) in topics.iter().enumerate() {
        let mut questions = Vec::new();
        for difficulty in ["easy", "medium", "hard"] {
            for n in 0..per_tier {
                questions.push(json!({
                    "question": format!("{topic} {difficulty} #{n}"),
                    "options": ["right", "wrong"],
                    "answer": "right",
                    "difficulty": difficulty,
                    "prerequisite": "basics"
                }));
            }
        }
        let file = dir.join(format!("{index:02}.json"));
        std::fs::write(file, json!({ "topic": topic, "questions": questions }).to_string())
            .expect("write bank file");
    }
}

/// Sixteen questions whose input equals the expected output, so the mock
/// sandbox (which echoes stdin) accepts any in-bounds code.
pub fn write_technical_bank(path: &Path) {
    let questions: Vec<Value> = (1..=16)
        .map(|id| {
            json!({
                "id": id,
                "title": format!("Problem {id}"),
                "problem_statement": "Print the input",
                "input_example": format!("answer-{id}"),
                "expected_output": format!("answer-{id}"),
                "constraints": "none",
                "min_lines": 1,
                "max_lines": 10
            })
        })
        .collect();
    std::fs::write(path, Value::Array(questions).to_string()).expect("write technical bank");
}

pub async fn register_user(app: &Router, username: &str) -> Value {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/users",
        Some(json!({
            "username": username,
            "fullname": format!("{username} Tester"),
            "email": format!("{username}@example.com"),
        })),
    )
    .await;
    assert_status_ok_json(status, &body);
    body["data"].clone()
}
