//! Timed coding test: fixed question bank, remote execution, milestone
//! tracking per user.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{FIRST_TECHNICAL_QUESTION_ID, TOTAL_TECHNICAL_QUESTIONS};
use crate::services::code_sandbox::{CodeSandbox, SandboxError};
use crate::store::{Store, StoreError};

pub const NOT_STARTED: &str = "Not Started";

#[derive(Debug, Error)]
pub enum TechnicalError {
    #[error("technical question not found: {0}")]
    QuestionNotFound(u32),
    #[error("Code must be between {min} and {max} lines. Your code has {actual} lines.")]
    LineCount { min: usize, max: usize, actual: usize },
    #[error("Incorrect output. Expected: {expected}, Got: {actual}")]
    WrongOutput { expected: String, actual: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Sandbox(#[from] SandboxError),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A bank entry as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalQuestion {
    pub id: u32,
    pub title: String,
    pub problem_statement: String,
    pub input_example: String,
    pub expected_output: String,
    #[serde(default)]
    pub constraints: String,
    pub min_lines: usize,
    pub max_lines: usize,
}

/// What a candidate sees; the expected output stays server-side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicTechnicalQuestion {
    pub id: u32,
    pub title: String,
    pub problem_statement: String,
    pub input_example: String,
    pub constraints: String,
    pub min_lines: usize,
    pub max_lines: usize,
}

impl From<&TechnicalQuestion> for PublicTechnicalQuestion {
    fn from(q: &TechnicalQuestion) -> Self {
        Self {
            id: q.id,
            title: q.title.clone(),
            problem_statement: q.problem_statement.clone(),
            input_example: q.input_example.clone(),
            constraints: q.constraints.clone(),
            min_lines: q.min_lines,
            max_lines: q.max_lines,
        }
    }
}

#[derive(Debug, Default)]
pub struct TechnicalBank {
    questions: BTreeMap<u32, TechnicalQuestion>,
}

impl TechnicalBank {
    pub fn from_questions(questions: impl IntoIterator<Item = TechnicalQuestion>) -> Self {
        let mut bank = Self::default();
        for question in questions {
            if bank.questions.contains_key(&question.id) {
                tracing::warn!(id = question.id, "Duplicate technical question id, keeping the first");
                continue;
            }
            bank.questions.insert(question.id, question);
        }
        bank
    }

    /// Loads a JSON array of questions from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let questions: Vec<TechnicalQuestion> =
            serde_json::from_str(&raw).map_err(|source| BankError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let bank = Self::from_questions(questions);
        tracing::info!(path = %path.display(), count = bank.len(), "Loaded technical question bank");
        Ok(bank)
    }

    pub fn get(&self, id: u32) -> Option<&TechnicalQuestion> {
        self.questions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalProgress {
    pub solved: u32,
    pub milestone: String,
    #[serde(default)]
    pub solved_question_ids: BTreeSet<u32>,
}

impl Default for TechnicalProgress {
    fn default() -> Self {
        Self {
            solved: 0,
            milestone: NOT_STARTED.to_string(),
            solved_question_ids: BTreeSet::new(),
        }
    }
}

impl TechnicalProgress {
    pub fn started() -> Self {
        Self {
            milestone: milestone_label(0),
            ..Self::default()
        }
    }

    pub fn result(&self) -> TechnicalResult {
        TechnicalResult {
            solved: self.solved,
            milestone: self.milestone.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalResult {
    pub solved: u32,
    pub milestone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub message: String,
    pub solved: u32,
    pub milestone: String,
    pub already_solved: bool,
}

pub fn milestone_label(solved: u32) -> String {
    match solved {
        n if n >= 15 => "Completed 15 Questions".to_string(),
        n if n >= 10 => "10 Questions Solved".to_string(),
        n if n >= 5 => "5 Questions Solved".to_string(),
        n => format!("{n} Questions Solved"),
    }
}

pub fn ended_label(solved: u32) -> String {
    format!(
        "Test Ended: {} solved, {} unsolved.",
        solved,
        TOTAL_TECHNICAL_QUESTIONS.saturating_sub(solved)
    )
}

/// Lines that contain something other than whitespace.
pub fn count_code_lines(code: &str) -> usize {
    code.lines().filter(|line| !line.trim().is_empty()).count()
}

pub struct TechnicalTest {
    bank: Arc<TechnicalBank>,
    sandbox: CodeSandbox,
    store: Arc<Store>,
}

impl TechnicalTest {
    pub fn new(bank: Arc<TechnicalBank>, sandbox: CodeSandbox, store: Arc<Store>) -> Self {
        Self { bank, sandbox, store }
    }

    pub fn bank(&self) -> &TechnicalBank {
        &self.bank
    }

    pub fn question(&self, id: u32) -> Result<PublicTechnicalQuestion, TechnicalError> {
        self.bank
            .get(id)
            .map(PublicTechnicalQuestion::from)
            .ok_or(TechnicalError::QuestionNotFound(id))
    }

    /// Resets progress and hands out the opening question.
    pub fn start(&self, username: &str) -> Result<PublicTechnicalQuestion, TechnicalError> {
        self.store
            .set_technical_progress(username, &TechnicalProgress::started())?;
        tracing::info!(username, "Technical test started");
        self.question(FIRST_TECHNICAL_QUESTION_ID)
    }

    pub async fn submit(
        &self,
        username: &str,
        question_id: u32,
        code: &str,
        language: &str,
    ) -> Result<SubmissionOutcome, TechnicalError> {
        let question = self
            .bank
            .get(question_id)
            .ok_or(TechnicalError::QuestionNotFound(question_id))?;
        if language.trim().is_empty() {
            return Err(TechnicalError::InvalidInput("language is required".to_string()));
        }

        let actual = count_code_lines(code);
        if actual < question.min_lines || actual > question.max_lines {
            return Err(TechnicalError::LineCount {
                min: question.min_lines,
                max: question.max_lines,
                actual,
            });
        }

        let output = self
            .sandbox
            .execute(language.trim(), code, &question.input_example)
            .await?;
        let expected = question.expected_output.trim();
        if output.trim() != expected {
            tracing::info!(username, question_id, "Technical submission produced wrong output");
            return Err(TechnicalError::WrongOutput {
                expected: expected.to_string(),
                actual: output.trim().to_string(),
            });
        }

        let (before, after) = self.store.update_technical_progress(username, |mut progress| {
            if progress.solved_question_ids.insert(question_id) {
                progress.solved += 1;
                progress.milestone = milestone_label(progress.solved);
            }
            progress
        })?;
        let already_solved = before.solved_question_ids.contains(&question_id);

        tracing::info!(
            username,
            question_id,
            solved = after.solved,
            already_solved,
            "Technical submission accepted"
        );

        Ok(SubmissionOutcome {
            message: "Correct answer!".to_string(),
            solved: after.solved,
            milestone: after.milestone,
            already_solved,
        })
    }

    pub fn end(&self, username: &str) -> Result<TechnicalResult, TechnicalError> {
        let (_, after) = self.store.update_technical_progress(username, |mut progress| {
            progress.milestone = ended_label(progress.solved);
            progress
        })?;
        tracing::info!(username, solved = after.solved, "Technical test ended");
        Ok(after.result())
    }

    pub fn result(&self, username: &str) -> Result<TechnicalResult, TechnicalError> {
        Ok(self
            .store
            .get_technical_progress(username)?
            .unwrap_or_default()
            .result())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::config::SandboxConfig;

    fn sample_question(id: u32, expected: &str) -> TechnicalQuestion {
        TechnicalQuestion {
            id,
            title: format!("Q{id}"),
            problem_statement: "Echo the input".to_string(),
            input_example: expected.to_string(),
            expected_output: expected.to_string(),
            constraints: String::new(),
            min_lines: 1,
            max_lines: 5,
        }
    }

    fn build(dir: &Path) -> TechnicalTest {
        let bank = TechnicalBank::from_questions(
            (1..=16).map(|id| sample_question(id, &format!("out-{id}"))),
        );
        let sandbox = CodeSandbox::new(&SandboxConfig {
            enabled: true,
            mock: true,
            api_url: String::new(),
            timeout_secs: 1,
        });
        let store = Arc::new(Store::open(dir.join("db").to_str().unwrap()).unwrap());
        TechnicalTest::new(Arc::new(bank), sandbox, store)
    }

    #[test]
    fn milestones_follow_solved_count() {
        assert_eq!(milestone_label(0), "0 Questions Solved");
        assert_eq!(milestone_label(4), "4 Questions Solved");
        assert_eq!(milestone_label(5), "5 Questions Solved");
        assert_eq!(milestone_label(9), "5 Questions Solved");
        assert_eq!(milestone_label(10), "10 Questions Solved");
        assert_eq!(milestone_label(15), "Completed 15 Questions");
        assert_eq!(milestone_label(16), "Completed 15 Questions");
    }

    #[test]
    fn ended_label_counts_unsolved() {
        assert_eq!(ended_label(3), "Test Ended: 3 solved, 12 unsolved.");
        assert_eq!(ended_label(20), "Test Ended: 20 solved, 0 unsolved.");
    }

    #[test]
    fn blank_lines_do_not_count() {
        assert_eq!(count_code_lines("a = 1\n\n   \nprint(a)\n"), 2);
        assert_eq!(count_code_lines(""), 0);
        assert_eq!(count_code_lines("x\r\ny"), 2);
    }

    #[test]
    fn bank_keeps_first_duplicate() {
        let bank = TechnicalBank::from_questions([sample_question(1, "a"), sample_question(1, "b")]);
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.get(1).unwrap().expected_output, "a");
    }

    #[test]
    fn bank_loads_json_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tech.json");
        std::fs::write(
            &path,
            serde_json::json!([{
                "id": 1, "title": "Sum", "problem_statement": "Add", "input_example": "1 2",
                "expected_output": "3", "constraints": "none", "min_lines": 1, "max_lines": 10
            }])
            .to_string(),
        )
        .unwrap();
        let bank = TechnicalBank::load(&path).unwrap();
        assert_eq!(bank.get(1).unwrap().title, "Sum");
        assert!(matches!(
            TechnicalBank::load(dir.path().join("missing.json")),
            Err(BankError::Io { .. })
        ));
    }

    #[test]
    fn result_defaults_to_not_started() {
        let dir = tempdir().unwrap();
        let test = build(dir.path());
        let result = test.result("u1").unwrap();
        assert_eq!(result.solved, 0);
        assert_eq!(result.milestone, NOT_STARTED);
    }

    #[tokio::test]
    async fn start_resets_progress_and_returns_first_question() {
        let dir = tempdir().unwrap();
        let test = build(dir.path());
        test.submit("u1", 2, "print(input())", "python").await.unwrap();

        let first = test.start("u1").unwrap();
        assert_eq!(first.id, 1);
        let result = test.result("u1").unwrap();
        assert_eq!(result.solved, 0);
        assert_eq!(result.milestone, "0 Questions Solved");
    }

    #[tokio::test]
    async fn correct_submission_counts_once() {
        let dir = tempdir().unwrap();
        let test = build(dir.path());
        test.start("u1").unwrap();

        let first = test.submit("u1", 1, "print(input())", "python").await.unwrap();
        assert_eq!(first.solved, 1);
        assert!(!first.already_solved);

        let again = test.submit("u1", 1, "print(input())", "python").await.unwrap();
        assert_eq!(again.solved, 1);
        assert!(again.already_solved);
    }

    #[tokio::test]
    async fn milestone_advances_at_five() {
        let dir = tempdir().unwrap();
        let test = build(dir.path());
        test.start("u1").unwrap();
        let mut last = None;
        for id in 1..=5 {
            last = Some(test.submit("u1", id, "code", "python").await.unwrap());
        }
        assert_eq!(last.unwrap().milestone, "5 Questions Solved");
    }

    #[tokio::test]
    async fn line_count_outside_bounds_is_rejected() {
        let dir = tempdir().unwrap();
        let test = build(dir.path());
        let err = test.submit("u1", 1, "a\nb\nc\nd\ne\nf", "python").await.unwrap_err();
        assert!(matches!(err, TechnicalError::LineCount { actual: 6, .. }));
        let err = test.submit("u1", 1, "\n  \n", "python").await.unwrap_err();
        assert!(matches!(err, TechnicalError::LineCount { actual: 0, .. }));
    }

    #[tokio::test]
    async fn unknown_question_is_not_found() {
        let dir = tempdir().unwrap();
        let test = build(dir.path());
        assert!(matches!(
            test.submit("u1", 99, "x", "python").await,
            Err(TechnicalError::QuestionNotFound(99))
        ));
        assert!(matches!(test.question(99), Err(TechnicalError::QuestionNotFound(99))));
    }

    #[tokio::test]
    async fn wrong_output_leaves_progress_untouched() {
        let dir = tempdir().unwrap();
        let mut question = sample_question(1, "expected");
        question.input_example = "something else".to_string();
        let sandbox = CodeSandbox::new(&SandboxConfig {
            enabled: true,
            mock: true,
            api_url: String::new(),
            timeout_secs: 1,
        });
        let store = Arc::new(Store::open(dir.path().join("db").to_str().unwrap()).unwrap());
        let test = TechnicalTest::new(
            Arc::new(TechnicalBank::from_questions([question])),
            sandbox,
            store,
        );
        test.start("u1").unwrap();

        let err = test.submit("u1", 1, "x", "python").await.unwrap_err();
        match err {
            TechnicalError::WrongOutput { expected, actual } => {
                assert_eq!(expected, "expected");
                assert_eq!(actual, "something else");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(test.result("u1").unwrap().solved, 0);
    }

    #[tokio::test]
    async fn end_records_final_label() {
        let dir = tempdir().unwrap();
        let test = build(dir.path());
        test.start("u1").unwrap();
        test.submit("u1", 1, "x", "python").await.unwrap();
        test.submit("u1", 2, "x", "python").await.unwrap();

        let ended = test.end("u1").unwrap();
        assert_eq!(ended.solved, 2);
        assert_eq!(ended.milestone, "Test Ended: 2 solved, 13 unsolved.");
        assert_eq!(test.result("u1").unwrap(), ended);
    }
}
