pub mod config;
pub mod engine;
pub mod pool;
pub mod rating;
pub mod selector;
pub mod types;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum GapError {
    #[error("question not found: {0}")]
    QuestionNotFound(u32),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}
