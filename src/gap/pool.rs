//! Read-only gap-test question bank, loaded once at startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::gap::config::GapConfig;
use crate::gap::types::{Difficulty, Question, Topic};

#[derive(Debug, Error)]
pub enum PoolError {
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
    #[error("question {id} references unknown topic '{topic}'")]
    UnknownTopic { id: u32, topic: String },
    #[error("question {id} has invalid difficulty '{value}'")]
    InvalidDifficulty { id: u32, value: String },
    #[error("duplicate question id {0}")]
    DuplicateId(u32),
    #[error("question id 0 is reserved")]
    ReservedId,
    #[error("question {0} has no options")]
    NoOptions(u32),
}

#[derive(Debug, Deserialize)]
struct RawTopicFile {
    topic: String,
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    id: Option<u32>,
    question: String,
    options: Vec<String>,
    answer: String,
    difficulty: String,
    #[serde(default, alias = "prerequisite")]
    prerequisites: Option<Prerequisites>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Prerequisites {
    One(String),
    Many(Vec<String>),
}

impl Prerequisites {
    fn into_vec(self) -> Vec<String> {
        match self {
            Prerequisites::One(s) if s.trim().is_empty() => Vec::new(),
            Prerequisites::One(s) => vec![s],
            Prerequisites::Many(v) => v,
        }
    }
}

#[derive(Debug, Default)]
pub struct QuestionPool {
    questions: Vec<Question>,
    by_id: HashMap<u32, usize>,
    by_topic: HashMap<Topic, Vec<usize>>,
}

impl QuestionPool {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_questions(
        questions: Vec<Question>,
        config: &GapConfig,
    ) -> Result<Self, PoolError> {
        let mut pool = Self::default();
        for question in questions {
            pool.insert(question, config)?;
        }
        Ok(pool)
    }

    /// Loads every `*.json` topic file under `dir`, in file-name order.
    /// Questions without an explicit id are numbered sequentially from 1.
    pub fn load_dir(dir: impl AsRef<Path>, config: &GapConfig) -> Result<Self, PoolError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| PoolError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PoolError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path);
            }
        }
        files.sort();

        let mut pool = Self::default();
        let mut next_id = 1_u32;
        for path in files {
            let raw = std::fs::read_to_string(&path).map_err(|source| PoolError::Io {
                path: path.clone(),
                source,
            })?;
            let file: RawTopicFile =
                serde_json::from_str(&raw).map_err(|source| PoolError::Parse {
                    path: path.clone(),
                    source,
                })?;

            let topic = Topic::new(file.topic.trim());
            let count = file.questions.len();
            for raw_question in file.questions {
                let id = raw_question.id.unwrap_or(next_id);
                next_id = next_id.max(id.saturating_add(1));

                let difficulty = raw_question.difficulty.parse::<Difficulty>().map_err(|_| {
                    PoolError::InvalidDifficulty {
                        id,
                        value: raw_question.difficulty.clone(),
                    }
                })?;

                pool.insert(
                    Question {
                        id,
                        topic: topic.clone(),
                        difficulty,
                        prompt: raw_question.question,
                        options: raw_question.options,
                        answer: raw_question.answer,
                        prerequisites: raw_question
                            .prerequisites
                            .map(Prerequisites::into_vec)
                            .unwrap_or_default(),
                    },
                    config,
                )?;
            }
            tracing::info!(path = %path.display(), %topic, count, "Loaded gap question file");
        }

        Ok(pool)
    }

    fn insert(&mut self, question: Question, config: &GapConfig) -> Result<(), PoolError> {
        if question.id == 0 {
            return Err(PoolError::ReservedId);
        }
        if !config.has_topic(&question.topic) {
            return Err(PoolError::UnknownTopic {
                id: question.id,
                topic: question.topic.to_string(),
            });
        }
        if question.options.is_empty() {
            return Err(PoolError::NoOptions(question.id));
        }
        if self.by_id.contains_key(&question.id) {
            return Err(PoolError::DuplicateId(question.id));
        }

        let index = self.questions.len();
        self.by_id.insert(question.id, index);
        self.by_topic
            .entry(question.topic.clone())
            .or_default()
            .push(index);
        self.questions.push(question);
        Ok(())
    }

    pub fn get(&self, id: u32) -> Option<&Question> {
        self.by_id.get(&id).map(|index| &self.questions[*index])
    }

    pub fn questions_by_topic<'a>(&'a self, topic: &Topic) -> impl Iterator<Item = &'a Question> + 'a {
        self.by_topic
            .get(topic)
            .into_iter()
            .flatten()
            .map(move |index| &self.questions[*index])
    }

    pub fn topic_count(&self, topic: &Topic) -> usize {
        self.by_topic.get(topic).map(Vec::len).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
