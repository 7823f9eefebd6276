use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::gap::config::GapConfig;

pub const EXHAUSTED_MESSAGE: &str = "No more questions available for this topic";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Topic {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Topic {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A gap-test question as loaded from the question bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl Question {
    pub fn is_correct(&self, answer: &str) -> bool {
        self.answer == answer
    }

    pub fn present(&self) -> PresentedQuestion {
        PresentedQuestion {
            id: self.id,
            question: self.prompt.clone(),
            options: self.options.clone(),
            topic: Some(self.topic.clone()),
            difficulty: Some(self.difficulty),
        }
    }
}

/// What the client sees; never carries the correct answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentedQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl PresentedQuestion {
    pub fn exhausted() -> Self {
        Self {
            id: 0,
            question: EXHAUSTED_MESSAGE.to_string(),
            options: Vec::new(),
            topic: None,
            difficulty: None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.id == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Presented(PresentedQuestion),
    /// No unanswered question is left in the drawn topic.
    Exhausted { topic: Option<Topic> },
}

impl Selection {
    pub fn into_presented(self) -> PresentedQuestion {
        match self {
            Selection::Presented(question) => question,
            Selection::Exhausted { .. } => PresentedQuestion::exhausted(),
        }
    }

    pub fn question_id(&self) -> Option<u32> {
        match self {
            Selection::Presented(question) => Some(question.id),
            Selection::Exhausted { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub question_id: u32,
    pub topic: Topic,
    pub correct: bool,
    pub previous_rating: i32,
    pub new_rating: i32,
    pub average_rating: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapSummary {
    pub topic_ratings: BTreeMap<Topic, i32>,
    pub average_rating: i32,
}

/// Per-user skill state for the gap test.
///
/// The average rating is derived from `topic_ratings` on demand and never
/// persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingState {
    topic_ratings: BTreeMap<Topic, i32>,
    #[serde(default)]
    topic_history: VecDeque<Topic>,
    #[serde(default)]
    answered_question_ids: BTreeSet<u32>,
}

impl RatingState {
    pub fn new(config: &GapConfig) -> Self {
        Self {
            topic_ratings: config
                .topics
                .iter()
                .map(|t| (t.clone(), config.rating.initial_rating))
                .collect(),
            topic_history: VecDeque::new(),
            answered_question_ids: BTreeSet::new(),
        }
    }

    pub fn topic_ratings(&self) -> &BTreeMap<Topic, i32> {
        &self.topic_ratings
    }

    pub fn rating(&self, topic: &Topic) -> Option<i32> {
        self.topic_ratings.get(topic).copied()
    }

    pub fn average_rating(&self) -> i32 {
        if self.topic_ratings.is_empty() {
            return 0;
        }
        let sum: i64 = self.topic_ratings.values().map(|r| *r as i64).sum();
        sum.div_euclid(self.topic_ratings.len() as i64) as i32
    }

    pub fn topic_history(&self) -> &VecDeque<Topic> {
        &self.topic_history
    }

    pub fn history_count(&self, topic: &Topic) -> usize {
        self.topic_history.iter().filter(|t| *t == topic).count()
    }

    pub fn answered_question_ids(&self) -> &BTreeSet<u32> {
        &self.answered_question_ids
    }

    pub fn has_answered(&self, question_id: u32) -> bool {
        self.answered_question_ids.contains(&question_id)
    }

    pub fn summary(&self) -> GapSummary {
        GapSummary {
            topic_ratings: self.topic_ratings.clone(),
            average_rating: self.average_rating(),
        }
    }

    pub(crate) fn set_rating(&mut self, topic: &Topic, rating: i32) {
        if let Some(slot) = self.topic_ratings.get_mut(topic) {
            *slot = rating;
        }
    }

    pub(crate) fn clear_history(&mut self) {
        self.topic_history.clear();
    }

    pub(crate) fn record_presented(&mut self, topic: Topic, question_id: u32, history_limit: usize) {
        self.topic_history.push_back(topic);
        while self.topic_history.len() > history_limit {
            self.topic_history.pop_front();
        }
        self.answered_question_ids.insert(question_id);
    }

    /// Brings a stored record in line with the current configuration:
    /// missing topics start at the initial rating, unknown topics are dropped,
    /// ratings are clamped and the history is cut to its bound.
    pub fn conform(mut self, config: &GapConfig) -> Self {
        let rating = &config.rating;
        self.topic_ratings.retain(|t, _| config.has_topic(t));
        for topic in &config.topics {
            let entry = self
                .topic_ratings
                .entry(topic.clone())
                .or_insert(rating.initial_rating);
            *entry = (*entry).clamp(rating.min_rating, rating.max_rating);
        }

        self.topic_history.retain(|t| config.has_topic(t));
        while self.topic_history.len() > config.selection.history_limit {
            self.topic_history.pop_front();
        }
        self.answered_question_ids.remove(&0);
        self
    }
}
