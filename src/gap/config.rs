use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::gap::types::{Difficulty, Topic};

pub const DEFAULT_TOPICS: &[&str] = &[
    "Programming Fundamentals",
    "Data Structures & Algorithms",
    "Databases",
    "Operating Systems",
    "Computer Networks",
    "Object-Oriented Programming (OOP)",
    "Software Engineering",
    "Cybersecurity",
];

/// Nominal opponent rating for each difficulty tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyRatings {
    pub easy: i32,
    pub medium: i32,
    pub hard: i32,
}

impl Default for DifficultyRatings {
    fn default() -> Self {
        Self {
            easy: 800,
            medium: 1200,
            hard: 1600,
        }
    }
}

impl DifficultyRatings {
    pub fn for_difficulty(&self, difficulty: Difficulty) -> i32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

/// K-factors for the low / mid / high rating bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KFactorBands {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingConfig {
    pub initial_rating: i32,
    pub min_rating: i32,
    pub max_rating: i32,
    pub elo_scale: f64,
    pub difficulty_ratings: DifficultyRatings,
    /// Upper edge of the low band (exclusive for gains, inclusive for losses).
    pub low_band: i32,
    /// Upper edge of the mid band (exclusive for gains, inclusive for losses).
    pub high_band: i32,
    pub gain_k: KFactorBands,
    pub loss_k: KFactorBands,
    /// Wrong answers replace the symmetric update with a drop scaled by this factor.
    pub loss_multiplier: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            initial_rating: 1200,
            min_rating: 500,
            max_rating: 1600,
            elo_scale: 400.0,
            difficulty_ratings: DifficultyRatings::default(),
            low_band: 1000,
            high_band: 1400,
            gain_k: KFactorBands {
                low: 64.0,
                mid: 48.0,
                high: 32.0,
            },
            loss_k: KFactorBands {
                low: 140.0,
                mid: 120.0,
                high: 100.0,
            },
            loss_multiplier: 1.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionConfig {
    /// A topic seen this many times in the history is skipped.
    pub rotation_limit: usize,
    pub history_limit: usize,
    /// Ratings below this prefer easy questions.
    pub easy_below: i32,
    /// Ratings at or above this prefer hard questions.
    pub hard_from: i32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            rotation_limit: 3,
            history_limit: 10,
            easy_below: 1000,
            hard_from: 1400,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapConfig {
    pub topics: Vec<Topic>,
    pub rating: RatingConfig,
    pub selection: SelectionConfig,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            topics: DEFAULT_TOPICS.iter().map(|t| Topic::from(*t)).collect(),
            rating: RatingConfig::default(),
            selection: SelectionConfig::default(),
        }
    }
}

impl GapConfig {
    pub fn from_env(env_config: &crate::config::GapEnvConfig) -> Self {
        let mut config = Self::default();
        if let Some(topics) = &env_config.topics {
            config.topics = topics.iter().map(|t| Topic::new(t.as_str())).collect();
        }
        config
    }

    /// Builds a config over an explicit topic list, keeping default tuning.
    pub fn with_topics<I, T>(topics: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Topic>,
    {
        Self {
            topics: topics.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn has_topic(&self, topic: &Topic) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.topics.is_empty() {
            return Err("topics must not be empty".to_string());
        }
        let mut seen = HashSet::with_capacity(self.topics.len());
        for topic in &self.topics {
            if topic.as_str().trim().is_empty() {
                return Err("topic names must not be blank".to_string());
            }
            if !seen.insert(topic) {
                return Err(format!("duplicate topic: {topic}"));
            }
        }

        let r = &self.rating;
        if r.min_rating >= r.max_rating {
            return Err("rating.min_rating must be < rating.max_rating".to_string());
        }
        if !(r.min_rating..=r.max_rating).contains(&r.initial_rating) {
            return Err("rating.initial_rating must lie within [min_rating, max_rating]".to_string());
        }
        if r.elo_scale <= 0.0 {
            return Err("rating.elo_scale must be > 0".to_string());
        }
        if r.low_band > r.high_band {
            return Err("rating.low_band must be <= rating.high_band".to_string());
        }
        for k in [
            r.gain_k.low,
            r.gain_k.mid,
            r.gain_k.high,
            r.loss_k.low,
            r.loss_k.mid,
            r.loss_k.high,
        ] {
            if k <= 0.0 {
                return Err("rating K-factors must be > 0".to_string());
            }
        }
        if r.loss_multiplier < 1.0 {
            return Err("rating.loss_multiplier must be >= 1".to_string());
        }

        let s = &self.selection;
        if s.rotation_limit == 0 {
            return Err("selection.rotation_limit must be > 0".to_string());
        }
        if s.history_limit == 0 {
            return Err("selection.history_limit must be > 0".to_string());
        }
        if s.easy_below > s.hard_from {
            return Err("selection.easy_below must be <= selection.hard_from".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = GapConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.topics.len(), 8);
        assert_eq!(cfg.rating.initial_rating, 1200);
        assert_eq!(cfg.selection.rotation_limit, 3);
        assert_eq!(cfg.selection.history_limit, 10);
    }

    #[test]
    fn duplicate_topics_are_rejected() {
        let cfg = GapConfig::with_topics(["Databases", "Databases"]);
        assert!(cfg.validate().unwrap_err().contains("duplicate"));
    }

    #[test]
    fn empty_topics_are_rejected() {
        let cfg = GapConfig::with_topics(Vec::<Topic>::new());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn initial_rating_outside_bounds_is_rejected() {
        let mut cfg = GapConfig::default();
        cfg.rating.initial_rating = 1700;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn env_topics_override_defaults() {
        let env = crate::config::GapEnvConfig {
            topics: Some(vec!["Alpha".to_string(), "Beta".to_string()]),
        };
        let cfg = GapConfig::from_env(&env);
        assert_eq!(cfg.topics, vec![Topic::from("Alpha"), Topic::from("Beta")]);
    }

    #[test]
    fn difficulty_maps_to_opponent_rating() {
        let ratings = DifficultyRatings::default();
        assert_eq!(ratings.for_difficulty(Difficulty::Easy), 800);
        assert_eq!(ratings.for_difficulty(Difficulty::Medium), 1200);
        assert_eq!(ratings.for_difficulty(Difficulty::Hard), 1600);
    }
}
