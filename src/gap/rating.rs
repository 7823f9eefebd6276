//! Asymmetric Elo update for per-topic gap ratings.
//!
//! Rises are damped and drops are amplified: gains use a smaller K-factor than
//! losses in the same band, and a wrong answer replaces the symmetric update
//! with `current - K * (1 - expected) * loss_multiplier`.

use crate::gap::config::{GapConfig, RatingConfig};
use crate::gap::types::{Difficulty, RatingState, Topic};
use crate::gap::GapError;

/// Standard Elo expectation of `current` scoring against `opponent`.
pub fn expected_score(current: i32, opponent: i32, scale: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((opponent - current) as f64 / scale))
}

pub fn k_factor(current: i32, correct: bool, config: &RatingConfig) -> f64 {
    if correct {
        if current < config.low_band {
            config.gain_k.low
        } else if current < config.high_band {
            config.gain_k.mid
        } else {
            config.gain_k.high
        }
    } else if current > config.high_band {
        config.loss_k.high
    } else if current > config.low_band {
        config.loss_k.mid
    } else {
        config.loss_k.low
    }
}

/// New rating after one answer, truncated toward zero and clamped.
pub fn updated_rating(
    current: i32,
    difficulty: Difficulty,
    correct: bool,
    config: &RatingConfig,
) -> i32 {
    let opponent = config.difficulty_ratings.for_difficulty(difficulty);
    let expected = expected_score(current, opponent, config.elo_scale);
    let k = k_factor(current, correct, config);
    let raw = if correct {
        current as f64 + k * (1.0 - expected)
    } else {
        current as f64 - k * (1.0 - expected) * config.loss_multiplier
    };

    (raw as i32).clamp(config.min_rating, config.max_rating)
}

/// Applies one answer to `state` and returns the new topic rating with the
/// updated state.
pub fn evaluate(
    mut state: RatingState,
    topic: &Topic,
    difficulty: Difficulty,
    correct: bool,
    config: &GapConfig,
) -> Result<(i32, RatingState), GapError> {
    let current = state
        .rating(topic)
        .ok_or_else(|| GapError::UnknownTopic(topic.to_string()))?;

    let new_rating = updated_rating(current, difficulty, correct, &config.rating);
    state.set_rating(topic, new_rating);

    tracing::debug!(
        %topic,
        %difficulty,
        correct,
        previous = current,
        new_rating,
        average = state.average_rating(),
        "Updated gap rating"
    );

    Ok((new_rating, state))
}
