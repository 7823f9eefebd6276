//! Next-question policy: rotation-limited topic draw, then a rating-tiered
//! pick among the topic's unanswered questions.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::gap::config::{GapConfig, SelectionConfig};
use crate::gap::pool::QuestionPool;
use crate::gap::types::{Difficulty, Question, RatingState, Selection, Topic};

/// Difficulty tier a rating should be served from.
pub fn preferred_tier(rating: i32, config: &SelectionConfig) -> Difficulty {
    if rating < config.easy_below {
        Difficulty::Easy
    } else if rating < config.hard_from {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    }
}

/// Topics still under the rotation limit. When every topic has hit the cap
/// the history is cleared and all topics become eligible again.
fn eligible_topics<'a>(state: &mut RatingState, config: &'a GapConfig) -> Vec<&'a Topic> {
    let limit = config.selection.rotation_limit;
    let valid: Vec<&Topic> = config
        .topics
        .iter()
        .filter(|t| state.history_count(t) < limit)
        .collect();

    if valid.is_empty() {
        tracing::debug!("All topics hit the rotation limit, clearing topic history");
        state.clear_history();
        return config.topics.iter().collect();
    }
    valid
}

pub fn select_next<R: Rng + ?Sized>(
    mut state: RatingState,
    pool: &QuestionPool,
    config: &GapConfig,
    rng: &mut R,
) -> (Selection, RatingState) {
    let valid = eligible_topics(&mut state, config);
    let Some(topic) = valid.choose(rng).map(|t| (*t).clone()) else {
        return (Selection::Exhausted { topic: None }, state);
    };

    let candidates: Vec<&Question> = pool
        .questions_by_topic(&topic)
        .filter(|q| !state.has_answered(q.id))
        .collect();
    if candidates.is_empty() {
        tracing::debug!(%topic, "No unanswered questions left for topic");
        return (Selection::Exhausted { topic: Some(topic) }, state);
    }

    let rating = state
        .rating(&topic)
        .unwrap_or(config.rating.initial_rating);
    let tier = preferred_tier(rating, &config.selection);
    let tiered: Vec<&Question> = candidates
        .iter()
        .copied()
        .filter(|q| q.difficulty == tier)
        .collect();
    let resolved = if tiered.is_empty() { &candidates } else { &tiered };

    let Some(question) = resolved.choose(rng).copied() else {
        return (Selection::Exhausted { topic: Some(topic) }, state);
    };

    tracing::debug!(
        %topic,
        rating,
        tier = %tier,
        question_id = question.id,
        difficulty = %question.difficulty,
        "Selected gap question"
    );

    state.record_presented(topic, question.id, config.selection.history_limit);
    (Selection::Presented(question.present()), state)
}
