use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::gap::config::GapConfig;
use crate::gap::pool::QuestionPool;
use crate::gap::types::{Evaluation, GapSummary, RatingState, Selection};
use crate::gap::{rating, selector, GapError};
use crate::store::Store;

/// Runs the gap test against persisted per-user rating state.
///
/// Every operation loads the whole `RatingState`, transforms it and writes it
/// back while holding a per-user lock, so two requests for the same user never
/// interleave their read-modify-write.
pub struct GapEngine {
    config: Arc<GapConfig>,
    pool: Arc<QuestionPool>,
    store: Arc<Store>,
    user_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl GapEngine {
    pub fn new(config: GapConfig, pool: Arc<QuestionPool>, store: Arc<Store>) -> Self {
        Self {
            config: Arc::new(config),
            pool,
            store,
            user_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &GapConfig {
        &self.config
    }

    pub fn pool(&self) -> &QuestionPool {
        &self.pool
    }

    async fn acquire_user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.user_locks.lock().await;

        // Drop idle entries; strong_count == 1 means only the map holds it.
        if locks.len() > 1000 {
            locks.retain(|_, v| Arc::strong_count(v) > 1);
        }

        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn load_or_init_state(&self, user_id: &str) -> Result<RatingState, GapError> {
        Ok(match self.store.get_rating_state(user_id)? {
            Some(state) => state.conform(&self.config),
            None => RatingState::new(&self.config),
        })
    }

    pub async fn next_question(&self, user_id: &str) -> Result<Selection, GapError> {
        let user_lock = self.acquire_user_lock(user_id).await;
        let _guard = user_lock.lock().await;

        let state = self.load_or_init_state(user_id)?;
        let (selection, state) = {
            let mut rng = rand::thread_rng();
            selector::select_next(state, &self.pool, &self.config, &mut rng)
        };
        self.store.set_rating_state(user_id, &state)?;

        match &selection {
            Selection::Presented(question) => {
                tracing::info!(user_id, question_id = question.id, "Served gap question");
            }
            Selection::Exhausted { topic } => {
                tracing::info!(
                    user_id,
                    topic = topic.as_ref().map(|t| t.as_str()).unwrap_or("-"),
                    "Gap question pool exhausted"
                );
            }
        }

        Ok(selection)
    }

    /// Scores `answer` for `question_id` and updates the topic rating.
    /// Input is checked before any state is touched.
    pub async fn evaluate_answer(
        &self,
        user_id: &str,
        question_id: u32,
        answer: Option<&str>,
    ) -> Result<Evaluation, GapError> {
        let question = self
            .pool
            .get(question_id)
            .ok_or(GapError::QuestionNotFound(question_id))?;

        let answer = match answer {
            Some(a) if !a.trim().is_empty() => a,
            _ => return Err(GapError::InvalidInput("No answer provided".to_string())),
        };
        let correct = question.is_correct(answer);

        let user_lock = self.acquire_user_lock(user_id).await;
        let _guard = user_lock.lock().await;

        let state = self.load_or_init_state(user_id)?;
        let previous_rating = state
            .rating(&question.topic)
            .ok_or_else(|| GapError::UnknownTopic(question.topic.to_string()))?;
        let (new_rating, state) = rating::evaluate(
            state,
            &question.topic,
            question.difficulty,
            correct,
            &self.config,
        )?;
        self.store.set_rating_state(user_id, &state)?;

        tracing::info!(
            user_id,
            question_id,
            topic = %question.topic,
            correct,
            previous_rating,
            new_rating,
            "Evaluated gap answer"
        );

        Ok(Evaluation {
            question_id,
            topic: question.topic.clone(),
            correct,
            previous_rating,
            new_rating,
            average_rating: state.average_rating(),
        })
    }

    pub async fn reset(&self, user_id: &str) -> Result<RatingState, GapError> {
        let user_lock = self.acquire_user_lock(user_id).await;
        let _guard = user_lock.lock().await;

        let state = RatingState::new(&self.config);
        self.store.set_rating_state(user_id, &state)?;
        tracing::info!(user_id, "Gap test reset");
        Ok(state)
    }

    /// Current ratings, or `None` if the user never started the gap test.
    pub fn summary(&self, user_id: &str) -> Result<Option<GapSummary>, GapError> {
        Ok(self
            .store
            .get_rating_state(user_id)?
            .map(|state| state.conform(&self.config).summary()))
    }

    #[cfg(test)]
    fn state(&self, user_id: &str) -> Result<RatingState, GapError> {
        self.load_or_init_state(user_id)
    }
}
