use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::assessment::technical::{BankError, TechnicalBank, TechnicalTest};
use crate::config::Config;
use crate::gap::config::GapConfig;
use crate::gap::engine::GapEngine;
use crate::gap::pool::{PoolError, QuestionPool};
use crate::services::code_sandbox::CodeSandbox;
use crate::services::llm_provider::LlmProvider;
use crate::store::Store;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to load gap question bank: {0}")]
    GapBank(#[from] PoolError),
    #[error("failed to load technical question bank: {0}")]
    TechnicalBank(#[from] BankError),
}

#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
    gap: Arc<GapEngine>,
    technical: Arc<TechnicalTest>,
    llm: Arc<LlmProvider>,
    config: Arc<Config>,
    started_at: Instant,
}

impl AppState {
    pub fn new(
        store: Arc<Store>,
        gap: Arc<GapEngine>,
        technical: Arc<TechnicalTest>,
        llm: LlmProvider,
        config: &Config,
    ) -> Self {
        Self {
            store,
            gap,
            technical,
            llm: Arc::new(llm),
            config: Arc::new(config.clone()),
            started_at: Instant::now(),
        }
    }

    /// Validates configuration, loads both question banks and wires the
    /// engines over `store`. A missing bank path yields an empty bank.
    pub fn build(store: Arc<Store>, config: &Config) -> Result<Self, StartupError> {
        LlmProvider::validate_config(&config.llm).map_err(StartupError::InvalidConfig)?;

        let gap_config = GapConfig::from_env(&config.gap);
        gap_config.validate().map_err(StartupError::InvalidConfig)?;

        let pool = if Path::new(&config.question_bank_dir).exists() {
            QuestionPool::load_dir(&config.question_bank_dir, &gap_config)?
        } else {
            tracing::warn!(
                dir = %config.question_bank_dir,
                "Gap question bank directory not found, starting with an empty pool"
            );
            QuestionPool::empty()
        };
        for topic in &gap_config.topics {
            if pool.topic_count(topic) == 0 {
                tracing::warn!(%topic, "Gap topic has no questions");
            }
        }

        let bank = if Path::new(&config.tech_questions_path).exists() {
            TechnicalBank::load(&config.tech_questions_path)?
        } else {
            tracing::warn!(
                path = %config.tech_questions_path,
                "Technical question bank not found, starting with an empty bank"
            );
            TechnicalBank::default()
        };

        tracing::info!(
            gap_questions = pool.len(),
            technical_questions = bank.len(),
            topics = gap_config.topics.len(),
            "Question banks ready"
        );

        let gap = Arc::new(GapEngine::new(gap_config, Arc::new(pool), store.clone()));
        let technical = Arc::new(TechnicalTest::new(
            Arc::new(bank),
            CodeSandbox::new(&config.sandbox),
            store.clone(),
        ));
        let llm = LlmProvider::new(&config.llm);

        Ok(Self::new(store, gap, technical, llm, config))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn gap(&self) -> &GapEngine {
        &self.gap
    }

    pub fn technical(&self) -> &TechnicalTest {
        &self.technical
    }

    pub fn llm(&self) -> &LlmProvider {
        &self.llm
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &Path) -> Config {
        let mut config = Config::from_env();
        config.sled_path = dir.join("db").to_string_lossy().to_string();
        config.question_bank_dir = dir.join("missing-bank").to_string_lossy().to_string();
        config.tech_questions_path = dir.join("missing.json").to_string_lossy().to_string();
        config.gap.topics = None;
        config.llm.enabled = false;
        config
    }

    #[tokio::test]
    async fn missing_banks_start_empty() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let config = test_config(tmp.path());
        let store = Arc::new(Store::open(&config.sled_path).unwrap());
        let state = AppState::build(store, &config).unwrap();
        assert!(state.gap().pool().is_empty());
        assert!(state.technical().bank().is_empty());
    }

    #[tokio::test]
    async fn live_llm_without_key_is_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut config = test_config(tmp.path());
        config.llm.enabled = true;
        config.llm.mock = false;
        config.llm.api_key = String::new();
        let store = Arc::new(Store::open(&config.sled_path).unwrap());
        let err = AppState::build(store, &config).err().unwrap();
        assert!(matches!(err, StartupError::InvalidConfig(_)));
    }
}
