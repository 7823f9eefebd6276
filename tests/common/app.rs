use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use assessment_backend::config::{Config, GapEnvConfig, LLMConfig, SandboxConfig};
use assessment_backend::routes::build_router;
use assessment_backend::state::AppState;
use assessment_backend::store::Store;

use super::fixtures;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    _temp_dir: TempDir,
}

pub struct TestOptions {
    pub llm_enabled: bool,
    pub gap_topics: Vec<&'static str>,
    pub gap_questions_per_tier: u32,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            llm_enabled: true,
            gap_topics: vec!["Databases", "Networking"],
            gap_questions_per_tier: 2,
        }
    }
}

/// Builds a `Config` directly; `set_var` would race between parallel tests.
fn test_config(dir: &Path, options: &TestOptions) -> Config {
    Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        sled_path: dir.join("assessment-test.sled").to_string_lossy().to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        question_bank_dir: dir.join("questions").to_string_lossy().to_string(),
        tech_questions_path: dir.join("tech_questions.json").to_string_lossy().to_string(),
        gap: GapEnvConfig {
            topics: Some(options.gap_topics.iter().map(|t| t.to_string()).collect()),
        },
        llm: LLMConfig {
            enabled: options.llm_enabled,
            mock: true,
            api_url: String::new(),
            api_key: String::new(),
            model: "test-model".to_string(),
            timeout_secs: 5,
        },
        sandbox: SandboxConfig {
            enabled: true,
            mock: true,
            api_url: String::new(),
            timeout_secs: 5,
        },
    }
}

pub async fn spawn_with(options: TestOptions) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(temp_dir.path(), &options);

    fixtures::write_gap_bank(
        Path::new(&config.question_bank_dir),
        &options.gap_topics,
        options.gap_questions_per_tier,
    );
    fixtures::write_technical_bank(Path::new(&config.tech_questions_path));

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    store.run_migrations().expect("run migrations");

    let state = AppState::build(store, &config).expect("build state");
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        _temp_dir: temp_dir,
    }
}

pub async fn spawn_test_server() -> TestApp {
    spawn_with(TestOptions::default()).await
}
