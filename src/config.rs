use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub cors_origin: String,
    pub question_bank_dir: String,
    pub tech_questions_path: String,
    pub gap: GapEnvConfig,
    pub llm: LLMConfig,
    pub sandbox: SandboxConfig,
}

#[derive(Debug, Clone, Default)]
pub struct GapEnvConfig {
    /// `GAP_TOPICS`, `;`-separated. `None` keeps the built-in topic list.
    pub topics: Option<Vec<String>>,
}

#[derive(Clone)]
pub struct LLMConfig {
    pub enabled: bool,
    pub mock: bool,
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SandboxConfig {
    pub enabled: bool,
    pub mock: bool,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LLMConfig")
            .field("enabled", &self.enabled)
            .field("mock", &self.mock)
            .field("api_url", &self.api_url)
            .field("api_key", &"***REDACTED***")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            sled_path: env_or("SLED_PATH", "./data/assessment.sled"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173"),
            question_bank_dir: env_or("QUESTION_BANK_DIR", "./questions"),
            tech_questions_path: env_or("TECH_QUESTIONS_PATH", "./data/tech_questions.json"),
            gap: GapEnvConfig {
                topics: env_list("GAP_TOPICS"),
            },
            llm: LLMConfig {
                enabled: env_or_bool("LLM_ENABLED", false),
                mock: env_or_bool("LLM_MOCK", true),
                api_url: env_or("LLM_API_URL", "https://openrouter.ai/api/v1/chat/completions"),
                api_key: env_or("LLM_API_KEY", ""),
                model: env_or("LLM_MODEL", "gpt-3.5-turbo"),
                timeout_secs: env_or_parse("LLM_TIMEOUT_SECS", 60_u64),
            },
            sandbox: SandboxConfig {
                enabled: env_or_bool("SANDBOX_ENABLED", true),
                mock: env_or_bool("SANDBOX_MOCK", false),
                api_url: env_or("SANDBOX_API_URL", "https://emkc.org/api/v2/piston/execute"),
                timeout_secs: env_or_parse("SANDBOX_TIMEOUT_SECS", 20_u64),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// `;`-separated list; blank entries are dropped and an all-blank value
/// counts as unset.
pub fn env_list(key: &str) -> Option<Vec<String>> {
    let raw = env::var(key).ok()?;
    let items: Vec<String> = raw
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
