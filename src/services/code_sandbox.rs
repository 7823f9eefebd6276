//! Remote code execution for the technical test, speaking the Piston
//! `execute` protocol.

use serde::{Deserialize, Serialize};

use crate::config::SandboxConfig;

#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("code sandbox is disabled")]
    Disabled,
    #[error("code sandbox request timed out")]
    Timeout,
    #[error("code sandbox network error: {0}")]
    Network(String),
    #[error("code sandbox error: status={status}, message={message}")]
    ApiError { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct CodeSandbox {
    config: SandboxConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: [SourceFile<'a>; 1],
    stdin: &'a str,
}

#[derive(Serialize)]
struct SourceFile<'a> {
    name: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    run: RunOutput,
}

#[derive(Default, Deserialize)]
struct RunOutput {
    #[serde(default)]
    output: String,
}

impl CodeSandbox {
    pub fn new(config: &SandboxConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config: config.clone(),
            client,
        }
    }

    /// Runs `code` with `stdin` and returns the combined output, trimmed.
    /// Mock mode echoes `stdin`.
    pub async fn execute(&self, language: &str, code: &str, stdin: &str) -> Result<String, SandboxError> {
        if !self.config.enabled {
            return Err(SandboxError::Disabled);
        }
        if self.config.mock {
            return Ok(stdin.trim().to_string());
        }

        let request = ExecuteRequest {
            language,
            version: "*",
            files: [SourceFile {
                name: "main",
                content: code,
            }],
            stdin,
        };
        let response = self
            .client
            .post(&self.config.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SandboxError::Timeout
                } else {
                    SandboxError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SandboxError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: ExecuteResponse = response
            .json()
            .await
            .map_err(|e| SandboxError::Network(e.to_string()))?;
        tracing::debug!(language, output_len = body.run.output.len(), "Sandbox run finished");
        Ok(body.run.output.trim().to_string())
    }
}
