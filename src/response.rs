use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::assessment::personality::PersonalityError;
use crate::assessment::report::ReportError;
use crate::assessment::technical::TechnicalError;
use crate::gap::GapError;
use crate::services::code_sandbox::SandboxError;
use crate::services::llm_provider::LlmError;
use crate::store::StoreError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub trace_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub is_operational: bool,
}

impl AppError {
    fn operational(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            code: code.to_string(),
            message: message.to_string(),
            is_operational: true,
        }
    }

    pub fn bad_request(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn not_found(message: &str) -> Self {
        Self::operational(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn conflict(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::CONFLICT, code, message)
    }

    pub fn payload_too_large(message: &str) -> Self {
        Self::operational(StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", message)
    }

    pub fn bad_gateway(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::BAD_GATEWAY, code, message)
    }

    pub fn gateway_timeout(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::GATEWAY_TIMEOUT, code, message)
    }

    pub fn service_unavailable(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::SERVICE_UNAVAILABLE, code, message)
    }

    pub fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR".to_string(),
            message: message.to_string(),
            is_operational: false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let exposed_message = if self.is_operational {
            self.message.clone()
        } else {
            "Internal server error".to_string()
        };

        if self.is_operational {
            tracing::warn!(status = %self.status, code = %self.code, error = %self.message, "API error");
        } else {
            tracing::error!(status = %self.status, code = %self.code, error = %self.message, "Internal API error");
        }

        (
            self.status,
            Json(ErrorBody {
                success: false,
                code: self.code,
                message: exposed_message,
                trace_id: None,
            }),
        )
            .into_response()
    }
}

// Conflict messages describe user input and are safe to expose; everything
// else is redacted in IntoResponse.
impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match &value {
            StoreError::Conflict { entity, .. } if entity == "username" => {
                AppError::conflict("USERNAME_TAKEN", "Username is already registered")
            }
            StoreError::Conflict { entity, .. } if entity == "user_email" => {
                AppError::conflict("EMAIL_TAKEN", "Email is already registered")
            }
            StoreError::Conflict { entity, .. } => {
                AppError::conflict("CONFLICT", &format!("{entity} already exists"))
            }
            _ => AppError::internal(&value.to_string()),
        }
    }
}

impl From<GapError> for AppError {
    fn from(value: GapError) -> Self {
        match value {
            GapError::QuestionNotFound(id) => AppError::operational(
                StatusCode::NOT_FOUND,
                "QUESTION_NOT_FOUND",
                &format!("Question {id} not found"),
            ),
            GapError::InvalidInput(msg) => AppError::bad_request("INVALID_INPUT", &msg),
            GapError::UnknownTopic(topic) => {
                AppError::internal(&format!("question references unconfigured topic {topic}"))
            }
            GapError::Storage(e) => e.into(),
        }
    }
}

impl From<SandboxError> for AppError {
    fn from(value: SandboxError) -> Self {
        match value {
            SandboxError::Disabled => {
                AppError::service_unavailable("SANDBOX_DISABLED", "Code execution is disabled")
            }
            SandboxError::Timeout => {
                AppError::gateway_timeout("SANDBOX_TIMEOUT", "Code execution timed out")
            }
            other => {
                tracing::warn!(error = %other, "Code sandbox failure");
                AppError::bad_gateway("SANDBOX_ERROR", "Code execution failed")
            }
        }
    }
}

impl From<TechnicalError> for AppError {
    fn from(value: TechnicalError) -> Self {
        match value {
            TechnicalError::QuestionNotFound(_) => AppError::operational(
                StatusCode::NOT_FOUND,
                "QUESTION_NOT_FOUND",
                "Question not found",
            ),
            e @ TechnicalError::LineCount { .. } => {
                AppError::bad_request("LINE_COUNT_OUT_OF_RANGE", &e.to_string())
            }
            e @ TechnicalError::WrongOutput { .. } => {
                AppError::bad_request("INCORRECT_OUTPUT", &e.to_string())
            }
            TechnicalError::InvalidInput(msg) => AppError::bad_request("INVALID_INPUT", &msg),
            TechnicalError::Sandbox(e) => e.into(),
            TechnicalError::Storage(e) => e.into(),
        }
    }
}

impl From<PersonalityError> for AppError {
    fn from(value: PersonalityError) -> Self {
        AppError::bad_request("INVALID_INPUT", &value.to_string())
    }
}

impl From<LlmError> for AppError {
    fn from(value: LlmError) -> Self {
        match value {
            LlmError::Disabled => AppError::service_unavailable(
                "LLM_DISABLED",
                "Career guidance generation is disabled",
            ),
            LlmError::Timeout => {
                AppError::gateway_timeout("LLM_TIMEOUT", "Career guidance request timed out")
            }
            other => {
                tracing::warn!(error = %other, "LLM provider failure");
                AppError::bad_gateway("LLM_ERROR", "Career guidance provider failed")
            }
        }
    }
}

impl From<ReportError> for AppError {
    fn from(value: ReportError) -> Self {
        match value {
            ReportError::Llm(e) => e.into(),
            ReportError::Gap(e) => e.into(),
            ReportError::Storage(e) => e.into(),
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data,
        }),
    )
}

pub fn created<T: Serialize>(data: T) -> impl IntoResponse {
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            data,
        }),
    )
}

pub fn paginated<T: Serialize>(
    data: Vec<T>,
    total: usize,
    limit: usize,
    offset: usize,
) -> impl IntoResponse {
    ok(PaginatedResponse {
        data,
        total,
        limit,
        offset,
    })
}
