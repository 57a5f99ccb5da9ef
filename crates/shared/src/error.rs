use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DESCRIPTION_MAX_CHARS, LEVEL_MAX, LEVEL_MIN, TITLE_MAX_CHARS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Storage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters (got {chars})", max = TITLE_MAX_CHARS)]
    TitleTooLong { chars: usize },
    #[error(
        "description must be at most {max} characters (got {chars})",
        max = DESCRIPTION_MAX_CHARS
    )]
    DescriptionTooLong { chars: usize },
    #[error("level must be between {min} and {max} (got {0})", min = LEVEL_MIN, max = LEVEL_MAX)]
    LevelOutOfRange(i32),
    #[error("level must be a whole number (got '{0}')")]
    InvalidLevel(String),
    #[error("id must be a whole number (got '{0}')")]
    InvalidId(String),
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::new(ErrorCode::Validation, value.to_string())
    }
}
