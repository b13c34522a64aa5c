// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent user-facing messages.

use crate::config::ConfigError;
use crate::db::StoreError;
use crate::models::DecodeError;

/// Application error type returned by every manager operation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Decoding error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Row store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable short code for the error class.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated => "unauthenticated",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Conflict(_) => "conflict",
            AppError::Decode(_) => "decode_error",
            AppError::Store(_) => "store_error",
            AppError::Config(_) => "config_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Message suitable for showing next to the control that triggered the
    /// operation. Transport and decoding failures collapse into one generic
    /// "operation failed" message; the detail is logged instead.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthenticated => "Please sign in again.".to_string(),
            AppError::InvalidInput(msg) | AppError::Conflict(msg) => msg.clone(),
            AppError::Decode(err) => {
                tracing::error!(error = %err, "Decoding error");
                "The operation failed. Please try again.".to_string()
            }
            AppError::Store(err) => {
                tracing::error!(error = %err, "Row store error");
                "The operation failed. Please try again.".to_string()
            }
            AppError::Config(err) => {
                tracing::error!(error = %err, "Configuration error");
                "The app is not configured correctly.".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                "The operation failed. Please try again.".to_string()
            }
        }
    }

    /// Whether retrying the same action may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AppError::Store(StoreError::Transport(_)) | AppError::Store(StoreError::Offline)
        ) || matches!(self, AppError::Store(StoreError::Status { status, .. }) if *status >= 500)
    }
}

/// Result type alias for manager operations.
pub type Result<T> = std::result::Result<T, AppError>;
