//! Unified application error type.
//! All modules (store, bot, transport, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Record store
    // ---------------------------
    #[error("Record store not found: {0}")]
    StoreMissing(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed row {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    // ---------------------------
    // Workflow errors
    // ---------------------------
    #[error("Permission denied for user {0}")]
    PermissionDenied(i64),

    #[error("No pending action for chat {0}")]
    SessionLost(i64),

    #[error("Forwarded location rejected for user {0}")]
    ForwardedLocationRejected(i64),

    // ---------------------------
    // Delivery errors
    // ---------------------------
    #[error("Failed to notify administrator: {0}")]
    NotificationDeliveryFailed(String),

    #[error("Failed to deliver periodic export: {0}")]
    ExportDeliveryFailed(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Bot API error: {0}")]
    Api(String),

    // ---------------------------
    // Config / serialization errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
