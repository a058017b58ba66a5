//! Error types for the marketplace core

use std::fmt;
use thiserror::Error;

/// Input rejected before anything is sent to the backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be a non-negative amount, got {value}")]
    NegativeAmount { field: &'static str, value: f64 },

    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    #[error("{file_name} is {size} bytes; images may be at most {max} bytes")]
    FileTooLarge {
        file_name: String,
        size: usize,
        max: usize,
    },

    #[error("{file_name} is empty")]
    EmptyFile { file_name: String },

    #[error("{file_name} has unsupported type {content_type}; use JPEG, PNG or WEBP")]
    UnsupportedFileType {
        file_name: String,
        content_type: String,
    },

    #[error("nothing to update")]
    EmptyUpdate,
}

/// Unified error type for marketplace operations
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No session, or the session's actor may not perform the action
    #[error("Not authorized: {0}")]
    Forbidden(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The record is no longer in the state the operation requires
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// ROI computation could not be obtained
    #[error("Calculation failed: {0}")]
    Calculation(String),
}

impl MarketError {
    pub fn forbidden<T: fmt::Display>(msg: T) -> Self {
        MarketError::Forbidden(msg.to_string())
    }

    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        MarketError::Auth(msg.to_string())
    }

    pub fn not_found<T: fmt::Display>(what: T) -> Self {
        MarketError::NotFound(what.to_string())
    }

    pub fn backend<T: fmt::Display>(msg: T) -> Self {
        MarketError::Backend(msg.to_string())
    }

    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        MarketError::Storage(msg.to_string())
    }

    pub fn calculation<T: fmt::Display>(msg: T) -> Self {
        MarketError::Calculation(msg.to_string())
    }

    /// Whether the actor can fix this by changing their input
    pub fn is_validation(&self) -> bool {
        matches!(self, MarketError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
