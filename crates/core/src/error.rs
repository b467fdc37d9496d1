//! Unified error types for the survey engine.
//!
//! Error codes:
//! - VALID_001-003: Submission validation errors
//! - DB_001-004: Record store errors
//! - MIRROR_001-003: Spreadsheet mirror errors

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// VALID_001: Invalid JSON / invalid format
    InvalidFormat,
    /// VALID_002: Submission body exceeds the size limit
    PayloadTooLarge,
    /// VALID_003: A field violates its length constraint
    FieldConstraint,
}

impl ValidationErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "VALID_001",
            Self::PayloadTooLarge => "VALID_002",
            Self::FieldConstraint => "VALID_003",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::PayloadTooLarge => 413,
            _ => 400,
        }
    }
}

/// Record store error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorCode {
    /// DB_001: Failed to open or initialize the store
    OpenFailed,
    /// DB_002: Failed to insert a response
    InsertFailed,
    /// DB_003: Failed to read responses
    QueryFailed,
    /// DB_004: Store is not available in this process
    Unavailable,
}

impl DbErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::OpenFailed => "DB_001",
            Self::InsertFailed => "DB_002",
            Self::QueryFailed => "DB_003",
            Self::Unavailable => "DB_004",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        500
    }
}

/// Spreadsheet mirror error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorErrorCode {
    /// MIRROR_001: Transport failure reaching the mirror
    Transport,
    /// MIRROR_002: Mirror answered with a non-success status
    Status,
    /// MIRROR_003: Mirror body could not be read as records
    InvalidBody,
}

impl MirrorErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport => "MIRROR_001",
            Self::Status => "MIRROR_002",
            Self::InvalidBody => "MIRROR_003",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        502
    }
}

/// Unified error type for the survey engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Validation error with code.
    #[error("[{code}] {message}")]
    ValidationWithCode {
        code: &'static str,
        message: String,
        http_status: u16,
        details: Vec<String>,
    },

    /// Record store error with code.
    #[error("[{code}] {message}")]
    Database {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    /// Mirror error with code.
    #[error("[{code}] {message}")]
    Mirror {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error with code.
    pub fn validation_code(code: ValidationErrorCode, msg: impl Into<String>) -> Self {
        Self::ValidationWithCode {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
            details: Vec::new(),
        }
    }

    /// Create a field constraint error carrying one detail line per field.
    pub fn field_constraints(details: Vec<String>) -> Self {
        let code = ValidationErrorCode::FieldConstraint;
        Self::ValidationWithCode {
            code: code.code(),
            message: "Validation failed".to_string(),
            http_status: code.http_status(),
            details,
        }
    }

    /// Create a record store error.
    pub fn database(code: DbErrorCode, msg: impl Into<String>) -> Self {
        Self::Database {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Create a mirror error.
    pub fn mirror(code: MirrorErrorCode, msg: impl Into<String>) -> Self {
        Self::Mirror {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ValidationWithCode { http_status, .. } => *http_status,
            Self::Database { http_status, .. } => *http_status,
            Self::Mirror { http_status, .. } => *http_status,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code if this is a coded error.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::ValidationWithCode { code, .. } => Some(code),
            Self::Database { code, .. } => Some(code),
            Self::Mirror { code, .. } => Some(code),
            _ => None,
        }
    }
}
