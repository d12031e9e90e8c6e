use thiserror::Error;

/// SQLSTATE codes raised by stored routines to signal a domain-level
/// rejection rather than an infrastructure failure. Handlers surface these
/// as client errors with the routine-supplied message; everything else is an
/// opaque server failure. Extend the table as routines gain codes.
pub const BUSINESS_RULE_CODES: &[&str] = &["51000"];

#[derive(Debug, Error)]
pub enum TodolistError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("database operation error: {0}")]
    DatabaseOperation(String),
    #[error("business rule violation ({code}): {message}")]
    BusinessRule { code: String, message: String },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("operation timed out: {0}")]
    Timeout(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type TodolistResult<T> = Result<T, TodolistError>;

/// True if `code` is a SQLSTATE the persistence layer uses for domain
/// rejections.
pub fn is_business_rule_code(code: &str) -> bool {
    BUSINESS_RULE_CODES.contains(&code)
}

impl TodolistError {
    pub fn database_error<S: Into<String>>(msg: S) -> Self {
        Self::DatabaseOperation(msg.into())
    }
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Self::Timeout(msg.into())
    }

    /// Classify a driver error raised while executing a stored routine.
    /// Codes in [`BUSINESS_RULE_CODES`] become [`TodolistError::BusinessRule`]
    /// carrying the routine's message; anything else stays a database error.
    pub fn from_routine_error(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(code) = db_err.code() {
                if is_business_rule_code(code.as_ref()) {
                    return Self::BusinessRule {
                        code: code.into_owned(),
                        message: db_err.message().to_string(),
                    };
                }
            }
        }
        Self::Database(err)
    }

    pub fn is_business_rule(&self) -> bool {
        matches!(self, Self::BusinessRule { .. })
    }

    /// The client-facing message for a business-rule violation, if any.
    pub fn business_rule_message(&self) -> Option<&str> {
        match self {
            Self::BusinessRule { message, .. } => Some(message),
            _ => None,
        }
    }
}
