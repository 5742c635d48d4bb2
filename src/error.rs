use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RapierError {
    // Caller errors
    Unauthenticated,
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    InactiveAccount,
    ValidationError(String),

    // Internal errors
    AuthError(String),
    StorageError(String),

    // Configuration errors
    ConfigError(String),
}

impl RapierError {
    /// Stable machine-readable code used in response bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::InactiveAccount => "INACTIVE_ACCOUNT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::AuthError(_) | Self::StorageError(_) | Self::ConfigError(_) => "INTERNAL_ERROR",
        }
    }

    /// True for failures the caller cannot fix by changing the request
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::AuthError(_) | Self::StorageError(_) | Self::ConfigError(_)
        )
    }
}

impl fmt::Display for RapierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "Could not validate credentials"),
            Self::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            Self::NotFound(what) => write!(f, "{} not found", what),
            Self::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Self::InactiveAccount => write!(f, "Inactive user"),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::AuthError(msg) => write!(f, "Authentication error: {}", msg),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for RapierError {}

// Generic result type for the service
pub type Result<T> = std::result::Result<T, RapierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_errors_share_code() {
        assert_eq!(RapierError::StorageError("x".into()).code(), "INTERNAL_ERROR");
        assert_eq!(RapierError::AuthError("x".into()).code(), "INTERNAL_ERROR");
        assert!(RapierError::StorageError("x".into()).is_internal());
        assert!(!RapierError::Conflict("x".into()).is_internal());
    }

    #[test]
    fn test_not_found_message() {
        let err = RapierError::NotFound("Company".to_string());
        assert_eq!(err.to_string(), "Company not found");
    }
}
