//! Custom error types for StokWELL
//!
//! Domain outcomes (duplicate keys, bad credentials, membership problems) and
//! fatal storage failures share one enum so callers can match on the kind
//! and front ends can show the message verbatim.

use thiserror::Error;

/// The main error type for StokWELL operations
#[derive(Error, Debug)]
pub enum StokwellError {
    /// Registration with a username that is already taken
    #[error("Username already exists: {0}")]
    DuplicateUser(String),

    /// Creation of a stokvel whose name is already taken
    #[error("Stokvel already exists: {0}")]
    DuplicateStokvel(String),

    /// Unknown username or wrong password; deliberately carries no detail
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// Reference to a stokvel that does not exist
    #[error("Stokvel not found: {0}")]
    StokvelNotFound(String),

    /// Reference to a user that does not exist
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Action requires membership the user does not hold
    #[error("{username} is not a member of {stokvel}")]
    NotAMember { username: String, stokvel: String },

    /// Join attempted by an existing member
    #[error("{username} is already a member of {stokvel}")]
    AlreadyMember { username: String, stokvel: String },

    /// Non-positive or unparseable amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Validation errors for names and other input
    #[error("Validation error: {0}")]
    Validation(String),

    /// The durable store could not be read or written
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors outside the ledger store
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Encryption errors
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl StokwellError {
    /// Create a "not a member" error
    pub fn not_a_member(username: impl Into<String>, stokvel: impl Into<String>) -> Self {
        Self::NotAMember {
            username: username.into(),
            stokvel: stokvel.into(),
        }
    }

    /// Create an "already a member" error
    pub fn already_member(username: impl Into<String>, stokvel: impl Into<String>) -> Self {
        Self::AlreadyMember {
            username: username.into(),
            stokvel: stokvel.into(),
        }
    }

    /// Check if this is a recoverable domain outcome rather than a fatal failure
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::DuplicateUser(_)
                | Self::DuplicateStokvel(_)
                | Self::InvalidCredentials
                | Self::StokvelNotFound(_)
                | Self::UserNotFound(_)
                | Self::NotAMember { .. }
                | Self::AlreadyMember { .. }
                | Self::InvalidAmount(_)
                | Self::Validation(_)
        )
    }
}

impl From<std::io::Error> for StokwellError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StokwellError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for StokWELL operations
pub type StokwellResult<T> = Result<T, StokwellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StokwellError::DuplicateUser("alice".into());
        assert_eq!(err.to_string(), "Username already exists: alice");

        let err = StokwellError::not_a_member("bob", "SavingsCircle");
        assert_eq!(err.to_string(), "bob is not a member of SavingsCircle");
    }

    #[test]
    fn test_invalid_credentials_has_no_detail() {
        assert_eq!(
            StokwellError::InvalidCredentials.to_string(),
            "Invalid credentials."
        );
    }

    #[test]
    fn test_domain_classification() {
        assert!(StokwellError::InvalidAmount("-5".into()).is_domain());
        assert!(StokwellError::already_member("a", "b").is_domain());
        assert!(!StokwellError::Persistence("disk full".into()).is_domain());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StokwellError = io_err.into();
        assert!(matches!(err, StokwellError::Io(_)));
    }
}
