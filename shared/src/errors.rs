use thiserror::Error;

#[derive(Error, Debug)]
pub enum RestoreError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("S3 error: {0}")]
    S3Error(String),

    #[error("KMS error: {0}")]
    KMSError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Cognito error: {0}")]
    CognitoError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<serde_json::Error> for RestoreError {
    fn from(err: serde_json::Error) -> Self {
        RestoreError::SerializationError(err.to_string())
    }
}

pub type RestoreResult<T> = Result<T, RestoreError>;
