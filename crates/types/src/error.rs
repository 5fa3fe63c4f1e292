//! Error types for the weave transactor

use thiserror::Error;

/// Main error type for transaction construction, submission and confirmation
#[derive(Error, Debug)]
pub enum TransactorError {
    /// Node address was malformed or the client could not be dialed
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    /// Fetching a fresh anchor from the node failed
    #[error("Anchor unavailable: {0}")]
    AnchorUnavailable(#[source] NodeError),

    /// Fetching a fee estimate from the node failed
    #[error("Fee estimate unavailable: {0}")]
    FeeEstimateUnavailable(#[source] NodeError),

    /// The node returned a fee estimate that is not a decimal integer
    #[error("Invalid fee format: {value}")]
    InvalidFeeFormat { value: String },

    /// Estimated fee is above the caller's ceiling
    #[error("Transfer fee {fee} exceeds limit {max_fee}")]
    FeeExceedsLimit { fee: String, max_fee: String },

    /// Amount could not be parsed or cannot cover the fee
    #[error("Invalid amount {amount}: {reason}")]
    InvalidAmount { amount: String, reason: String },

    /// A base64url transaction field could not be decoded
    #[error("Invalid encoding of {field}: {reason}")]
    InvalidEncoding { field: String, reason: String },

    /// Transaction has no signature
    #[error("Transaction missing signature")]
    MissingSignature,

    /// Commit to the node failed
    #[error("Submission failure: {0}")]
    SubmissionFailure(#[source] NodeError),

    /// Transient error while polling for a transaction
    #[error("Error retrieving transaction {tx_id}: {source}")]
    PollingError {
        tx_id: String,
        #[source]
        source: NodeError,
    },

    /// The caller's context was cancelled or its deadline passed
    #[error("Operation cancelled: {0}")]
    Cancelled(CancelReason),

    /// Wire encoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for transactor operations
pub type Result<T> = std::result::Result<T, TransactorError>;

/// Discriminant of [`TransactorError`], for callers that branch on the failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ConnectionFailure,
    AnchorUnavailable,
    FeeEstimateUnavailable,
    InvalidFeeFormat,
    FeeExceedsLimit,
    InvalidAmount,
    InvalidEncoding,
    MissingSignature,
    SubmissionFailure,
    PollingError,
    Cancelled,
    Serialization,
    Config,
}

impl TransactorError {
    /// Failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransactorError::ConnectionFailure(_) => ErrorKind::ConnectionFailure,
            TransactorError::AnchorUnavailable(_) => ErrorKind::AnchorUnavailable,
            TransactorError::FeeEstimateUnavailable(_) => ErrorKind::FeeEstimateUnavailable,
            TransactorError::InvalidFeeFormat { .. } => ErrorKind::InvalidFeeFormat,
            TransactorError::FeeExceedsLimit { .. } => ErrorKind::FeeExceedsLimit,
            TransactorError::InvalidAmount { .. } => ErrorKind::InvalidAmount,
            TransactorError::InvalidEncoding { .. } => ErrorKind::InvalidEncoding,
            TransactorError::MissingSignature => ErrorKind::MissingSignature,
            TransactorError::SubmissionFailure(_) => ErrorKind::SubmissionFailure,
            TransactorError::PollingError { .. } => ErrorKind::PollingError,
            TransactorError::Cancelled(_) => ErrorKind::Cancelled,
            TransactorError::Serialization(_) => ErrorKind::Serialization,
            TransactorError::Config(_) => ErrorKind::Config,
        }
    }
}

/// Why a context stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Explicitly cancelled by the caller
    Cancelled,
    /// The context deadline passed
    DeadlineExceeded,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::Cancelled => write!(f, "context canceled"),
            CancelReason::DeadlineExceeded => write!(f, "context deadline exceeded"),
        }
    }
}

/// Node communication specific errors
#[derive(Error, Debug)]
pub enum NodeError {
    /// Request timed out
    #[error("Request to {endpoint} timed out")]
    Timeout { endpoint: String },

    /// Request could not be sent
    #[error("Request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    /// Non-success HTTP status
    #[error("HTTP error from {endpoint}: {status}")]
    HttpError { endpoint: String, status: u16 },

    /// Node refused the request and explained why
    #[error("Request to {endpoint} rejected with {status}: {reason}")]
    Rejected {
        endpoint: String,
        status: u16,
        reason: String,
    },

    /// Body could not be read or decoded
    #[error("Invalid response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },

    /// Resource is unknown to the node
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Node URL is malformed or uses an unsupported scheme
    #[error("Invalid node URL: {0}")]
    InvalidUrl(String),
}

/// Configuration specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Validation error
    #[error("Configuration validation error: {field}: {message}")]
    ValidationError { field: String, message: String },
}

impl From<ConfigError> for TransactorError {
    fn from(err: ConfigError) -> Self {
        TransactorError::Config(err.to_string())
    }
}
