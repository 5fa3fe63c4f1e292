//! Shared types for the weave transactor
//!
//! This crate contains the transaction record, node metadata types, decimal
//! quantity helpers and the error taxonomy used across the workspace.

pub mod amount;
pub mod error;
pub mod network;
pub mod transaction;

// Re-export commonly used types
pub use error::{CancelReason, ConfigError, ErrorKind, NodeError, Result, TransactorError};
pub use network::*;
pub use transaction::Transaction;
