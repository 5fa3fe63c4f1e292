//! Remote node capability interface

use async_trait::async_trait;
use std::sync::Arc;
use types::{NodeError, Transaction};

/// Capabilities the transactor needs from a remote node.
///
/// Implementations must be safe for concurrent use when a single client is
/// shared between concurrent transactor calls.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch a fresh anchor for a new transaction
    async fn tx_anchor(&self) -> Result<String, NodeError>;

    /// Id of the last transaction sent from a wallet address
    async fn last_transaction(&self, address: &str) -> Result<String, NodeError>;

    /// Decimal-string fee estimate for a payload of `data_size` bytes sent to `target`
    async fn price(&self, data_size: u64, target: &str) -> Result<String, NodeError>;

    /// Submit a serialized transaction, returning the node's acknowledgment
    async fn commit(&self, data: &[u8]) -> Result<String, NodeError>;

    /// Look up a transaction by id.
    ///
    /// `Ok(Some(_))` once mined, `Ok(None)` while the node knows it as pending,
    /// `Err(_)` when unknown or on transport failure.
    async fn get_transaction(&self, tx_id: &str) -> Result<Option<Transaction>, NodeError>;
}

#[async_trait]
impl<T: LedgerClient + ?Sized> LedgerClient for Arc<T> {
    async fn tx_anchor(&self) -> Result<String, NodeError> {
        (**self).tx_anchor().await
    }

    async fn last_transaction(&self, address: &str) -> Result<String, NodeError> {
        (**self).last_transaction(address).await
    }

    async fn price(&self, data_size: u64, target: &str) -> Result<String, NodeError> {
        (**self).price(data_size, target).await
    }

    async fn commit(&self, data: &[u8]) -> Result<String, NodeError> {
        (**self).commit(data).await
    }

    async fn get_transaction(&self, tx_id: &str) -> Result<Option<Transaction>, NodeError> {
        (**self).get_transaction(tx_id).await
    }
}
