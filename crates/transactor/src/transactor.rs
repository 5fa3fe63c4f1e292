//! Transaction construction, submission and confirmation

use crate::address::resolve_node_url;
use crate::context::Context;
use crate::fee::{net_amount, FeeBounds};
use crate::signer::WalletSigner;
use alloy::primitives::U256;
use config::NodeConfig;
use node_client::{HttpLedgerClient, LedgerClient};
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use types::amount::to_decimal;
use types::{Result, Transaction, TransactorError};

/// Interval between confirmation lookups
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Shortest accepted polling interval
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Builds, submits and waits for transactions through a remote node
#[derive(Debug, Clone)]
pub struct Transactor<C = HttpLedgerClient> {
    client: C,
    poll_interval: Duration,
}

impl Transactor<HttpLedgerClient> {
    /// Create a transactor bound to a node address.
    ///
    /// An empty address selects the local node; see [`resolve_node_url`].
    pub fn new(address: &str) -> Result<Self> {
        let url = resolve_node_url(address)?;
        let client = HttpLedgerClient::dial(&url)
            .map_err(|e| TransactorError::ConnectionFailure(e.to_string()))?;

        tracing::info!(node = %client.base_url(), "Transactor connected");

        Ok(Self::with_client(client))
    }

    /// Create a transactor from node configuration
    pub fn from_config(node: &NodeConfig) -> Result<Self> {
        let url = resolve_node_url(&node.url)?;
        let client = HttpLedgerClient::dial_with(
            &url,
            Duration::from_secs(node.timeout_seconds),
            &node.user_agent,
        )
        .map_err(|e| TransactorError::ConnectionFailure(e.to_string()))?;

        tracing::info!(node = %client.base_url(), "Transactor connected");

        Ok(Self::with_client(client))
    }
}

impl<C: LedgerClient> Transactor<C> {
    /// Create a transactor over any node client
    pub fn with_client(client: C) -> Self {
        Self {
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the confirmation polling interval, floored at [`MIN_POLL_INTERVAL`]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Create an unsigned transaction priced from the node's fee estimate.
    ///
    /// The estimate is raised to `bounds.min` when lower and rejected with
    /// `FeeExceedsLimit` when above `bounds.max`. With `include_fee` the fee
    /// is subtracted from `amount` so the total debit equals `amount`.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_transaction<S: WalletSigner + ?Sized>(
        &self,
        ctx: &Context,
        signer: &S,
        amount: &str,
        data: Vec<u8>,
        target: &str,
        bounds: FeeBounds,
        include_fee: bool,
    ) -> Result<Transaction> {
        let anchor = self.fetch_anchor(ctx).await?;

        let estimate = ctx
            .run(self.client.price(data.len() as u64, target))
            .await
            .map_err(TransactorError::Cancelled)?
            .map_err(TransactorError::FeeEstimateUnavailable)?;

        let quote = bounds.finalize(&estimate)?;
        if quote.was_raised {
            tracing::debug!(
                estimate = %quote.estimate,
                min_fee = %bounds.min,
                "Fee estimate raised to floor"
            );
        }

        self.assemble(anchor, signer, amount, data, target, &quote.fee, include_fee)
    }

    /// Create an unsigned transaction with a caller-chosen fee.
    ///
    /// No estimate is fetched and no bounds apply.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_transaction_with_fee<S: WalletSigner + ?Sized>(
        &self,
        ctx: &Context,
        signer: &S,
        amount: &str,
        data: Vec<u8>,
        target: &str,
        fee: U256,
        include_fee: bool,
    ) -> Result<Transaction> {
        let anchor = self.fetch_anchor(ctx).await?;
        self.assemble(anchor, signer, amount, data, target, &fee, include_fee)
    }

    /// Submit a signed transaction, returning the node's acknowledgment
    pub async fn send_transaction(&self, ctx: &Context, tx: &Transaction) -> Result<String> {
        if !tx.is_signed() {
            return Err(TransactorError::MissingSignature);
        }

        let serialized = tx.to_wire()?;

        let ack = ctx
            .run(self.client.commit(&serialized))
            .await
            .map_err(TransactorError::Cancelled)?
            .map_err(TransactorError::SubmissionFailure)?;

        tracing::info!(
            tx_id = %tx.hash(),
            amount = %tx.amount(),
            fee = %tx.fee(),
            "Transaction submitted"
        );

        Ok(ack)
    }

    /// Poll the node until the transaction is mined or `ctx` is done.
    ///
    /// Lookup errors are logged and polling continues; only a receipt or
    /// the context ends the loop.
    pub async fn wait_mined(&self, ctx: &Context, tx: &Transaction) -> Result<Transaction> {
        self.wait_for_id(ctx, tx.hash()).await
    }

    /// Same as [`Transactor::wait_mined`] for a bare transaction id.
    ///
    /// An empty id belongs to a transaction that was never signed.
    pub async fn wait_for_id(&self, ctx: &Context, tx_id: &str) -> Result<Transaction> {
        if tx_id.is_empty() {
            return Err(TransactorError::MissingSignature);
        }

        let mut ticker = interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            match ctx.run(self.client.get_transaction(tx_id)).await {
                Ok(Ok(Some(receipt))) => {
                    tracing::info!(tx_id = %tx_id, "Transaction mined");
                    return Ok(receipt);
                }
                Ok(Ok(None)) => {
                    tracing::debug!(tx_id = %tx_id, "Transaction not yet mined");
                }
                Ok(Err(source)) => {
                    let err = TransactorError::PollingError {
                        tx_id: tx_id.to_string(),
                        source,
                    };
                    tracing::warn!(error = %err, "Polling error");
                }
                Err(reason) => return Err(TransactorError::Cancelled(reason)),
            }

            tokio::select! {
                biased;
                reason = ctx.done() => return Err(TransactorError::Cancelled(reason)),
                _ = ticker.tick() => {}
            }
        }
    }

    async fn fetch_anchor(&self, ctx: &Context) -> Result<String> {
        let anchor = ctx
            .run(self.client.tx_anchor())
            .await
            .map_err(TransactorError::Cancelled)?
            .map_err(TransactorError::AnchorUnavailable)?;

        tracing::debug!(anchor = %anchor, "Fetched anchor");
        Ok(anchor)
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble<S: WalletSigner + ?Sized>(
        &self,
        anchor: String,
        signer: &S,
        amount: &str,
        data: Vec<u8>,
        target: &str,
        fee: &U256,
        include_fee: bool,
    ) -> Result<Transaction> {
        let amount = if include_fee {
            net_amount(amount, fee)?
        } else {
            amount.to_string()
        };

        Ok(Transaction::new(
            anchor,
            signer.pub_key_modulus(),
            amount,
            target,
            data,
            to_decimal(fee),
        ))
    }
}
