//! Node metadata types
//!
//! These mirror the node's JSON responses and carry no behaviour.

use serde::{Deserialize, Serialize};

/// Response of the node's `/info` endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NetworkInfo {
    /// Network name
    pub network: String,
    /// Protocol version
    pub version: i64,
    /// Node release number
    pub release: i64,
    /// Current block height
    pub height: i64,
    /// Independent hash of the current block
    pub current: String,
    /// Number of blocks known to the node
    pub blocks: i64,
    /// Number of connected peers
    pub peers: i64,
    /// Length of the node's transaction queue
    pub queue_length: i64,
    /// Node state latency in milliseconds
    pub node_state_latency: i64,
}

/// A block as returned by `/block/hash/{hash}` or `/block/height/{height}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Block {
    pub hash_list: Vec<String>,
    pub nonce: String,
    pub previous_block: String,
    pub timestamp: i64,
    pub last_retarget: i64,
    pub diff: String,
    pub height: i64,
    pub hash: String,
    pub indep_hash: String,
    pub txs: Vec<serde_json::Value>,
    pub wallet_list: String,
    pub reward_addr: String,
    pub tags: Vec<serde_json::Value>,
    pub reward_pool: String,
    pub weave_size: String,
    pub block_size: String,
}

/// Fields a node accepts in a transaction record
pub const ALLOWED_TX_FIELDS: &[&str] = &[
    "id",
    "last_tx",
    "owner",
    "target",
    "quantity",
    "type",
    "data",
    "reward",
    "signature",
    "data.html",
];

/// Check whether a transaction field name is accepted by the node
pub fn is_allowed_tx_field(field: &str) -> bool {
    ALLOWED_TX_FIELDS.contains(&field)
}
