//! Transaction construction, fee bounding, submission and confirmation
//!
//! The [`Transactor`] fetches anchors and fee estimates from a remote node,
//! assembles unsigned transactions, submits externally signed ones and polls
//! the node until they are mined.

pub mod address;
pub mod context;
pub mod fee;
pub mod signer;
pub mod transactor;

pub use address::*;
pub use context::Context;
pub use fee::*;
pub use signer::WalletSigner;
pub use transactor::*;
