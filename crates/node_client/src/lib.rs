//! Client for communicating with a weave node
//!
//! This crate defines the capabilities the transactor needs from a remote
//! node and implements them over the node's HTTP API.

pub mod client;
pub mod traits;

pub use client::*;
pub use traits::*;

pub use reqwest::Url;
