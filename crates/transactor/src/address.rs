//! Node address resolution

use node_client::Url;
use types::{Result, TransactorError};

/// Port a weave node listens on by default
pub const DEFAULT_PORT: u16 = 1984;

/// Host used when no address is given
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// URL of the local node
pub fn default_url() -> String {
    format!("http://{}:{}", DEFAULT_HOST, DEFAULT_PORT)
}

/// Turn a user supplied node address into a full URL.
///
/// - empty: the local node on the default port
/// - `host` or `host:port` without a scheme: plain HTTP, default port when none is given
/// - `scheme://...`: used as given
pub fn resolve_node_url(address: &str) -> Result<String> {
    let address = address.trim();

    if address.is_empty() {
        return Ok(default_url());
    }

    if address.contains("://") {
        return Ok(address.to_string());
    }

    let mut url = Url::parse(&format!("http://{}", address)).map_err(|e| {
        TransactorError::ConnectionFailure(format!("malformed node address '{}': {}", address, e))
    })?;

    if url.port().is_none() {
        url.set_port(Some(DEFAULT_PORT)).map_err(|_| {
            TransactorError::ConnectionFailure(format!("cannot set port on '{}'", address))
        })?;
    }

    Ok(url.to_string())
}
