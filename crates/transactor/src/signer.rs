//! Wallet signer interface

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Holder of the key material a transaction is sent from.
///
/// The transactor only reads the public key. Signing happens outside it,
/// over [`types::Transaction::signature_payload`].
pub trait WalletSigner: Send + Sync {
    /// RSA public key modulus, copied into the transaction's owner field
    fn pub_key_modulus(&self) -> Vec<u8>;

    /// Wallet address: base64url of the SHA-256 of the modulus
    fn address(&self) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(self.pub_key_modulus()))
    }
}

impl<T: WalletSigner + ?Sized> WalletSigner for &T {
    fn pub_key_modulus(&self) -> Vec<u8> {
        (**self).pub_key_modulus()
    }

    fn address(&self) -> String {
        (**self).address()
    }
}
