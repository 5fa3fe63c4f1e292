//! Transaction record and its wire encoding

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, TransactorError};

/// A value transfer and/or data commit.
///
/// Built unsigned by the transactor, signed externally through
/// [`Transaction::set_signature`], then treated as immutable. Binary fields
/// (`owner`, `data`, `signature`) are base64url encoded without padding on
/// the wire; `quantity` and `reward` are decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// base64url(SHA-256(signature)), empty until signed
    #[serde(default)]
    id: String,
    /// Anchor fetched from the node
    #[serde(default, rename = "last_tx")]
    anchor: String,
    /// Sender public key modulus
    #[serde(default, with = "b64")]
    owner: Vec<u8>,
    /// Recipient address
    #[serde(default)]
    target: String,
    /// Transferred amount, decimal string
    #[serde(default, rename = "quantity")]
    amount: String,
    /// Payload
    #[serde(default, with = "b64")]
    data: Vec<u8>,
    /// Fee, decimal string
    #[serde(default, rename = "reward")]
    fee: String,
    #[serde(default, with = "b64")]
    signature: Vec<u8>,
}

impl Transaction {
    /// Create a new unsigned transaction
    pub fn new(
        anchor: impl Into<String>,
        owner: Vec<u8>,
        amount: impl Into<String>,
        target: impl Into<String>,
        data: Vec<u8>,
        fee: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            anchor: anchor.into(),
            owner,
            target: target.into(),
            amount: amount.into(),
            data,
            fee: fee.into(),
            signature: Vec::new(),
        }
    }

    /// Transaction identifier, empty for unsigned transactions
    pub fn hash(&self) -> &str {
        &self.id
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub fn owner(&self) -> &[u8] {
        &self.owner
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn fee(&self) -> &str {
        &self.fee
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Whether a signature has been attached
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }

    /// Bytes an external signer must sign.
    ///
    /// Concatenation of owner, target, data, quantity, reward and anchor.
    /// `target` and `anchor` are base64url on the wire and enter the payload
    /// decoded; an empty target contributes no bytes.
    pub fn signature_payload(&self) -> Result<Vec<u8>> {
        let target = decode_field("target", &self.target)?;
        let anchor = decode_field("last_tx", &self.anchor)?;

        let mut payload = Vec::with_capacity(
            self.owner.len()
                + target.len()
                + self.data.len()
                + self.amount.len()
                + self.fee.len()
                + anchor.len(),
        );
        payload.extend_from_slice(&self.owner);
        payload.extend_from_slice(&target);
        payload.extend_from_slice(&self.data);
        payload.extend_from_slice(self.amount.as_bytes());
        payload.extend_from_slice(self.fee.as_bytes());
        payload.extend_from_slice(&anchor);
        Ok(payload)
    }

    /// Attach a signature produced outside this crate and derive the id from it
    pub fn set_signature(&mut self, signature: Vec<u8>) {
        self.id = if signature.is_empty() {
            String::new()
        } else {
            URL_SAFE_NO_PAD.encode(Sha256::digest(&signature))
        };
        self.signature = signature;
    }

    /// Encode to the node's JSON wire format
    pub fn to_wire(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decode from the node's JSON wire format
    pub fn from_wire(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

fn decode_field(field: &str, value: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(value.trim_end_matches('='))
        .map_err(|e| TransactorError::InvalidEncoding {
            field: field.to_string(),
            reason: e.to_string(),
        })
}

mod b64 {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        // Some nodes pad their output
        URL_SAFE_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .map_err(serde::de::Error::custom)
    }
}
