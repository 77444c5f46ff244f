use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

use crate::blockchain::MINING_SENDER;

/// A value transfer between two addresses.
///
/// Addresses are hex-encoded compressed secp256k1 public keys, except for
/// reward transactions whose sender is [`MINING_SENDER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender_address: String,
    pub recipient_address: String,
    pub value: u64,
    /// Hex DER ECDSA signature over [`Transaction::signing_payload`].
    /// Absent only for reward transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Transaction {
    /// Build a user transaction. Nothing is verified here; see `Ledger::submit_transaction`.
    pub fn new(
        sender_address: impl Into<String>,
        recipient_address: impl Into<String>,
        value: u64,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            sender_address: sender_address.into(),
            recipient_address: recipient_address.into(),
            value,
            signature: Some(signature.into()),
        }
    }

    /// Reward transaction crediting `recipient_address`. Only the ledger's
    /// sealing routine creates these.
    pub(crate) fn reward(recipient_address: impl Into<String>, value: u64) -> Self {
        Self {
            sender_address: MINING_SENDER.to_string(),
            recipient_address: recipient_address.into(),
            value,
            signature: None,
        }
    }

    pub fn is_reward(&self) -> bool {
        self.sender_address == MINING_SENDER
    }

    /// The (sender, recipient, value) triple as a JSON object. `serde_json`
    /// maps are key-sorted, so the serialized form does not depend on field
    /// declaration order.
    pub fn payload(&self) -> Value {
        json!({
            "sender_address": self.sender_address,
            "recipient_address": self.recipient_address,
            "value": self.value,
        })
    }

    /// Canonical bytes that are hashed and signed by the sender.
    pub fn signing_payload(&self) -> Vec<u8> {
        self.payload().to_string().into_bytes()
    }

    /// SHA-256 of the signing payload.
    pub fn sighash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.signing_payload());
        hasher.finalize().into()
    }
}
