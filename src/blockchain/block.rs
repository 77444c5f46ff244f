use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_TIMESTAMP};
use crate::transaction::Transaction;

/// A sealed block. Field names are the wire format shared with peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub block_number: u64,
    pub timestamp: f64, // Unix seconds (UTC), fractional
    pub transactions: Vec<Transaction>,
    pub nonce: u64,
    pub previous_hash: String,
}

impl Block {
    /// The fixed first block. Identical on every node.
    pub fn genesis() -> Self {
        Self {
            block_number: 1,
            timestamp: GENESIS_TIMESTAMP,
            transactions: Vec::new(),
            nonce: 0,
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
        }
    }

    /// A block stamped with the current time.
    pub fn new(
        block_number: u64,
        transactions: Vec<Transaction>,
        nonce: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            block_number,
            timestamp: Utc::now().timestamp_micros() as f64 / 1_000_000.0,
            transactions,
            nonce,
            previous_hash,
        }
    }

    /// Canonical JSON of the whole block. Going through `serde_json::Value`
    /// sorts every object's keys, so the output is independent of field order.
    pub fn canonical_json(&self) -> String {
        serde_json::to_value(self)
            .expect("block is always serializable")
            .to_string()
    }

    /// SHA-256 (hex) of the canonical JSON. Used for `previous_hash` links.
    pub fn hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_json().as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::Block;
    use crate::transaction::Transaction;

    #[test]
    fn genesis_is_fixed() {
        let a = Block::genesis();
        let b = Block::genesis();
        assert_eq!(a, b);
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.block_number, 1);
        assert_eq!(a.nonce, 0);
        assert!(a.transactions.is_empty());
    }

    #[test]
    fn canonical_json_sorts_keys() {
        let json = Block::genesis().canonical_json();
        assert_eq!(
            json,
            r#"{"block_number":1,"nonce":0,"previous_hash":"00","timestamp":0.0,"transactions":[]}"#
        );
    }

    #[test]
    fn hash_ignores_wire_field_order() {
        let block = Block::new(2, vec![Transaction::reward("miner", 1)], 42, "ab".into());
        let shuffled = format!(
            r#"{{"previous_hash":"ab","nonce":42,"transactions":[{{"value":1,"recipient_address":"miner","sender_address":"THE BLOCKCHAIN"}}],"timestamp":{},"block_number":2}}"#,
            serde_json::to_string(&block.timestamp).unwrap()
        );
        let parsed: Block = serde_json::from_str(&shuffled).unwrap();
        assert_eq!(parsed.hash(), block.hash());
    }

    #[test]
    fn hash_changes_when_content_changes() {
        let block = Block::new(2, vec![Transaction::reward("miner", 1)], 42, "ab".into());
        let mut tampered = block.clone();
        tampered.transactions[0].value = 2;
        assert_ne!(block.hash(), tampered.hash());

        let mut tampered = block.clone();
        tampered.nonce += 1;
        assert_ne!(block.hash(), tampered.hash());
    }
}
