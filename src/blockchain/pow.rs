use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::transaction::Transaction;

/// How many nonces are tried between two cancellation checks.
const CANCEL_POLL_INTERVAL: u64 = 4096;

/// Canonical representation of a transaction list for proof-of-work: a JSON
/// array of (sender, recipient, value) triples. Signatures are not part of it.
pub fn transactions_repr(transactions: &[Transaction]) -> String {
    Value::Array(transactions.iter().map(Transaction::payload).collect()).to_string()
}

/// True if sha256(transactions ‖ last_hash ‖ nonce) starts with `difficulty`
/// zero hex digits.
pub fn valid_proof(
    transactions: &[Transaction],
    last_hash: &str,
    nonce: u64,
    difficulty: usize,
) -> bool {
    let mut hasher = Sha256::new();
    hasher.update(transactions_repr(transactions).as_bytes());
    hasher.update(last_hash.as_bytes());
    hasher.update(nonce.to_string().as_bytes());
    meets_difficulty(&hasher.finalize(), difficulty)
}

/// Brute-force search for a nonce, starting at 0. The prefix is hashed once
/// and the hasher state cloned per candidate.
///
/// `cancelled` is polled every few thousand nonces; returns `None` once it
/// reports true.
pub fn proof_of_work(
    transactions: &[Transaction],
    last_hash: &str,
    difficulty: usize,
    cancelled: impl Fn() -> bool,
) -> Option<u64> {
    let mut prefix = Sha256::new();
    prefix.update(transactions_repr(transactions).as_bytes());
    prefix.update(last_hash.as_bytes());

    let mut nonce: u64 = 0;
    loop {
        if nonce % CANCEL_POLL_INTERVAL == 0 && cancelled() {
            return None;
        }
        let mut hasher = prefix.clone();
        hasher.update(nonce.to_string().as_bytes());
        if meets_difficulty(&hasher.finalize(), difficulty) {
            return Some(nonce);
        }
        nonce = nonce.checked_add(1)?;
    }
}

/// Leading `difficulty` nibbles of the digest are zero, i.e. its hex form
/// starts with that many '0' characters.
fn meets_difficulty(digest: &[u8], difficulty: usize) -> bool {
    if difficulty > digest.len() * 2 {
        return false;
    }
    (0..difficulty).all(|i| {
        let byte = digest[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        nibble == 0
    })
}
