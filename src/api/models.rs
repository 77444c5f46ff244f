use crate::blockchain::{Block, Ledger};
use crate::consensus::{HttpChainFetcher, PeerSet};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Shared application state: one ledger per node, its peers, and the client
/// used to reach them.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    pub peers: Mutex<PeerSet>,
    pub fetcher: HttpChainFetcher,
}

impl AppState {
    pub fn new(ledger: Ledger, peers: PeerSet, fetcher: HttpChainFetcher) -> Self {
        Self {
            ledger: Mutex::new(ledger),
            peers: Mutex::new(peers),
            fetcher,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub block_number: u64,
    pub transactions: Vec<Transaction>,
    pub nonce: u64,
    pub previous_hash: String,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum ResolveResponse {
    Replaced {
        message: &'static str,
        new_chain: Vec<Block>,
    },
    Authoritative {
        message: &'static str,
        chain: Vec<Block>,
    },
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender_address: String,
    pub recipient_address: String,
    #[serde(alias = "amount")]
    pub value: u64,
    pub signature: String,
}

#[derive(Serialize)]
pub struct PendingResponse<'a> {
    pub transactions: &'a [Transaction],
}

/* ---------- Wallet API Models (dev) ---------- */

#[derive(Deserialize)]
pub struct SignTxRequest {
    pub sender_address: String,
    pub sender_private_key: String,
    pub recipient_address: String,
    #[serde(alias = "amount")]
    pub value: u64,
}

#[derive(Serialize)]
pub struct SignTxResponse {
    pub transaction: Transaction,
    pub signature: String,
}

#[derive(Serialize)]
pub struct NewWalletResponse {
    pub private_key: String,
    pub public_key: String,
}

/* ---------- Nodes API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: &'static str,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub nodes: Vec<String>,
}
