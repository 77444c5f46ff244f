use thiserror::Error;

/// Rejections produced by the ledger. None of these leave the ledger in a
/// partially mutated state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Invalid transaction signature")]
    InvalidSignature,

    #[error("Sender address is reserved for mining rewards")]
    ReservedSender,

    #[error("Stale proof-of-work: chain tip or pending pool changed while mining")]
    StaleProof,

    #[error("Mining cancelled: chain was replaced during the search")]
    MiningCancelled,

    #[error("Nonce does not satisfy the proof-of-work difficulty")]
    InvalidProof,
}

/// Failures talking to (or about) a single peer. Always isolated to that peer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeerError {
    #[error("Invalid peer address: {0}")]
    InvalidAddress(String),

    #[error("Peer {peer} unreachable: {reason}")]
    Unreachable { peer: String, reason: String },

    #[error("Peer {peer} answered with HTTP {status}")]
    BadStatus { peer: String, status: u16 },

    #[error("Peer {peer} sent a malformed chain: {reason}")]
    Malformed { peer: String, reason: String },
}

/// Startup configuration problems.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("difficulty must be between 1 and 64, got {0}")]
    InvalidDifficulty(usize),

    #[error("peer timeout must be at least one second")]
    InvalidPeerTimeout,

    #[error("node id must not be empty")]
    EmptyNodeId,

    #[error(transparent)]
    Peer(#[from] PeerError),
}
