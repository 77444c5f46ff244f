pub mod block;
pub mod ledger;
pub mod pow;
pub mod validation;

pub use block::Block;
pub use ledger::Ledger;

/// Sender address reserved for reward transactions.
pub const MINING_SENDER: &str = "THE BLOCKCHAIN";

/// Value credited to the miner for each sealed block.
pub const MINING_REWARD: u64 = 1;

/// Default Proof-of-Work difficulty (number of leading zero hex digits).
pub const MINING_DIFFICULTY: usize = 2;

/// `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "00";

/// Timestamp of the genesis block. Fixed so all nodes share one genesis.
pub const GENESIS_TIMESTAMP: f64 = 0.0;
