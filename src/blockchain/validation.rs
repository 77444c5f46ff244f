use log::debug;

use super::Block;
use super::pow::valid_proof;

/// Full structural and proof-of-work check of a chain.
///
/// Each non-genesis block must link to the hash of its predecessor, carry
/// the next block number, end with exactly one reward transaction, and its
/// remaining transactions must satisfy `valid_proof` with the stored nonce.
/// The trailing reward is stripped before the proof check because it was
/// appended after mining.
pub fn valid_chain(chain: &[Block], difficulty: usize) -> bool {
    if chain.len() < 2 {
        debug!("chain rejected: length {} < 2", chain.len());
        return false;
    }
    if chain[0] != Block::genesis() {
        debug!("chain rejected: genesis mismatch");
        return false;
    }

    chain.windows(2).all(|pair| valid_link(&pair[0], &pair[1], difficulty))
}

/// A chain that has passed [`valid_chain`]. The only way to build one is
/// [`VerifiedChain::check`], so holders can skip re-validating it.
#[derive(Debug, Clone)]
pub struct VerifiedChain(Vec<Block>);

impl VerifiedChain {
    pub fn check(chain: Vec<Block>, difficulty: usize) -> Option<Self> {
        valid_chain(&chain, difficulty).then_some(Self(chain))
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.0
    }
}

fn valid_link(prev: &Block, block: &Block, difficulty: usize) -> bool {
    if block.block_number != prev.block_number + 1 {
        debug!(
            "chain rejected: block #{} follows #{}",
            block.block_number, prev.block_number
        );
        return false;
    }
    if block.previous_hash != prev.hash() {
        debug!("chain rejected: block #{} broken link", block.block_number);
        return false;
    }

    let Some((reward, mined)) = block.transactions.split_last() else {
        debug!("chain rejected: block #{} has no reward", block.block_number);
        return false;
    };
    if !reward.is_reward() || mined.iter().any(|tx| tx.is_reward()) {
        debug!(
            "chain rejected: block #{} reward is not the single trailing transaction",
            block.block_number
        );
        return false;
    }

    if !valid_proof(mined, &block.previous_hash, block.nonce, difficulty) {
        debug!("chain rejected: block #{} invalid proof", block.block_number);
        return false;
    }
    true
}
