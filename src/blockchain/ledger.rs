use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info};

use super::Block;
use super::pow::{proof_of_work, valid_proof};
use super::validation::VerifiedChain;
use crate::error::LedgerError;
use crate::transaction::Transaction;
use crate::wallet;

/// In-memory ledger: the chain plus the pool of not-yet-sealed transactions.
///
/// Every chain it holds is valid. `epoch` moves whenever the tip changes
/// (sealing or replacement) so in-flight mining jobs can notice.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    node_id: String,
    difficulty: usize,
    reward: u64,
    epoch: Arc<AtomicU64>,
}

/// Snapshot of what a miner searches over. Produced under the ledger lock,
/// run without it, and handed back to [`Ledger::seal_mined`].
#[derive(Debug, Clone)]
pub struct MiningJob {
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
    pub difficulty: usize,
    epoch: u64,
    epoch_counter: Arc<AtomicU64>,
}

impl MiningJob {
    /// Search for a nonce. Gives up with `MiningCancelled` once the ledger's
    /// tip moves.
    pub fn run(&self) -> Result<u64, LedgerError> {
        proof_of_work(
            &self.transactions,
            &self.previous_hash,
            self.difficulty,
            || self.is_stale(),
        )
        .ok_or(LedgerError::MiningCancelled)
    }

    pub fn is_stale(&self) -> bool {
        self.epoch_counter.load(Ordering::Acquire) != self.epoch
    }
}

impl Ledger {
    /// A ledger holding only the genesis block.
    pub fn new(node_id: impl Into<String>, difficulty: usize, reward: u64) -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
            node_id: node_id.into(),
            difficulty,
            reward,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Admit an externally supplied transaction into the pending pool.
    ///
    /// Returns the number of the block it will most likely land in. Reward
    /// transactions are never accepted here.
    pub fn submit_transaction(&mut self, tx: Transaction) -> Result<u64, LedgerError> {
        if tx.sender_address.trim().is_empty() || tx.recipient_address.trim().is_empty() {
            return Err(LedgerError::InvalidTransaction(
                "sender_address and recipient_address are required".into(),
            ));
        }
        if tx.is_reward() {
            return Err(LedgerError::ReservedSender);
        }
        let Some(signature) = tx.signature.as_deref() else {
            return Err(LedgerError::InvalidSignature);
        };
        if !wallet::verify(&tx.sender_address, signature, &tx) {
            return Err(LedgerError::InvalidSignature);
        }

        self.pending.push(tx);
        debug!("pending pool size now {}", self.pending.len());
        Ok(self.next_block_number())
    }

    /// Snapshot the pending pool and tip for an unlocked proof-of-work search.
    pub fn mining_job(&self) -> MiningJob {
        MiningJob {
            transactions: self.pending.clone(),
            previous_hash: self.last_block().hash(),
            difficulty: self.difficulty,
            epoch: self.epoch.load(Ordering::Acquire),
            epoch_counter: Arc::clone(&self.epoch),
        }
    }

    /// Seal the result of `job`, appending this node's reward.
    ///
    /// Fails with `StaleProof` if the tip or the pending pool changed since
    /// the job was taken; nothing is mutated in that case.
    pub fn seal_mined(&mut self, job: &MiningJob, nonce: u64) -> Result<Block, LedgerError> {
        if job.is_stale()
            || job.previous_hash != self.last_block().hash()
            || job.transactions != self.pending
        {
            return Err(LedgerError::StaleProof);
        }
        if !valid_proof(&job.transactions, &job.previous_hash, nonce, self.difficulty) {
            return Err(LedgerError::InvalidProof);
        }

        self.pending
            .push(Transaction::reward(self.node_id.clone(), self.reward));
        Ok(self.seal_block(nonce, job.previous_hash.clone()))
    }

    /// Move the whole pending pool into a new block and append it.
    pub fn seal_block(&mut self, nonce: u64, previous_hash: String) -> Block {
        let transactions = mem::take(&mut self.pending);
        let block = Block::new(self.next_block_number(), transactions, nonce, previous_hash);
        self.chain.push(block.clone());
        self.epoch.fetch_add(1, Ordering::AcqRel);

        info!(
            "sealed block #{} ({} txs, nonce={})",
            block.block_number,
            block.transactions.len(),
            block.nonce
        );
        block
    }

    /// Mine and seal one block in the calling thread.
    #[cfg(test)]
    pub fn mine(&mut self) -> Result<Block, LedgerError> {
        let job = self.mining_job();
        let nonce = job.run()?;
        self.seal_mined(&job, nonce)
    }

    /// Adopt `candidate` if it is strictly longer than the local chain.
    /// Validation already happened when the `VerifiedChain` was built, so
    /// only the length is checked here. Drops the pending pool on adoption.
    pub fn replace_chain(&mut self, candidate: VerifiedChain) -> bool {
        let candidate = candidate.into_blocks();
        if candidate.len() <= self.chain.len() {
            return false;
        }

        let dropped = self.pending.len();
        self.chain = candidate;
        self.pending.clear();
        self.epoch.fetch_add(1, Ordering::AcqRel);

        info!(
            "chain replaced: new length {}, dropped {} pending txs",
            self.chain.len(),
            dropped
        );
        true
    }

    fn next_block_number(&self) -> u64 {
        self.chain.len() as u64 + 1
    }
}
