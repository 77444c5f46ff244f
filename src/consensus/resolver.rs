use std::sync::Mutex;

use actix_web::rt::task;
use log::{debug, info, warn};

use super::ChainFetcher;
use crate::blockchain::Ledger;
use crate::blockchain::validation::VerifiedChain;

/// Outcome of a conflict resolution round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A longer valid peer chain was adopted.
    Replaced,
    /// The local chain was kept.
    Authoritative,
}

/// Longest-valid-chain rule.
///
/// The ledger lock is only taken to read the baseline and for the final
/// swap. Peer fetches run without it, and candidates are validated once on
/// the blocking pool; the swap then only compares lengths. Among valid
/// candidates strictly longer than the local chain the longest wins, ties
/// going to the first one seen in `peers` order.
pub async fn resolve_conflicts<F: ChainFetcher>(
    ledger: &Mutex<Ledger>,
    peers: &[String],
    fetcher: &F,
) -> Resolution {
    let (mut max_length, difficulty) = {
        let ledger = ledger.lock().expect("mutex poisoned");
        (ledger.len(), ledger.difficulty())
    };

    let mut best: Option<(&str, VerifiedChain)> = None;
    for peer in peers {
        let chain = match fetcher.fetch_chain(peer).await {
            Ok(chain) => chain,
            Err(e) => {
                warn!("resolve: skipping peer {peer}: {e}");
                continue;
            }
        };

        let length = chain.len();
        if length <= max_length {
            debug!("resolve: peer {peer} chain length {length} not longer");
            continue;
        }
        let verdict = task::spawn_blocking(move || VerifiedChain::check(chain, difficulty)).await;
        let chain = match verdict {
            Ok(Some(chain)) => chain,
            Ok(None) => {
                warn!("resolve: peer {peer} sent an invalid chain of length {length}");
                continue;
            }
            Err(e) => {
                warn!("resolve: validating chain from {peer} failed: {e}");
                continue;
            }
        };
        max_length = length;
        best = Some((peer.as_str(), chain));
    }

    let Some((peer, chain)) = best else {
        debug!("resolve: local chain is authoritative (length {max_length})");
        return Resolution::Authoritative;
    };

    let mut ledger = ledger.lock().expect("mutex poisoned");
    if ledger.replace_chain(chain) {
        info!("resolve: adopted chain of length {max_length} from {peer}");
        Resolution::Replaced
    } else {
        // Local chain grew past the candidate while we were fetching.
        debug!("resolve: candidate from {peer} no longer longer than local chain");
        Resolution::Authoritative
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::blockchain::Block;
    use crate::error::PeerError;
    use crate::transaction::Transaction;
    use crate::wallet::{generate_keypair_hex, sign_transaction_hex};

    /// Serves canned per-peer results.
    #[derive(Default)]
    struct FakeFetcher {
        chains: HashMap<String, Result<Vec<Block>, PeerError>>,
    }

    impl FakeFetcher {
        fn with(mut self, peer: &str, chain: Result<Vec<Block>, PeerError>) -> Self {
            self.chains.insert(peer.to_string(), chain);
            self
        }
    }

    impl ChainFetcher for FakeFetcher {
        async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, PeerError> {
            self.chains.get(peer).cloned().unwrap_or_else(|| {
                Err(PeerError::Unreachable {
                    peer: peer.to_string(),
                    reason: "connection refused".into(),
                })
            })
        }
    }

    fn mined(node: &str, blocks: usize) -> Ledger {
        let mut ledger = Ledger::new(node, 2, 1);
        for _ in 0..blocks {
            ledger.mine().unwrap();
        }
        ledger
    }

    fn peers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[actix_web::test]
    async fn shorter_node_adopts_longer_chain() {
        let long = mined("a", 3);
        let short = Mutex::new(mined("b", 1));
        let fetcher = FakeFetcher::default().with("a:5000", Ok(long.chain().to_vec()));

        let res = resolve_conflicts(&short, &peers(&["a:5000"]), &fetcher).await;
        assert_eq!(res, Resolution::Replaced);

        let short = short.lock().unwrap();
        assert_eq!(short.len(), 4);
        assert_eq!(short.chain(), long.chain());
    }

    #[actix_web::test]
    async fn longer_node_keeps_its_chain() {
        let long = Mutex::new(mined("a", 3));
        let short = mined("b", 1);
        let fetcher = FakeFetcher::default().with("b:5000", Ok(short.chain().to_vec()));

        let res = resolve_conflicts(&long, &peers(&["b:5000"]), &fetcher).await;
        assert_eq!(res, Resolution::Authoritative);
        assert_eq!(long.lock().unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn repeated_resolution_is_idempotent() {
        let local = Mutex::new(mined("a", 2));
        let other = mined("b", 1);
        let fetcher = FakeFetcher::default().with("b", Ok(other.chain().to_vec()));
        let before = local.lock().unwrap().chain().to_vec();

        for _ in 0..2 {
            let res = resolve_conflicts(&local, &peers(&["b"]), &fetcher).await;
            assert_eq!(res, Resolution::Authoritative);
        }
        assert_eq!(local.lock().unwrap().chain(), before.as_slice());
    }

    #[actix_web::test]
    async fn unreachable_peers_do_not_abort_resolution() {
        let long = mined("a", 2);
        let local = Mutex::new(mined("b", 0));
        let fetcher = FakeFetcher::default()
            .with(
                "down",
                Err(PeerError::BadStatus {
                    peer: "down".into(),
                    status: 500,
                }),
            )
            .with("up", Ok(long.chain().to_vec()));

        let res = resolve_conflicts(&local, &peers(&["down", "missing", "up"]), &fetcher).await;
        assert_eq!(res, Resolution::Replaced);
        assert_eq!(local.lock().unwrap().chain(), long.chain());
    }

    #[actix_web::test]
    async fn invalid_longer_chain_is_ignored() {
        let mut forged = mined("a", 3).chain().to_vec();
        forged[2].previous_hash = "f".repeat(64);
        let valid = mined("c", 2);
        let local = Mutex::new(mined("b", 1));
        let fetcher = FakeFetcher::default()
            .with("forged", Ok(forged))
            .with("valid", Ok(valid.chain().to_vec()));

        let res = resolve_conflicts(&local, &peers(&["forged", "valid"]), &fetcher).await;
        assert_eq!(res, Resolution::Replaced);
        assert_eq!(local.lock().unwrap().chain(), valid.chain());
    }

    #[actix_web::test]
    async fn longest_wins_and_first_seen_breaks_ties() {
        let two = mined("two", 2);
        let four_a = mined("four-a", 4);
        let four_b = mined("four-b", 4);
        let local = Mutex::new(mined("local", 1));
        let fetcher = FakeFetcher::default()
            .with("p1", Ok(two.chain().to_vec()))
            .with("p2", Ok(four_a.chain().to_vec()))
            .with("p3", Ok(four_b.chain().to_vec()));

        let res = resolve_conflicts(&local, &peers(&["p1", "p2", "p3"]), &fetcher).await;
        assert_eq!(res, Resolution::Replaced);
        assert_eq!(local.lock().unwrap().chain(), four_a.chain());
    }

    #[actix_web::test]
    async fn adoption_drops_pending_transactions() {
        let long = mined("a", 2);
        let mut local = mined("b", 0);
        let (sk, pk) = generate_keypair_hex();
        let mut tx = Transaction::new(pk, "bob", 5, "");
        tx.signature = Some(sign_transaction_hex(&sk, &tx).unwrap());
        local.submit_transaction(tx).unwrap();
        let local = Mutex::new(local);

        let fetcher = FakeFetcher::default().with("a", Ok(long.chain().to_vec()));
        let res = resolve_conflicts(&local, &peers(&["a"]), &fetcher).await;
        assert_eq!(res, Resolution::Replaced);
        assert!(local.lock().unwrap().pending().is_empty());
    }

    #[actix_web::test]
    async fn no_peers_means_authoritative() {
        let local = Mutex::new(mined("a", 1));
        let res = resolve_conflicts(&local, &[], &FakeFetcher::default()).await;
        assert_eq!(res, Resolution::Authoritative);
    }
}
