use std::future::Future;
use std::time::Duration;

use serde::Deserialize;

use crate::blockchain::Block;
use crate::error::PeerError;

/// Body of a peer's `GET /chain`.
#[derive(Debug, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Source of peer chains. Every failure comes back as a `PeerError` for that
/// peer alone.
pub trait ChainFetcher {
    fn fetch_chain(&self, peer: &str) -> impl Future<Output = Result<Vec<Block>, PeerError>>;
}

/// Fetches `http://{peer}/chain` with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpChainFetcher {
    client: reqwest::Client,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, PeerError> {
        let url = format!("http://{peer}/chain");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PeerError::Unreachable {
                peer: peer.to_string(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(PeerError::BadStatus {
                peer: peer.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let body: PeerChain = resp.json().await.map_err(|e| PeerError::Malformed {
            peer: peer.to_string(),
            reason: e.to_string(),
        })?;
        check_declared_length(peer, body)
    }
}

/// A peer's declared `length` must match what it actually sent.
fn check_declared_length(peer: &str, body: PeerChain) -> Result<Vec<Block>, PeerError> {
    if body.length != body.chain.len() {
        return Err(PeerError::Malformed {
            peer: peer.to_string(),
            reason: format!(
                "declared length {} but sent {} blocks",
                body.length,
                body.chain.len()
            ),
        });
    }
    Ok(body.chain)
}
