pub mod fetcher;
pub mod peers;
pub mod resolver;

pub use fetcher::{ChainFetcher, HttpChainFetcher};
pub use peers::PeerSet;
pub use resolver::{Resolution, resolve_conflicts};
