use std::time::Duration;

use clap::Parser;
use uuid::Uuid;

use crate::blockchain::{MINING_DIFFICULTY, MINING_REWARD};
use crate::consensus::peers::normalize_peer_address;
use crate::error::ConfigError;

/// Command line / environment options. `.env` is loaded before parsing.
#[derive(Parser, Debug)]
#[command(name = "pow-ledger")]
#[command(about = "Proof-of-work ledger node with longest-valid-chain consensus")]
pub struct Cli {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Leading zero hex digits required by proof-of-work
    #[arg(long, env = "MINING_DIFFICULTY", default_value_t = MINING_DIFFICULTY)]
    pub difficulty: usize,

    /// Value credited to this node per mined block
    #[arg(long, env = "MINING_REWARD", default_value_t = MINING_REWARD)]
    pub reward: u64,

    /// Per-peer timeout when fetching chains
    #[arg(long, env = "PEER_TIMEOUT_SECS", default_value_t = 5)]
    pub peer_timeout_secs: u64,

    /// Identity credited with mining rewards (random if unset)
    #[arg(long, env = "NODE_ID")]
    pub node_id: Option<String>,

    /// Peer to register at startup; repeatable
    #[arg(long = "peer")]
    pub peers: Vec<String>,
}

/// Validated node configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub difficulty: usize,
    pub reward: u64,
    pub peer_timeout: Duration,
    pub node_id: String,
    pub peers: Vec<String>,
}

impl Config {
    /// Parse the process arguments and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::try_from(Cli::parse())
    }
}

impl TryFrom<Cli> for Config {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if !(1..=64).contains(&cli.difficulty) {
            return Err(ConfigError::InvalidDifficulty(cli.difficulty));
        }
        if cli.peer_timeout_secs == 0 {
            return Err(ConfigError::InvalidPeerTimeout);
        }
        let node_id = match cli.node_id {
            Some(id) if id.trim().is_empty() => return Err(ConfigError::EmptyNodeId),
            Some(id) => id,
            None => Uuid::new_v4().simple().to_string(),
        };
        let peers = cli
            .peers
            .iter()
            .map(|p| normalize_peer_address(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            host: cli.host,
            port: cli.port,
            difficulty: cli.difficulty,
            reward: cli.reward,
            peer_timeout: Duration::from_secs(cli.peer_timeout_secs),
            node_id,
            peers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PeerError;

    fn config(args: &[&str]) -> Result<Config, ConfigError> {
        let mut argv = vec!["pow-ledger"];
        argv.extend_from_slice(args);
        Config::try_from(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn explicit_values_are_used() {
        let cfg = config(&[
            "--host",
            "0.0.0.0",
            "-p",
            "5001",
            "--difficulty",
            "3",
            "--reward",
            "5",
            "--peer-timeout-secs",
            "2",
            "--node-id",
            "node-a",
            "--peer",
            "http://127.0.0.1:5000/",
        ])
        .unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 5001);
        assert_eq!(cfg.difficulty, 3);
        assert_eq!(cfg.reward, 5);
        assert_eq!(cfg.peer_timeout, Duration::from_secs(2));
        assert_eq!(cfg.node_id, "node-a");
        assert_eq!(cfg.peers, vec!["127.0.0.1:5000"]);
    }

    #[test]
    fn generated_node_id_has_no_dashes() {
        let cfg = config(&["--difficulty", "2"]).unwrap();
        assert_eq!(cfg.node_id.len(), 32);
        assert!(!cfg.node_id.contains('-'));
    }

    #[test]
    fn out_of_range_settings_are_rejected() {
        assert_eq!(
            config(&["--difficulty", "0"]).unwrap_err(),
            ConfigError::InvalidDifficulty(0)
        );
        assert_eq!(
            config(&["--difficulty", "65"]).unwrap_err(),
            ConfigError::InvalidDifficulty(65)
        );
        assert_eq!(
            config(&["--difficulty", "2", "--peer-timeout-secs", "0"]).unwrap_err(),
            ConfigError::InvalidPeerTimeout
        );
        assert!(matches!(
            config(&["--difficulty", "2", "--peer", "host:5000/x"]).unwrap_err(),
            ConfigError::Peer(PeerError::InvalidAddress(_))
        ));
    }
}
