use std::collections::BTreeSet;

use reqwest::Url;

use crate::error::PeerError;

/// Registered peer nodes, stored as normalised `host[:port]`.
///
/// A `BTreeSet` keeps iteration order a function of the set's contents, so
/// conflict resolution does not depend on insertion history.
#[derive(Debug, Default)]
pub struct PeerSet {
    nodes: BTreeSet<String>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer given as a URL or bare `host[:port]`. Returns the
    /// normalised address. Registering twice is a no-op.
    #[cfg(test)]
    pub fn register(&mut self, address: &str) -> Result<String, PeerError> {
        let node = normalize_peer_address(address)?;
        self.nodes.insert(node.clone());
        Ok(node)
    }

    /// Register several peers at once; if any address is malformed none are added.
    pub fn register_all<S: AsRef<str>>(
        &mut self,
        addresses: &[S],
    ) -> Result<Vec<String>, PeerError> {
        let nodes = addresses
            .iter()
            .map(|a| normalize_peer_address(a.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.nodes.extend(nodes.iter().cloned());
        Ok(nodes)
    }

    pub fn list(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// `http://10.0.0.5:5000/` and `10.0.0.5:5000` both become `10.0.0.5:5000`.
/// A full URL may carry a path (ignored); a bare address may not.
pub fn normalize_peer_address(input: &str) -> Result<String, PeerError> {
    let input = input.trim();
    let invalid = || PeerError::InvalidAddress(input.to_string());
    if input.is_empty() {
        return Err(invalid());
    }

    let url = if input.contains("://") {
        let url = Url::parse(input).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid());
        }
        url
    } else {
        let url = Url::parse(&format!("http://{input}")).map_err(|_| invalid())?;
        if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(invalid());
        }
        url
    };

    let host = url.host_str().filter(|h| !h.is_empty()).ok_or_else(invalid)?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
