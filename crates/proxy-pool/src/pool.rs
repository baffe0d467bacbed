//! Randomized proxy pool
//!
//! The set of egress identities for one run. Construction shuffles the
//! supplied addresses once (Fisher-Yates) so each restart walks the list in
//! a fresh order; the pool is never mutated afterward. An empty address list
//! falls back to a single direct-connect entry.

use std::fmt;

use rand::RngExt;

/// One egress identity: an HTTP proxy address, or a direct connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyEntry {
    Direct,
    Proxy(String),
}

impl fmt::Display for ProxyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyEntry::Direct => write!(f, "direct"),
            ProxyEntry::Proxy(addr) => write!(f, "{addr}"),
        }
    }
}

/// Immutable, shuffled sequence of proxy entries. Always at least one entry.
#[derive(Debug, Clone)]
pub struct ProxyPool {
    entries: Vec<ProxyEntry>,
}

impl ProxyPool {
    pub fn new(addresses: Vec<String>) -> Self {
        if addresses.is_empty() {
            return Self {
                entries: vec![ProxyEntry::Direct],
            };
        }

        let mut entries: Vec<ProxyEntry> =
            addresses.into_iter().map(ProxyEntry::Proxy).collect();

        // Fisher-Yates; each address keeps exactly one slot.
        let mut rng = rand::rng();
        for i in (1..entries.len()).rev() {
            let j = rng.random_range(0..=i);
            entries.swap(i, j);
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> &ProxyEntry {
        &self.entries[index]
    }

    pub fn entries(&self) -> &[ProxyEntry] {
        &self.entries
    }
}
