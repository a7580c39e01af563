// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/pending.rs
// Version: 1.0.0
//
// This file tracks requests awaiting a reply so the receiver loop can tell a
// share result apart from other replies. Entries expire after a fixed window.

use log::debug;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

const LOG_TARGET: &str = "saseul::pool_miner::pending";

#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub method: String,
    pub sent_at: Instant,
}

/// Outstanding requests keyed by id
#[derive(Debug)]
pub struct PendingRequests {
    inner: Mutex<HashMap<u64, PendingRequest>>,
    window: Duration,
}

impl PendingRequests {
    pub fn new(window: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            window,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u64, PendingRequest>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn register(&self, id: u64, method: &str) {
        self.lock().insert(
            id,
            PendingRequest {
                method: method.to_string(),
                sent_at: Instant::now(),
            },
        );
    }

    /// Remove and return the request matching a reply id
    pub fn take(&self, id: u64) -> Option<PendingRequest> {
        self.lock().remove(&id)
    }

    /// Drop requests older than the wait window; returns how many were dropped
    pub fn prune(&self) -> usize {
        let window = self.window;
        let mut map = self.lock();
        let before = map.len();
        map.retain(|_, request| request.sent_at.elapsed() < window);
        let expired = before - map.len();
        if expired > 0 {
            debug!(target: LOG_TARGET, "Expired {} unanswered request(s)", expired);
        }
        expired
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_take() {
        let pending = PendingRequests::new(Duration::from_secs(60));
        pending.register(1, "mining.submit");
        pending.register(2, "mining.hashrate");
        assert_eq!(pending.len(), 2);

        let request = pending.take(1).unwrap();
        assert_eq!(request.method, "mining.submit");
        assert!(pending.take(1).is_none());
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_prune_expired() {
        let pending = PendingRequests::new(Duration::ZERO);
        pending.register(1, "mining.submit");
        assert_eq!(pending.prune(), 1);
        assert!(pending.is_empty());

        let pending = PendingRequests::new(Duration::from_secs(60));
        pending.register(1, "mining.submit");
        assert_eq!(pending.prune(), 0);
        assert_eq!(pending.len(), 1);
    }
}

// Changelog:
// - v1.0.0: Pending request table with a reply window.
