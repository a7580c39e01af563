// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/shutdown.rs
// Version: 1.1.0
//
// This file provides the cooperative shutdown signal. The process holds one
// root signal; each pool session runs under a child that also fires when the
// connection is lost.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Longest single sleep step between shutdown checks
const SLEEP_STEP: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal scoped to one session; triggering it leaves the parent untouched
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once this signal or any parent is triggered
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Sleep in short steps; returns false if shutdown cut the sleep short
    pub async fn sleep(&self, duration: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + duration;
        loop {
            if self.is_triggered() {
                return false;
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return true;
            }
            let step = (deadline - now).min(SLEEP_STEP);
            tokio::select! {
                _ = tokio::time::sleep(step) => {}
                _ = self.token.cancelled() => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sleep_completes_without_shutdown() {
        let shutdown = Shutdown::new();
        assert!(shutdown.sleep(Duration::from_millis(10)).await);
    }

    #[tokio::test]
    async fn test_trigger_interrupts_sleep() {
        let shutdown = Shutdown::new();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.trigger();
        });

        let started = std::time::Instant::now();
        assert!(!shutdown.sleep(Duration::from_secs(30)).await);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(shutdown.is_triggered());
        shutdown.cancelled().await;
    }

    #[tokio::test]
    async fn test_child_follows_parent_only() {
        let root = Shutdown::new();
        let session = root.child();
        session.trigger();
        assert!(session.is_triggered());
        assert!(!root.is_triggered());

        let next_session = root.child();
        root.trigger();
        assert!(next_session.is_triggered());
        next_session.cancelled().await;
    }
}

// Changelog:
// - v1.1.0: Built on CancellationToken; per-session child signals.
// - v1.0.0: Shared shutdown flag with cancellable sleeps.
