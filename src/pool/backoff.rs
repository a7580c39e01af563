// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/backoff.rs
// Version: 1.0.0
//
// This file implements the capped exponential delay between failed pool
// connection attempts.

use std::time::Duration;

const GROWTH: f64 = 1.5;

#[derive(Debug, Clone)]
pub struct ReconnectBackoff {
    base: Duration,
    max: Duration,
    current: Duration,
}

impl ReconnectBackoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        let max = max.max(base);
        Self {
            base,
            max,
            current: base,
        }
    }

    /// Delay to wait now; grows the following delay by 1.5x up to the cap
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.mul_f64(GROWTH).min(self.max);
        delay
    }

    /// Back to the base delay after a successful connect
    pub fn reset(&mut self) {
        self.current = self.base;
    }

    pub fn base(&self) -> Duration {
        self.base
    }
}


// Changelog:
// - v1.0.0: Reconnect backoff, base 5s, growth 1.5x, cap 60s by default.
