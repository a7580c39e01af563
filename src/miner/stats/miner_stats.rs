// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/stats/miner_stats.rs
// Version: 1.2.0
//
// This file implements miner-wide statistics tracking for the pool miner,
// located in the stats subdirectory of the miner module. Counters live for the
// whole process and survive pool reconnects.
//
// Tree Location:
// - src/miner/stats/miner_stats.rs (miner-wide statistics logic)
// - Depends on: std, log, crate::utils::format

use crate::utils::format::FormatUtils;
use log::info;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

const LOG_TARGET: &str = "saseul::pool_miner::stats";

const RECENT_SHARES: usize = 100;

#[derive(Debug, Clone)]
pub struct ShareInfo {
    pub time: Instant,
    pub height: u64,
    pub is_block: bool,
}

/// Figures from the most recent accelerator round
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundInfo {
    pub height: u64,
    pub difficulty: u64,
    pub ghps: f64,
    pub gpu_ids: Vec<String>,
}

pub struct MinerStats {
    pub hashes_computed: AtomicU64,
    pub shares_submitted: AtomicU64,
    pub shares_accepted: AtomicU64,
    pub shares_rejected: AtomicU64,
    pub blocks_found: AtomicU64,
    pub rounds_completed: AtomicU64,
    start_time: Instant,
    recent_shares: Mutex<VecDeque<ShareInfo>>,
    last_round: Mutex<RoundInfo>,
}

impl MinerStats {
    pub fn new() -> Self {
        Self {
            hashes_computed: AtomicU64::new(0),
            shares_submitted: AtomicU64::new(0),
            shares_accepted: AtomicU64::new(0),
            shares_rejected: AtomicU64::new(0),
            blocks_found: AtomicU64::new(0),
            rounds_completed: AtomicU64::new(0),
            start_time: Instant::now(),
            recent_shares: Mutex::new(VecDeque::with_capacity(RECENT_SHARES)),
            last_round: Mutex::new(RoundInfo::default()),
        }
    }

    fn shares(&self) -> MutexGuard<'_, VecDeque<ShareInfo>> {
        self.recent_shares.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn round(&self) -> MutexGuard<'_, RoundInfo> {
        self.last_round.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Account one completed accelerator round
    pub fn record_round(&self, hashes: u64, round: RoundInfo) {
        self.hashes_computed.fetch_add(hashes, Ordering::Relaxed);
        self.rounds_completed.fetch_add(1, Ordering::Relaxed);
        *self.round() = round;
    }

    /// Account one submitted share
    pub fn record_share_submitted(&self, height: u64, is_block: bool) {
        self.shares_submitted.fetch_add(1, Ordering::Relaxed);
        if is_block {
            self.blocks_found.fetch_add(1, Ordering::Relaxed);
        }
        let mut shares = self.shares();
        shares.push_back(ShareInfo {
            time: Instant::now(),
            height,
            is_block,
        });
        if shares.len() > RECENT_SHARES {
            shares.pop_front();
        }
    }

    pub fn record_share_result(&self, accepted: bool) {
        if accepted {
            self.shares_accepted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.shares_rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn last_round(&self) -> RoundInfo {
        self.round().clone()
    }

    pub fn total_hashes(&self) -> u64 {
        self.hashes_computed.load(Ordering::Relaxed)
    }

    pub fn total_shares(&self) -> u64 {
        self.shares_submitted.load(Ordering::Relaxed)
    }

    pub fn total_blocks(&self) -> u64 {
        self.blocks_found.load(Ordering::Relaxed)
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Session average in H/s
    pub fn average_hashrate(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_hashes() as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn time_since_last_share(&self) -> Option<Duration> {
        self.shares().back().map(|s| s.time.elapsed())
    }

    /// Log a text dashboard; `reported_hashrate` is in H/s
    pub fn display_dashboard(&self, pool: &str, connected: bool, reported_hashrate: f64) {
        let round = self.last_round();
        let submitted = self.total_shares();
        let accepted = self.shares_accepted.load(Ordering::Relaxed);
        let rejected = self.shares_rejected.load(Ordering::Relaxed);
        let acceptance_rate = if submitted > 0 {
            (accepted as f64 / submitted as f64) * 100.0
        } else {
            0.0
        };
        let last_share = self
            .time_since_last_share()
            .map(|d| format!("{} ago", FormatUtils::format_uptime(d)))
            .unwrap_or_else(|| "never".to_string());

        info!(target: LOG_TARGET, "📊 MINER DASHBOARD - {}", pool);
        info!(target: LOG_TARGET, "├─ Pool: {}", if connected { "connected" } else { "disconnected" });
        info!(target: LOG_TARGET, "├─ Height: {} (difficulty {})", round.height, round.difficulty);
        info!(target: LOG_TARGET, "├─ GPU Hashrate: {}", FormatUtils::format_hashrate(reported_hashrate));
        info!(target: LOG_TARGET, "├─ Last Round: {}", FormatUtils::format_hashrate(round.ghps * 1e9));
        info!(target: LOG_TARGET, "├─ Devices: {}", device_list(&round.gpu_ids));
        info!(target: LOG_TARGET, "├─ Session Avg: {}", FormatUtils::format_hashrate(self.average_hashrate()));
        info!(target: LOG_TARGET, "├─ Total Work: {} hashes", FormatUtils::format_number(self.total_hashes()));
        info!(target: LOG_TARGET, "├─ Shares: {}/{} ({:.1}% accepted)", accepted, submitted, acceptance_rate);
        info!(target: LOG_TARGET, "├─ Rejected Shares: {}", rejected);
        info!(target: LOG_TARGET, "├─ Blocks: {}", self.total_blocks());
        info!(target: LOG_TARGET, "├─ Last Share: {}", last_share);
        info!(target: LOG_TARGET, "└─ Uptime: {}", FormatUtils::format_uptime(self.uptime()));
    }
}

fn device_list(ids: &[String]) -> String {
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.iter().map(|id| format!("GPU{}", id)).collect::<Vec<_>>().join(", ")
    }
}

impl Default for MinerStats {
    fn default() -> Self {
        Self::new()
    }
}


// Changelog:
// - v1.2.0: Dashboard lists the devices used in the last round.
// - v1.1.0: Pool miner counters: hashes, shares, blocks, accepted/rejected.
//   - Per-thread statistics replaced by the last accelerator round.
// - v1.0.0: Miner-wide statistics and dashboard.
