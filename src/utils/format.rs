// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/utils/format.rs
// Version: 1.1.0
//
// This file provides utility functions for formatting statistics in the pool
// miner, located in the utils subdirectory. It formats hashrate, uptime, and
// counts for logs and the dashboard, and rounds values for the status file.
//
// Tree Location:
// - src/utils/format.rs (formatting utilities)
// - Depends on: std

use std::time::Duration;

/// Utility functions for formatting miner statistics
pub struct FormatUtils;

impl FormatUtils {
    /// Format hashrate in appropriate units (H/s, KH/s, MH/s, GH/s)
    pub fn format_hashrate(hashrate: f64) -> String {
        if hashrate >= 1_000_000_000.0 {
            format!("{:.2} GH/s", hashrate / 1_000_000_000.0)
        } else if hashrate >= 1_000_000.0 {
            format!("{:.2} MH/s", hashrate / 1_000_000.0)
        } else if hashrate >= 1_000.0 {
            format!("{:.2} KH/s", hashrate / 1_000.0)
        } else {
            format!("{:.2} H/s", hashrate)
        }
    }

    /// Format an uptime as `1h 02m 03s`
    pub fn format_uptime(duration: Duration) -> String {
        let secs = duration.as_secs();
        let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
        if h > 0 {
            format!("{}h {:02}m {:02}s", h, m, s)
        } else if m > 0 {
            format!("{}m {:02}s", m, s)
        } else {
            format!("{}s", s)
        }
    }

    /// Format large numbers with suffixes (K, M, B, T)
    pub fn format_number(num: u64) -> String {
        if num >= 1_000_000_000_000 {
            format!("{:.1}T", num as f64 / 1_000_000_000_000.0)
        } else if num >= 1_000_000_000 {
            format!("{:.1}B", num as f64 / 1_000_000_000.0)
        } else if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Round to one decimal place
    pub fn round1(value: f64) -> f64 {
        (value * 10.0).round() / 10.0
    }
}


// Changelog:
// - v1.1.0: Added format_uptime and round1; dropped relative duration formatting.
// - v1.0.0: Hashrate and number formatting.
