// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/stats/mod.rs
// Version: 1.1.0
//
// This file is the module declaration for the statistics tracking functionality
// of the pool miner, located in the stats subdirectory of the miner module.
//
// Tree Location:
// - src/miner/stats/mod.rs (stats module entry point)
// - Submodules: miner_stats

pub mod miner_stats;

// Re-export key types for convenience
pub use miner_stats::{MinerStats, RoundInfo, ShareInfo};

// Changelog:
// - v1.1.0: Per-thread and GPU device stats removed; the accelerator reports its own.
// - v1.0.0: Stats module entry point.
