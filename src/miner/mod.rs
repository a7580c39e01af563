// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/mod.rs
// Version: 1.2.0
//
// This file is the module declaration for the miner functionality of the pool
// miner, located in the miner subdirectory. It declares submodules and re-exports
// key types for use throughout the project.
//
// Tree Location:
// - src/miner/mod.rs (miner module entry point)
// - Submodules: job_store, mining_loop, shutdown, stats, supervisor

pub mod job_store;
pub mod mining_loop;
pub mod shutdown;
pub mod stats;
pub mod supervisor;

// Re-export key types for convenience
pub use job_store::JobStore;
pub use mining_loop::{HashrateReporter, MiningLoop, SessionEnd};
pub use shutdown::Shutdown;
pub use stats::MinerStats;
pub use supervisor::Supervisor;

// Changelog:
// - v1.2.0: Replaced local CPU/GPU mining with accelerator-driven pool sessions.
//   - Added job store, mining loop, shutdown signal and session supervisor.
// - v1.1.0: Added GPU mining module.
// - v1.0.0: Miner module with stats tracking.
