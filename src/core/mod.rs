// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/mod.rs
// Version: 1.0.0
//
// This file is the module declaration for the core functionality of the pool
// miner, located in the core subdirectory. It declares submodules and re-exports
// key types for use throughout the project.

pub mod difficulty;
pub mod sha256;
pub mod types;

// Re-export the most commonly used items
pub use difficulty::{hash_limit, hash_meets_target, parse_hash};
pub use sha256::{merkle_root, object_hash, sha256_hex, time_hash};
pub use types::{Args, BlockHeader, Job, JobError, JobId, MinerConfig, Share};

// Changelog:
// - v1.0.0: Core module for SASEUL hashing, targets and job types.
