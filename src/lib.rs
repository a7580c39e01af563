// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/lib.rs
// Version: 1.2.0
//
// This file serves as the main library entry point for the pool miner,
// located at the root of the source tree. It exports all public modules
// and types that the binary and the integration tests use.
//
// Tree Location:
// - src/lib.rs (root library file)
// - Exports modules: accelerator, core, miner, pool, telemetry, utils

pub mod accelerator;
pub mod core;
pub mod miner;
pub mod pool;
pub mod telemetry;
pub mod utils;

// Re-export commonly used types at the crate root for convenience
pub use crate::core::{Args, Job, MinerConfig};
pub use crate::miner::{JobStore, MinerStats, Shutdown, Supervisor};
pub use crate::pool::PoolClient;

// Changelog:
// - v1.2.0: Dropped the boxed Result alias; modules return typed errors.
// - v1.1.0: Pool client library for SASEUL with accelerator and telemetry modules.
// - v1.0.0: Library root organizing core, miner, pool and utils.
