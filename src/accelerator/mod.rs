// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/accelerator/mod.rs
// Version: 1.0.0
//
// This file is the module declaration for the GPU accelerator integration,
// located in the accelerator subdirectory.
//
// Tree Location:
// - src/accelerator/mod.rs (accelerator module entry point)
// - Submodules: client, messages, status

pub mod client;
pub mod messages;
pub mod status;

pub use client::{AcceleratorClient, AcceleratorError};
pub use messages::{MineRequest, MineResponse, MineStatus};
pub use status::AcceleratorStatus;

// Changelog:
// - v1.0.0: Accelerator client, wire messages and status reader.
