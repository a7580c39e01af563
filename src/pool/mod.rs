// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/mod.rs
// Version: 1.1.0
//
// This file is the module declaration for the pool communication functionality
// of the pool miner, located in the pool subdirectory. It declares submodules
// and re-exports key types for use throughout the project.
//
// Tree Location:
// - src/pool/mod.rs (pool module entry point)
// - Submodules: backoff, client, codec, connection, error, messages, pending,
//   protocol, receiver

pub mod backoff;
pub mod client;
pub mod codec;
pub mod connection;
pub mod error;
pub mod messages;
pub mod pending;
pub mod protocol;
pub mod receiver;

// Re-export key types for convenience
pub use backoff::ReconnectBackoff;
pub use client::{PoolClient, PoolSession};
pub use codec::{FrameReader, PoolCodec, PoolMessage};
pub use connection::{ConnectionState, ConnectionStatus, PoolSender};
pub use error::PoolError;
pub use pending::PendingRequests;
pub use protocol::StratumProtocol;
pub use receiver::{MessageRouter, ReceiverLoop};

// Changelog:
// - v1.1.0: Line codec, connection state, pending requests, receiver loop and
//   reconnect backoff.
// - v1.0.0: Pool client, messages and protocol submodules.
