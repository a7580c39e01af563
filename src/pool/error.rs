// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/error.rs
// Version: 1.0.0
//
// This file defines the error type shared by the pool connection manager,
// the frame codec and the receiver loop.

use crate::core::types::JobError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Connection to {endpoint} failed: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Timed out after {timeout:?} waiting for {step}")]
    Timeout { step: &'static str, timeout: Duration },

    #[error("Subscribe rejected: {0}")]
    SubscribeRejected(String),

    #[error("Authorization rejected: {0}")]
    AuthorizeRejected(String),

    #[error("Pool closed the connection")]
    Disconnected,

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid job: {0}")]
    InvalidJob(#[from] JobError),
}

impl PoolError {
    /// Transport-level failures that call for a backoff reconnect
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PoolError::ConnectionFailed { .. } | PoolError::Io(_) | PoolError::Disconnected
        )
    }
}

// Changelog:
// - v1.0.0: Initial pool error taxonomy.
