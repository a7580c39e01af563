// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/messages.rs
// Version: 1.0.0
//
// This file defines the method names and parameter schemas exchanged with the
// pool, located in the pool subdirectory.

use crate::core::types::JobId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Method names on the pool wire
pub mod methods {
    pub const SUBSCRIBE: &str = "mining.subscribe";
    pub const AUTHORIZE: &str = "mining.authorize";
    pub const SUBMIT: &str = "mining.submit";
    pub const HASHRATE: &str = "mining.hashrate";
    pub const NOTIFY: &str = "mining.notify";
    pub const NOTIFY_BLOCK: &str = "mining.notify_block";
    pub const SET_DIFFICULTY: &str = "mining.set_difficulty";
}

/// Outgoing request frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    pub id: u64,
    pub method: String,
    pub params: Value,
}

/// Parameters of `mining.submit`
#[derive(Debug, Clone, Serialize)]
pub struct SubmitParams<'a> {
    pub miner_address: &'a str,
    pub worker_name: &'a str,
    pub job_id: &'a JobId,
    pub nonce: &'a str,
    pub timestamp: u64,
    pub blockhash: &'a str,
}

/// Parameters of `mining.hashrate`, in H/s
#[derive(Debug, Clone, Serialize)]
pub struct HashrateParams {
    pub hashrate: f64,
}

/// Parameters of `mining.notify_block`
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyBlockParams {
    #[serde(default)]
    pub height: Option<u64>,
}

// Changelog:
// - v1.0.0: Method constants and typed parameters for the SASEUL pool protocol.
