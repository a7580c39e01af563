// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/protocol.rs
// Version: 1.1.0
//
// This file builds the request payloads sent to the pool, located in the pool
// subdirectory. Ids are assigned by the sender; builders only shape params.
//
// Tree Location:
// - src/pool/protocol.rs (pool request builders)
// - Depends on: serde_json, crate::pool::messages

use crate::core::types::Share;
use crate::pool::messages::{HashrateParams, Request, SubmitParams};
use crate::utils::user_agent::user_agent;
use log::debug;
use serde_json::{Value, json};

const LOG_TARGET: &str = "saseul::pool_miner::protocol";

/// Constructs messages for the pool protocol
pub struct StratumProtocol;

impl StratumProtocol {
    /// Wrap params into a request frame
    pub fn request(id: u64, method: &str, params: Value) -> Request {
        Request {
            id,
            method: method.to_string(),
            params,
        }
    }

    /// `mining.subscribe` params: the client signature
    pub fn subscribe_params() -> Value {
        json!([user_agent()])
    }

    /// `mining.authorize` params: address and worker
    pub fn authorize_params(miner_address: &str, worker_name: &str) -> Value {
        json!([miner_address, worker_name])
    }

    /// `mining.submit` params for a found share
    pub fn submit_params(
        miner_address: &str,
        worker_name: &str,
        share: &Share,
    ) -> serde_json::Result<Value> {
        let params = SubmitParams {
            miner_address,
            worker_name,
            job_id: &share.job_id,
            nonce: &share.nonce,
            timestamp: share.timestamp,
            blockhash: &share.blockhash,
        };
        let value = serde_json::to_value(params)?;
        debug!(target: LOG_TARGET, "Submit params: {}", value);
        Ok(value)
    }

    /// `mining.hashrate` params, in H/s
    pub fn hashrate_params(hashrate: f64) -> serde_json::Result<Value> {
        serde_json::to_value(HashrateParams { hashrate })
    }
}


// Changelog:
// - v1.1.0: Ids move to the sender; builders return params only.
// - v1.0.0: Subscribe, authorize, submit and hashrate requests.
