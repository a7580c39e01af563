// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/accelerator/status.rs
// Version: 1.0.1
//
// This file reads the status document the accelerator publishes about itself,
// e.g. `{"total_mhs": 1480.4, "gpus": {"0": 740.2, "1": 740.2}}`.

use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs;

const LOG_TARGET: &str = "saseul::pool_miner::accelerator_status";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AcceleratorStatus {
    #[serde(default)]
    pub total_mhs: f64,
    #[serde(default)]
    pub gpus: Map<String, Value>,
}

impl AcceleratorStatus {
    /// Load the document; a missing or unreadable file reads as zero throughput
    pub async fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) => {
                debug!(target: LOG_TARGET, "No accelerator status at {:?}: {}", path, e);
                return Self::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(status) => status,
            Err(e) => {
                debug!(target: LOG_TARGET, "Unreadable accelerator status at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn device_ids(&self) -> Vec<String> {
        self.gpus.keys().cloned().collect()
    }

    pub fn is_reporting(&self) -> bool {
        self.total_mhs > 0.0
    }
}


// Changelog:
// - v1.0.1: Dropped the unused hashrate accessor.
// - v1.0.0: Reader for the accelerator's self-reported status.
