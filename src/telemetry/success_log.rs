// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/telemetry/success_log.rs
// Version: 1.0.0
//
// This file appends one JSON line per found share to a file named after the
// current local date, e.g. `success_logs/2026-10-18.jsonl`.

use crate::accelerator::MineResponse;
use crate::core::types::JobId;
use chrono::{DateTime, Local};
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

const LOG_TARGET: &str = "saseul::pool_miner::success_log";

#[derive(Error, Debug)]
pub enum SuccessLogError {
    #[error("Failed to serialize success record")]
    Serialization(#[from] serde_json::Error),

    #[error("IO operation failed on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One found-share record
#[derive(Debug, Clone, Serialize)]
pub struct SuccessRecord {
    pub ts: String,
    pub mode: &'static str,
    pub result: &'static str,
    pub job_id: JobId,
    pub height: u64,
    pub main_height: u64,
    pub pow_left: String,
    pub target: String,
    pub nonce: String,
    pub hash: String,
    pub winner_gpu: Value,
    pub gpu_ids: Vec<Value>,
    pub nonce_stride: Value,
    pub snap_main_h: Value,
    pub snap_main_hash: String,
    pub snap_res_h: Value,
    pub snap_res_hash: String,
    pub elapsed_ms: f64,
    pub total_hashes: u64,
    pub ghps: f64,
}

/// Identity of the round a share was found in
#[derive(Debug, Clone)]
pub struct FoundRound<'a> {
    pub job_id: &'a JobId,
    pub height: u64,
    pub main_height: u64,
    pub pow_left: &'a str,
    pub target: &'a str,
}

impl SuccessRecord {
    pub fn new(round: &FoundRound<'_>, response: &MineResponse, at: DateTime<Local>) -> Self {
        Self {
            ts: at.format("%Y-%m-%d %H:%M:%S").to_string(),
            mode: "pool",
            result: "found",
            job_id: round.job_id.clone(),
            height: round.height,
            main_height: round.main_height,
            pow_left: round.pow_left.to_string(),
            target: round.target.to_string(),
            nonce: response.nonce.clone().unwrap_or_default(),
            hash: response.hash.clone().unwrap_or_default(),
            winner_gpu: response.winner_gpu.clone().unwrap_or(Value::from(-1)),
            gpu_ids: response.gpu_ids.clone(),
            nonce_stride: response.nonce_stride.clone().unwrap_or(Value::from(0)),
            snap_main_h: response.snap_main_h.clone().unwrap_or(Value::from(0)),
            snap_main_hash: response.snap_main_hash.clone().unwrap_or_default(),
            snap_res_h: response.snap_res_h.clone().unwrap_or(Value::from(0)),
            snap_res_hash: response.snap_res_hash.clone().unwrap_or_default(),
            elapsed_ms: response.elapsed_ms,
            total_hashes: response.total_hashes,
            ghps: response.ghps,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SuccessLog {
    directory: PathBuf,
}

impl SuccessLog {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Day file for `at`
    pub fn file_for(&self, at: &DateTime<Local>) -> PathBuf {
        self.directory
            .join(format!("{}.jsonl", at.format("%Y-%m-%d")))
    }

    /// Append `record` to the file of the day it was stamped
    pub async fn append(&self, record: &SuccessRecord, at: &DateTime<Local>) -> Result<PathBuf, SuccessLogError> {
        fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| SuccessLogError::Io {
                path: self.directory.clone(),
                source: e,
            })?;

        let path = self.file_for(at);
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let io_err = |e: std::io::Error| SuccessLogError::Io {
            path: path.clone(),
            source: e,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(io_err)?;
        file.write_all(line.as_bytes()).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;

        debug!(target: LOG_TARGET, "Success record appended to {:?}", path);
        Ok(path)
    }
}

// Changelog:
// - v1.0.0: Day-partitioned JSONL success log.
