// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/telemetry/status_file.rs
// Version: 1.1.0
//
// This file writes the miner status document consumed by dashboards. Writes
// go to a temporary sibling first and are renamed into place so readers never
// see a partial document.

use crate::miner::stats::MinerStats;
use crate::utils::format::FormatUtils;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::{
    fs::{self, OpenOptions},
    io::AsyncWriteExt,
};

static LOG_TARGET: &str = "saseul::pool_miner::status_file";

/// Device ids assumed when the accelerator reports none
pub const DEFAULT_DEVICE_IDS: [&str; 2] = ["0", "1"];

#[derive(Error, Debug)]
pub enum StatusFileError {
    #[error("Status file path {path:?} has no file name")]
    InvalidPath { path: PathBuf },

    #[error("Status file does not exist at {path:?}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to serialize status file")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Failed to deserialize status file: {message}")]
    DeserializationError { message: String },

    #[error("IO operation failed on {path:?}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write temporary file for atomic replace")]
    AtomicWriteError {
        #[source]
        source: std::io::Error,
    },
}

/// Status document; key order is the published layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MinerStatus {
    pub ts: i64,
    pub mode: String,
    pub pool: String,
    pub pool_connected: bool,
    pub gpus: Map<String, Value>,
    pub total_mhs: f64,
    pub height: u64,
    pub difficulty: String,
    pub uptime_sec: u64,
    pub total_hashes: u64,
    pub total_shares: u64,
    pub total_blocks: u64,
}

/// Inputs that vary per write
#[derive(Debug, Clone, Default)]
pub struct StatusSnapshot {
    pub pool_connected: bool,
    pub total_mhs: f64,
    pub device_ids: Vec<String>,
    pub height: u64,
    pub difficulty: String,
}

impl MinerStatus {
    /// Assemble the document; the aggregate rate is split evenly across devices
    pub fn build(pool: &str, snapshot: &StatusSnapshot, stats: &MinerStats) -> Self {
        let ids: Vec<String> = if snapshot.device_ids.is_empty() {
            DEFAULT_DEVICE_IDS.iter().map(|s| s.to_string()).collect()
        } else {
            snapshot.device_ids.clone()
        };
        let per_device = FormatUtils::round1(snapshot.total_mhs / ids.len() as f64);
        let gpus = ids
            .into_iter()
            .map(|id| (id, Value::from(per_device)))
            .collect();

        Self {
            ts: chrono::Utc::now().timestamp(),
            mode: "pool".to_string(),
            pool: pool.to_string(),
            pool_connected: snapshot.pool_connected,
            gpus,
            total_mhs: FormatUtils::round1(snapshot.total_mhs),
            height: snapshot.height,
            difficulty: snapshot.difficulty.clone(),
            uptime_sec: stats.uptime().as_secs(),
            total_hashes: stats.total_hashes(),
            total_shares: stats.total_shares(),
            total_blocks: stats.total_blocks(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusFileManager {
    file_path: PathBuf,
    temp_path: PathBuf,
}

impl StatusFileManager {
    pub fn new(file_path: PathBuf) -> Result<Self, StatusFileError> {
        let file_name = file_path
            .file_name()
            .ok_or_else(|| StatusFileError::InvalidPath {
                path: file_path.clone(),
            })?
            .to_string_lossy()
            .into_owned();
        let temp_path = file_path.with_file_name(format!("{}.tmp", file_name));
        Ok(Self {
            file_path,
            temp_path,
        })
    }

    async fn ensure_directory_exists(&self) -> Result<(), StatusFileError> {
        if let Some(dir) = self.file_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .await
                    .map_err(|e| StatusFileError::IoError {
                        path: dir.to_path_buf(),
                        source: e,
                    })?;
            }
        }
        Ok(())
    }

    pub async fn save(&self, status: &MinerStatus) -> Result<(), StatusFileError> {
        self.ensure_directory_exists().await?;

        let contents = serde_json::to_vec(status)?;

        {
            let mut temp_file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.temp_path)
                .await
                .map_err(|e| StatusFileError::AtomicWriteError { source: e })?;

            temp_file
                .write_all(&contents)
                .await
                .map_err(|e| StatusFileError::AtomicWriteError { source: e })?;

            temp_file
                .flush()
                .await
                .map_err(|e| StatusFileError::AtomicWriteError { source: e })?;
        }

        fs::rename(&self.temp_path, &self.file_path)
            .await
            .map_err(|e| StatusFileError::AtomicWriteError { source: e })?;

        debug!(target: LOG_TARGET, "Status written to {:?}", self.file_path);
        Ok(())
    }

    pub async fn load(&self) -> Result<MinerStatus, StatusFileError> {
        if !self.file_path.exists() {
            return Err(StatusFileError::FileNotFound {
                path: self.file_path.clone(),
            });
        }

        let contents =
            fs::read_to_string(&self.file_path)
                .await
                .map_err(|e| StatusFileError::IoError {
                    path: self.file_path.clone(),
                    source: e,
                })?;

        serde_json::from_str(&contents).map_err(|e| StatusFileError::DeserializationError {
            message: e.to_string(),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }
}

// Changelog:
// - v1.1.0: Miner status document with even per-device split.
// - v1.0.0: Atomic status file manager.
