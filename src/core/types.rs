// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/types.rs
// Version: 1.2.0
//
// This file defines core data structures for the pool miner, located in the
// core subdirectory. It includes command-line arguments, the runtime
// configuration, pool jobs, block headers, and found shares.
//
// Tree Location:
// - src/core/types.rs (core data structures)
// - Depends on: clap, serde, serde_json, thiserror

use crate::core::difficulty::{hash_limit, parse_hash, target_at_least};
use crate::core::sha256::{merkle_root, object_hash, sha256_hex, time_hash};
use clap::Parser;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Command-line arguments for the pool miner
#[derive(Parser, Debug, Clone)]
#[command(
    name = "saseul-pool-miner",
    version,
    about = "SASEUL pool client that delegates proof-of-work to a local GPU accelerator",
    long_about = "Connects to a SASEUL mining pool, receives jobs, hands each search round\n\
                  to the GPU accelerator over its Unix socket, and submits found shares.\n\n\
                  Every option can also be set through the environment variable shown in --help.\n\n\
                  Example:\n\
                    saseul-pool-miner --pool-host pool.takty.kr --pool-port 3333 --address YOUR_ADDRESS --worker rig-01"
)]
pub struct Args {
    /// Pool hostname or IP address
    #[arg(long, env = "POOL_HOST", default_value = "pool.takty.kr", value_name = "HOST")]
    pub pool_host: String,

    /// Pool stratum port
    #[arg(long, env = "POOL_PORT", default_value = "3333", value_name = "PORT")]
    pub pool_port: u16,

    /// SASEUL address credited for found shares
    #[arg(short = 'u', long = "address", env = "MINER_ADDRESS", value_name = "ADDRESS")]
    pub address: String,

    /// Worker identifier reported to the pool
    #[arg(short = 'w', long, env = "WORKER_NAME", default_value = "gpu-worker", value_name = "NAME")]
    pub worker: String,

    /// Unix socket of the GPU accelerator
    #[arg(long, env = "GPU_SOCK_PATH", default_value = "/var/saseul-shared/gpu_pow.sock", value_name = "PATH")]
    pub gpu_sock: PathBuf,

    /// Upper bound for one accelerator search round, in seconds
    #[arg(long, env = "GPU_SOCK_TIMEOUT", default_value = "120", value_name = "SECONDS")]
    pub gpu_timeout: u64,

    /// Status document published by the accelerator itself
    #[arg(long, env = "GPU_STATUS_FILE", default_value = "/var/saseul-shared/gpu_status.json", value_name = "PATH")]
    pub gpu_status_file: PathBuf,

    /// Status document written by this miner
    #[arg(long, env = "STATUS_FILE", default_value = "/var/saseul-shared/gpu_pool_status.json", value_name = "PATH")]
    pub status_file: PathBuf,

    /// Directory for the day-partitioned success log
    #[arg(long, env = "SUCCESS_LOG_DIR", default_value = "/var/saseul-shared/success_logs", value_name = "DIR")]
    pub success_log_dir: PathBuf,

    /// Base reconnect delay in seconds
    #[arg(long, default_value = "5", value_name = "SECONDS")]
    pub reconnect_delay: f64,

    /// Reconnect delay cap in seconds
    #[arg(long, default_value = "60", value_name = "SECONDS")]
    pub max_reconnect_delay: f64,

    /// Interval between hashrate reports, in seconds
    #[arg(long, default_value = "30", value_name = "SECONDS")]
    pub report_interval: u64,

    /// Optional log4rs YAML configuration
    #[arg(long, env = "LOG_CONFIG", value_name = "PATH")]
    pub log_config: Option<PathBuf>,
}

impl Args {
    /// Validate arguments and return helpful errors
    pub fn validate(&self) -> Result<(), String> {
        if self.address.trim().is_empty() {
            return Err("Miner address is required. Use --address YOUR_ADDRESS or MINER_ADDRESS".to_string());
        }
        if self.worker.trim().is_empty() {
            return Err("Worker name must not be empty".to_string());
        }
        if self.pool_host.trim().is_empty() {
            return Err("Pool host must not be empty".to_string());
        }
        if self.pool_port == 0 {
            return Err("Pool port must be between 1 and 65535".to_string());
        }
        if self.gpu_timeout == 0 {
            return Err("Accelerator timeout must be at least 1 second".to_string());
        }
        if self.report_interval == 0 {
            return Err("Report interval must be at least 1 second".to_string());
        }
        if !(self.reconnect_delay.is_finite() && self.reconnect_delay > 0.0) {
            return Err("Reconnect delay must be a positive number of seconds".to_string());
        }
        if !self.max_reconnect_delay.is_finite() || self.max_reconnect_delay < self.reconnect_delay {
            return Err("Max reconnect delay must be at least the base reconnect delay".to_string());
        }
        Ok(())
    }

    /// Build the runtime configuration from validated arguments
    pub fn into_config(self) -> Result<MinerConfig, String> {
        self.validate()?;
        Ok(MinerConfig {
            pool_host: self.pool_host,
            pool_port: self.pool_port,
            miner_address: self.address,
            worker_name: self.worker,
            accelerator_socket: self.gpu_sock,
            accelerator_timeout: Duration::from_secs(self.gpu_timeout),
            accelerator_status_file: self.gpu_status_file,
            status_file: self.status_file,
            success_log_dir: self.success_log_dir,
            reconnect_delay: Duration::from_secs_f64(self.reconnect_delay),
            max_reconnect_delay: Duration::from_secs_f64(self.max_reconnect_delay),
            report_interval: Duration::from_secs(self.report_interval),
            ..MinerConfig::default()
        })
    }
}

/// Runtime configuration shared by the supervisor and both session loops
#[derive(Debug, Clone)]
pub struct MinerConfig {
    pub pool_host: String,
    pub pool_port: u16,
    pub miner_address: String,
    pub worker_name: String,
    pub accelerator_socket: PathBuf,
    pub accelerator_timeout: Duration,
    pub accelerator_status_file: PathBuf,
    pub status_file: PathBuf,
    pub success_log_dir: PathBuf,
    pub reconnect_delay: Duration,
    pub max_reconnect_delay: Duration,
    pub report_interval: Duration,
    pub connect_timeout: Duration,
    pub subscribe_timeout: Duration,
    pub authorize_timeout: Duration,
    pub first_job_timeout: Duration,
    /// Read timeout of the receiver loop; bounds its shutdown latency
    pub receive_poll: Duration,
    pub accelerator_retry_delay: Duration,
    /// How long a submitted request waits for its reply before it is dropped
    pub pending_window: Duration,
}

impl MinerConfig {
    /// Pool endpoint in `host:port` form
    pub fn pool_endpoint(&self) -> String {
        format!("{}:{}", self.pool_host, self.pool_port)
    }
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            pool_host: "pool.takty.kr".to_string(),
            pool_port: 3333,
            miner_address: String::new(),
            worker_name: "gpu-worker".to_string(),
            accelerator_socket: PathBuf::from("/var/saseul-shared/gpu_pow.sock"),
            accelerator_timeout: Duration::from_secs(120),
            accelerator_status_file: PathBuf::from("/var/saseul-shared/gpu_status.json"),
            status_file: PathBuf::from("/var/saseul-shared/gpu_pool_status.json"),
            success_log_dir: PathBuf::from("/var/saseul-shared/success_logs"),
            reconnect_delay: Duration::from_secs(5),
            max_reconnect_delay: Duration::from_secs(60),
            report_interval: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(30),
            subscribe_timeout: Duration::from_secs(10),
            authorize_timeout: Duration::from_secs(15),
            first_job_timeout: Duration::from_secs(10),
            receive_poll: Duration::from_secs(5),
            accelerator_retry_delay: Duration::from_secs(2),
            pending_window: Duration::from_secs(60),
        }
    }
}

/// Opaque job identifier assigned by the pool
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Number(u64),
    Text(String),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Number(n) => write!(f, "{}", n),
            JobId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Errors raised when a job violates its target invariants
#[derive(Error, Debug, PartialEq)]
pub enum JobError {
    #[error("Invalid {field} hex: {value}")]
    InvalidTarget { field: &'static str, value: String },

    #[error("Share target {share_target} is harder than block target {block_target}")]
    InconsistentTargets {
        share_target: String,
        block_target: String,
    },
}

/// Job delivered by `mining.notify`; replaces any previous job wholesale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Pool job identifier (the height stands in when absent)
    #[serde(default)]
    pub job_id: Option<JobId>,

    pub height: u64,

    #[serde(deserialize_with = "deserialize_difficulty")]
    pub difficulty: u64,

    #[serde(default, deserialize_with = "deserialize_optional_difficulty")]
    pub share_difficulty: Option<u64>,

    /// Block target as sent by the pool (informational)
    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub share_target: Option<String>,

    pub previous_blockhash: String,

    pub main_height: u64,

    pub main_blockhash: String,

    pub validator: String,

    pub miner: String,

    #[serde(default)]
    pub receipts: Vec<Value>,
}

impl Job {
    /// Identifier used in submissions and round bookkeeping
    pub fn id(&self) -> JobId {
        self.job_id
            .clone()
            .unwrap_or(JobId::Number(self.height))
    }

    /// Block target derived from the job difficulty
    pub fn block_target(&self) -> String {
        hash_limit(self.difficulty)
    }

    /// Target handed to the accelerator: explicit share target, else derived
    /// from the share difficulty, else the block target
    pub fn effective_share_target(&self) -> String {
        if let Some(target) = &self.share_target {
            return target.to_lowercase();
        }
        match self.share_difficulty {
            Some(difficulty) => hash_limit(difficulty),
            None => self.block_target(),
        }
    }

    /// Check the target invariants of a freshly received job
    pub fn validate(&self) -> Result<(), JobError> {
        if let Some(target) = &self.share_target {
            if parse_hash(target).is_none() {
                return Err(JobError::InvalidTarget {
                    field: "share_target",
                    value: target.clone(),
                });
            }
        }
        let share_target = self.effective_share_target();
        let block_target = self.block_target();
        if !target_at_least(&share_target, &block_target) {
            return Err(JobError::InconsistentTargets {
                share_target,
                block_target,
            });
        }
        Ok(())
    }

    /// Header object for one mining round
    pub fn header(&self, timestamp: u64) -> BlockHeader<'_> {
        BlockHeader {
            height: self.height,
            timestamp,
            receipt_root: merkle_root(&self.receipts),
            main_height: self.main_height,
            main_blockhash: &self.main_blockhash,
            validator: &self.validator,
            miner: &self.miner,
        }
    }

    /// Proof-of-work prefix: `previous_blockhash ∥ header_hash`
    pub fn pow_left(&self, timestamp: u64) -> serde_json::Result<String> {
        let header_hash = object_hash(&self.header(timestamp))?;
        Ok(format!("{}{}", self.previous_blockhash, header_hash))
    }
}

/// Block header object hashed into the proof-of-work prefix.
///
/// Field order is the wire key order and must not change.
#[derive(Debug, Serialize)]
pub struct BlockHeader<'a> {
    pub height: u64,
    pub timestamp: u64,
    pub receipt_root: String,
    pub main_height: u64,
    pub main_blockhash: &'a str,
    pub validator: &'a str,
    pub miner: &'a str,
}

/// A nonce found by the accelerator, ready for submission
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub job_id: JobId,
    pub height: u64,
    pub nonce: String,
    pub timestamp: u64,
    /// `sha256(pow_left ∥ nonce)`
    pub root: String,
    /// Time-prefixed hash submitted to the pool
    pub blockhash: String,
    /// Root also satisfies the block target
    pub is_block: bool,
}

impl Share {
    /// Derive the submission values for a nonce found under `job`
    pub fn new(job: &Job, pow_left: &str, nonce: &str, timestamp: u64) -> Self {
        let root = sha256_hex(&format!("{}{}", pow_left, nonce));
        let blockhash = time_hash(&root, timestamp);
        let is_block = crate::core::difficulty::hash_meets_target(&root, &job.block_target());
        Self {
            job_id: job.id(),
            height: job.height,
            nonce: nonce.to_string(),
            timestamp,
            root,
            blockhash,
            is_block,
        }
    }
}

fn difficulty_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.floor() as u64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.floor() as u64)
            })
        }
        _ => None,
    }
}

fn deserialize_difficulty<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    difficulty_from_value(&value)
        .ok_or_else(|| de::Error::custom(format!("invalid difficulty: {}", value)))
}

fn deserialize_optional_difficulty<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => difficulty_from_value(&value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid share difficulty: {}", value))),
    }
}


// Changelog:
// - v1.2.0: Added MinerConfig and Args::into_config.
// - v1.1.0: Job::validate enforces share target >= block target.
// - v1.0.0: Replaced pool job/mining job split with a single SASEUL Job schema.
