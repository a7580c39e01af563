// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/telemetry/mod.rs
// Version: 1.0.0
//
// This file is the module declaration for status and success-log persistence,
// and the sink the mining loop reports through. Sink failures are logged and
// never interrupt mining.
//
// Tree Location:
// - src/telemetry/mod.rs (telemetry module entry point)
// - Submodules: status_file, success_log

pub mod status_file;
pub mod success_log;

pub use status_file::{MinerStatus, StatusFileError, StatusFileManager, StatusSnapshot};
pub use success_log::{FoundRound, SuccessLog, SuccessLogError, SuccessRecord};

use crate::accelerator::MineResponse;
use crate::miner::stats::MinerStats;
use log::{debug, warn};
use std::sync::Arc;

const LOG_TARGET: &str = "saseul::pool_miner::telemetry";

#[derive(Clone)]
pub struct TelemetrySink {
    pool: String,
    status_file: StatusFileManager,
    success_log: SuccessLog,
    stats: Arc<MinerStats>,
}

impl TelemetrySink {
    pub fn new(
        pool: String,
        status_file: StatusFileManager,
        success_log: SuccessLog,
        stats: Arc<MinerStats>,
    ) -> Self {
        Self {
            pool,
            status_file,
            success_log,
            stats,
        }
    }

    pub fn stats(&self) -> &Arc<MinerStats> {
        &self.stats
    }

    pub async fn write_status(&self, snapshot: &StatusSnapshot) {
        let status = MinerStatus::build(&self.pool, snapshot, &self.stats);
        if let Err(e) = self.status_file.save(&status).await {
            debug!(target: LOG_TARGET, "Status write failed: {}", e);
        }
    }

    pub async fn record_success(&self, round: &FoundRound<'_>, response: &MineResponse) {
        let now = chrono::Local::now();
        let record = SuccessRecord::new(round, response, now);
        if let Err(e) = self.success_log.append(&record, &now).await {
            warn!(target: LOG_TARGET, "Success log write failed: {}", e);
        }
    }
}

// Changelog:
// - v1.0.0: Status document and success log behind one sink.
