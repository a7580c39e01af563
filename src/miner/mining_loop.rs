// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/mining_loop.rs
// Version: 1.2.0
//
// This file implements the foreground mining loop of one pool session, located
// in the miner subdirectory. Each round snapshots the current job, builds the
// proof-of-work prefix, hands it to the accelerator and submits found shares.
//
// Tree Location:
// - src/miner/mining_loop.rs (per-session mining rounds)
// - Depends on: tokio, chrono, crate::{accelerator, pool, telemetry}

use crate::accelerator::{AcceleratorClient, AcceleratorStatus, MineRequest, MineResponse};
use crate::core::types::{Job, JobId, MinerConfig, Share};
use crate::miner::job_store::JobStore;
use crate::miner::shutdown::Shutdown;
use crate::miner::stats::{MinerStats, RoundInfo};
use crate::pool::connection::{ConnectionState, PoolSender};
use crate::pool::messages::methods;
use crate::pool::protocol::StratumProtocol;
use crate::telemetry::{FoundRound, StatusSnapshot, TelemetrySink};
use crate::utils::format::FormatUtils;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

const LOG_TARGET: &str = "saseul::pool_miner::mining";

/// Offset added to the wall clock when stamping a header, in microseconds
pub const TIMESTAMP_LEAD_MICROS: u64 = 1_000_000;

const JOB_WAIT: Duration = Duration::from_millis(500);
const SKIP_PAUSE: Duration = Duration::from_millis(10);

/// Why a session's mining loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Shutdown,
    ConnectionLost,
}

/// Header timestamp for a round: now in microseconds plus the lead
pub fn round_timestamp() -> u64 {
    let now = chrono::Utc::now().timestamp_micros().max(0) as u64;
    now + TIMESTAMP_LEAD_MICROS
}

/// Accelerator round id: `"{height}_{unix_seconds}"`
pub fn round_job_id(height: u64) -> String {
    format!("{}_{}", height, chrono::Utc::now().timestamp())
}

/// Remembers the last round so an identical one is not sent twice
#[derive(Debug, Default)]
pub struct RoundMarker {
    last: Option<(JobId, u64)>,
}

impl RoundMarker {
    /// Same job and same header timestamp as the previous round. With
    /// microsecond stamps this only happens when rounds fail back to back
    /// within one clock tick.
    pub fn is_repeat(&self, job_id: &JobId, timestamp: u64) -> bool {
        matches!(&self.last, Some((last_id, last_ts)) if last_id == job_id && *last_ts == timestamp)
    }

    pub fn record(&mut self, job_id: JobId, timestamp: u64) {
        self.last = Some((job_id, timestamp));
    }
}

/// Paces dashboard output and `mining.hashrate` reports across sessions
#[derive(Debug)]
pub struct HashrateReporter {
    interval: Duration,
    last: Instant,
}

impl HashrateReporter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Instant::now(),
        }
    }

    /// True once per interval
    pub fn due(&mut self) -> bool {
        if self.last.elapsed() >= self.interval {
            self.last = Instant::now();
            true
        } else {
            false
        }
    }
}

pub struct MiningLoop {
    config: Arc<MinerConfig>,
    accelerator: AcceleratorClient,
    job_store: Arc<JobStore>,
    sender: PoolSender,
    telemetry: TelemetrySink,
    session: Shutdown,
    session_generation: u64,
    last_job: Option<JobId>,
    last_round: RoundMarker,
}

impl MiningLoop {
    pub fn new(
        config: Arc<MinerConfig>,
        accelerator: AcceleratorClient,
        job_store: Arc<JobStore>,
        sender: PoolSender,
        telemetry: TelemetrySink,
        session: Shutdown,
        session_generation: u64,
    ) -> Self {
        Self {
            config,
            accelerator,
            job_store,
            sender,
            telemetry,
            session,
            session_generation,
            last_job: None,
            last_round: RoundMarker::default(),
        }
    }

    fn stats(&self) -> &Arc<MinerStats> {
        self.telemetry.stats()
    }

    /// Why the session signal fired: a lost connection or process shutdown
    fn end(&self) -> SessionEnd {
        if self.sender.status().is_connected() {
            SessionEnd::Shutdown
        } else {
            SessionEnd::ConnectionLost
        }
    }

    /// Mine until shutdown or until the connection is lost
    pub async fn run(mut self, reporter: &mut HashrateReporter) -> SessionEnd {
        self.sender
            .status()
            .advance(ConnectionState::Authorized, ConnectionState::Mining);

        loop {
            if self.session.is_triggered() {
                return self.end();
            }
            if !self.sender.status().is_connected() {
                return SessionEnd::ConnectionLost;
            }

            let Some(job) = self.job_store.snapshot_since(self.session_generation) else {
                tokio::select! {
                    _ = self.job_store.wait_for_update(self.session_generation, JOB_WAIT) => {}
                    _ = self.session.cancelled() => return self.end(),
                }
                continue;
            };

            let job_id = job.id();
            if self.last_job.as_ref() != Some(&job_id) {
                info!(target: LOG_TARGET, "Mining job #{}: height={}", job_id, job.height);
                self.last_job = Some(job_id.clone());
            }

            let timestamp = round_timestamp();
            if self.last_round.is_repeat(&job_id, timestamp) {
                tokio::time::sleep(SKIP_PAUSE).await;
                continue;
            }

            let pow_left = match job.pow_left(timestamp) {
                Ok(pow_left) => pow_left,
                Err(e) => {
                    error!(target: LOG_TARGET, "Cannot hash header for job {}: {}", job_id, e);
                    if !self.session.sleep(self.config.accelerator_retry_delay).await {
                        return self.end();
                    }
                    continue;
                }
            };
            let share_target = job.effective_share_target();
            let request = MineRequest::new(
                pow_left.clone(),
                share_target.clone(),
                job.height,
                job.main_height,
                round_job_id(job.height),
            );

            let outcome = tokio::select! {
                outcome = self.accelerator.mine(&request) => outcome,
                _ = self.session.cancelled() => return self.end(),
            };
            self.last_round.record(job_id.clone(), timestamp);

            let response = match outcome {
                Ok(response) => response,
                Err(e) => {
                    warn!(target: LOG_TARGET, "Accelerator not available ({}), retrying...", e);
                    if !self.session.sleep(self.config.accelerator_retry_delay).await {
                        return self.end();
                    }
                    continue;
                }
            };

            self.stats().record_round(
                response.total_hashes,
                RoundInfo {
                    height: job.height,
                    difficulty: job.difficulty,
                    ghps: response.ghps,
                    gpu_ids: response.device_ids(),
                },
            );

            if response.is_found() {
                self.submit_share(&job, &pow_left, &share_target, timestamp, &response)
                    .await;
            }

            self.publish_status(&job, &response, reporter).await;
        }
    }

    async fn submit_share(
        &self,
        job: &Job,
        pow_left: &str,
        share_target: &str,
        timestamp: u64,
        response: &MineResponse,
    ) {
        let Some(nonce) = response.found_nonce() else {
            return;
        };
        let share = Share::new(job, pow_left, nonce, timestamp);

        let winner = response
            .winner_gpu
            .as_ref()
            .map(|w| w.to_string())
            .unwrap_or_else(|| "?".to_string());
        info!(target: LOG_TARGET,
            "SHARE FOUND! GPU{} {:.2} GH/s elapsed: {:.1}ms",
            winner, response.ghps, response.elapsed_ms
        );
        if share.is_block {
            info!(target: LOG_TARGET, "*** BLOCK FOUND! height={} ***", share.height);
        }

        if let Some(current) = self.job_store.snapshot() {
            if current.id() != share.job_id {
                debug!(target: LOG_TARGET,
                    "Submitting share for job {} after job {} replaced it",
                    share.job_id,
                    current.id()
                );
            }
        }

        match StratumProtocol::submit_params(
            &self.config.miner_address,
            &self.config.worker_name,
            &share,
        ) {
            Ok(params) => match self.sender.send(methods::SUBMIT, params).await {
                Ok(id) => {
                    self.stats().record_share_submitted(share.height, share.is_block);
                    debug!(target: LOG_TARGET, "Share submitted (id={}, nonce={})", id, share.nonce);
                }
                Err(e) => warn!(target: LOG_TARGET, "Share submit failed: {}", e),
            },
            Err(e) => error!(target: LOG_TARGET, "Cannot encode share: {}", e),
        }

        let round = FoundRound {
            job_id: &share.job_id,
            height: job.height,
            main_height: job.main_height,
            pow_left,
            target: share_target,
        };
        self.telemetry.record_success(&round, response).await;
    }

    async fn publish_status(&self, job: &Job, response: &MineResponse, reporter: &mut HashrateReporter) {
        let accelerator = AcceleratorStatus::load(&self.config.accelerator_status_file).await;
        let (total_mhs, device_ids) = if accelerator.is_reporting() {
            (accelerator.total_mhs, accelerator.device_ids())
        } else {
            (response.ghps * 1000.0, response.device_ids())
        };
        let connected = self.sender.status().is_connected();

        self.telemetry
            .write_status(&StatusSnapshot {
                pool_connected: connected,
                total_mhs,
                device_ids,
                height: job.height,
                difficulty: job.difficulty.to_string(),
            })
            .await;

        if !reporter.due() {
            return;
        }

        let hashrate = total_mhs * 1_000_000.0;
        self.stats()
            .display_dashboard(&self.config.pool_endpoint(), connected, hashrate);
        info!(target: LOG_TARGET,
            "HashRate: {} | Height: {} | Shares: {} | Blocks: {} | Total hashes: {}",
            FormatUtils::format_hashrate(hashrate),
            job.height,
            self.stats().total_shares(),
            self.stats().total_blocks(),
            FormatUtils::format_number(self.stats().total_hashes())
        );

        match StratumProtocol::hashrate_params(hashrate) {
            Ok(params) => {
                if let Err(e) = self.sender.send(methods::HASHRATE, params).await {
                    warn!(target: LOG_TARGET, "Hashrate report failed: {}", e);
                }
            }
            Err(e) => error!(target: LOG_TARGET, "Cannot encode hashrate: {}", e),
        }
    }
}


// Changelog:
// - v1.2.0: Session signal cuts accelerator rounds short on connection loss.
// - v1.1.0: Status refresh every round; dashboard and hashrate report per interval.
// - v1.0.0: Accelerator-driven mining rounds with share submission.
