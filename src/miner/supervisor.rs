// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/supervisor.rs
// Version: 1.1.0
//
// This file implements the outer reconnect loop, located in the miner
// subdirectory. It runs one pool session at a time: dial, handshake, spawn the
// receiver, mine until the connection drops, then wait and dial again.
//
// Tree Location:
// - src/miner/supervisor.rs (session lifecycle)
// - Depends on: tokio, crate::{pool, accelerator, telemetry}

use crate::accelerator::AcceleratorClient;
use crate::core::types::MinerConfig;
use crate::miner::job_store::JobStore;
use crate::miner::mining_loop::{HashrateReporter, MiningLoop, SessionEnd};
use crate::miner::shutdown::Shutdown;
use crate::miner::stats::MinerStats;
use crate::pool::backoff::ReconnectBackoff;
use crate::pool::client::{PoolClient, PoolSession};
use crate::pool::error::PoolError;
use crate::telemetry::{StatusFileError, StatusFileManager, StatusSnapshot, SuccessLog, TelemetrySink};
use log::{error, info};
use std::sync::Arc;
use tokio::net::TcpStream;

const LOG_TARGET: &str = "saseul::pool_miner::supervisor";

pub struct Supervisor {
    config: Arc<MinerConfig>,
    stats: Arc<MinerStats>,
    job_store: Arc<JobStore>,
    telemetry: TelemetrySink,
    accelerator: AcceleratorClient,
    shutdown: Shutdown,
}

impl Supervisor {
    pub fn new(config: MinerConfig, shutdown: Shutdown) -> Result<Self, StatusFileError> {
        let stats = Arc::new(MinerStats::new());
        let telemetry = TelemetrySink::new(
            config.pool_endpoint(),
            StatusFileManager::new(config.status_file.clone())?,
            SuccessLog::new(config.success_log_dir.clone()),
            stats.clone(),
        );
        let accelerator =
            AcceleratorClient::new(config.accelerator_socket.clone(), config.accelerator_timeout);

        Ok(Self {
            config: Arc::new(config),
            stats,
            job_store: Arc::new(JobStore::new()),
            telemetry,
            accelerator,
            shutdown,
        })
    }

    pub fn stats(&self) -> Arc<MinerStats> {
        self.stats.clone()
    }

    pub fn job_store(&self) -> Arc<JobStore> {
        self.job_store.clone()
    }

    /// Run sessions until shutdown, then write the final status
    pub async fn run(&self) {
        let config = &self.config;
        let client = PoolClient::new(config.pool_endpoint(), config.connect_timeout);
        info!(target: LOG_TARGET, "SASEUL Pool Miner starting");
        info!(target: LOG_TARGET, "Pool: {}", client.endpoint());
        info!(target: LOG_TARGET, "Address: {}", config.miner_address);
        info!(target: LOG_TARGET, "Worker: {}", config.worker_name);
        info!(target: LOG_TARGET, "GPU IPC: {}", self.accelerator.socket_path().display());

        let mut backoff = ReconnectBackoff::new(config.reconnect_delay, config.max_reconnect_delay);
        let mut reporter = HashrateReporter::new(config.report_interval);

        while !self.shutdown.is_triggered() {
            let stream = match client.connect().await {
                Ok(stream) => stream,
                Err(e) => {
                    let delay = backoff.next_delay();
                    error!(target: LOG_TARGET, "Pool connect failed: {}", e);
                    info!(target: LOG_TARGET, "Retrying in {:.1}s...", delay.as_secs_f64());
                    self.shutdown.sleep(delay).await;
                    continue;
                }
            };
            backoff.reset();

            match self.run_session(stream, &mut reporter).await {
                Ok(SessionEnd::Shutdown) => break,
                Ok(SessionEnd::ConnectionLost) => {
                    info!(target: LOG_TARGET, "Pool connection lost, reconnecting...");
                }
                Err(e) => error!(target: LOG_TARGET, "Session failed: {}", e),
            }
            self.shutdown.sleep(backoff.base()).await;
        }

        self.telemetry
            .write_status(&StatusSnapshot {
                pool_connected: false,
                ..StatusSnapshot::default()
            })
            .await;
        info!(target: LOG_TARGET, "Pool miner stopped");
    }

    async fn run_session(
        &self,
        stream: TcpStream,
        reporter: &mut HashrateReporter,
    ) -> Result<SessionEnd, PoolError> {
        let session_generation = self.job_store.generation();
        let mut session = PoolSession::new(
            stream,
            self.job_store.clone(),
            self.stats.clone(),
            self.config.pending_window,
        );
        let sender = session.sender();
        let status = session.status();
        let session_stop = self.shutdown.child();

        let handshake = tokio::select! {
            result = self.handshake(&mut session, session_generation) => result,
            _ = self.shutdown.cancelled() => {
                sender.shutdown().await;
                return Ok(SessionEnd::Shutdown);
            }
        };
        if let Err(e) = handshake {
            status.mark_lost();
            sender.shutdown().await;
            return Err(e);
        }

        let receiver = session.into_receiver(session_stop.clone(), self.config.receive_poll);
        let receiver = tokio::spawn(receiver.run());

        let mining = MiningLoop::new(
            self.config.clone(),
            self.accelerator.clone(),
            self.job_store.clone(),
            sender.clone(),
            self.telemetry.clone(),
            session_stop.clone(),
            session_generation,
        );
        let end = mining.run(reporter).await;

        status.mark_lost();
        session_stop.trigger();
        sender.shutdown().await;
        let _ = receiver.await;
        Ok(end)
    }

    async fn handshake(&self, session: &mut PoolSession, since: u64) -> Result<(), PoolError> {
        let config = &self.config;
        session.subscribe(config.subscribe_timeout).await?;
        session
            .authorize(&config.miner_address, &config.worker_name, config.authorize_timeout)
            .await?;
        let job = session.wait_for_job(since, config.first_job_timeout).await?;
        info!(target: LOG_TARGET, "First job received: height={}", job.height);
        Ok(())
    }
}

// Changelog:
// - v1.1.0: Per-session stop signal shared by the receiver and mining loop.
// - v1.0.0: Sequential session supervisor with reconnect backoff.
