// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/receiver.rs
// Version: 1.2.0
//
// This file routes incoming pool messages and runs the background receiver
// loop for one pool session, located in the pool subdirectory. New jobs go to
// the job store; share results are matched against pending requests.
//
// Tree Location:
// - src/pool/receiver.rs (message routing and receiver loop)
// - Depends on: tokio, crate::pool::{codec, pending, connection}

use crate::core::types::Job;
use crate::miner::job_store::JobStore;
use crate::miner::shutdown::Shutdown;
use crate::miner::stats::MinerStats;
use crate::pool::codec::{FrameReader, PoolMessage};
use crate::pool::connection::ConnectionStatus;
use crate::pool::error::PoolError;
use crate::pool::messages::{NotifyBlockParams, methods};
use crate::pool::pending::PendingRequests;
use log::{debug, error, info, warn};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncRead;

const LOG_TARGET: &str = "saseul::pool_miner::receiver";

/// Applies incoming messages to shared miner state
#[derive(Clone)]
pub struct MessageRouter {
    job_store: Arc<JobStore>,
    stats: Arc<MinerStats>,
    pending: Arc<PendingRequests>,
}

impl MessageRouter {
    pub fn new(job_store: Arc<JobStore>, stats: Arc<MinerStats>, pending: Arc<PendingRequests>) -> Self {
        Self {
            job_store,
            stats,
            pending,
        }
    }

    pub fn job_store(&self) -> &Arc<JobStore> {
        &self.job_store
    }

    pub fn pending(&self) -> &Arc<PendingRequests> {
        &self.pending
    }

    pub fn dispatch(&self, message: PoolMessage) {
        match message {
            PoolMessage::Notification { method, params } => self.on_notification(&method, params),
            PoolMessage::Reply { id, result, error } => self.on_reply(&id, &result, &error),
            PoolMessage::Request { id, method, .. } => {
                debug!(target: LOG_TARGET, "Ignoring pool request {} (id={})", method, id);
            }
        }
    }

    fn on_notification(&self, method: &str, params: Value) {
        match method {
            methods::NOTIFY => {
                if let Err(e) = self.store_job(params) {
                    error!(target: LOG_TARGET, "Protocol error, job not stored: {}", e);
                }
            }
            methods::NOTIFY_BLOCK => {
                match serde_json::from_value::<NotifyBlockParams>(params.clone()) {
                    Ok(NotifyBlockParams { height: Some(height) }) => {
                        info!(target: LOG_TARGET, "Pool found block at height {}", height);
                    }
                    _ => info!(target: LOG_TARGET, "Pool block notification: {}", params),
                }
            }
            methods::SET_DIFFICULTY => {
                info!(target: LOG_TARGET, "Difficulty adjusted: {}", params);
            }
            other => {
                debug!(target: LOG_TARGET, "Ignoring notification {}", other);
            }
        }
    }

    fn store_job(&self, params: Value) -> Result<(), PoolError> {
        let job: Job = serde_json::from_value(params)?;
        job.validate()?;
        info!(target: LOG_TARGET,
            "New job: height={} diff={} share_diff={}",
            job.height,
            job.difficulty,
            job.share_difficulty
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
        self.job_store.replace(job);
        Ok(())
    }

    fn on_reply(&self, id: &Value, result: &Value, error: &Value) {
        let Some(request) = id.as_u64().and_then(|id| self.pending.take(id)) else {
            debug!(target: LOG_TARGET, "Unmatched reply id={}", id);
            return;
        };

        if request.method != methods::SUBMIT {
            debug!(target: LOG_TARGET,
                "Reply to {} (id={}) after {:?}: {}",
                request.method,
                id,
                request.sent_at.elapsed(),
                result
            );
            return;
        }

        let accepted = error.is_null() && result.as_bool() == Some(true);
        self.stats.record_share_result(accepted);
        if accepted {
            info!(target: LOG_TARGET, "Share accepted (id={})", id);
        } else if !error.is_null() {
            warn!(target: LOG_TARGET, "Share rejected (id={}): {}", id, error);
        } else {
            warn!(target: LOG_TARGET, "Share rejected (id={}): result {}", id, result);
        }
    }

    pub fn prune(&self) {
        self.pending.prune();
    }
}

/// Background reader for one pool session
pub struct ReceiverLoop<R> {
    reader: FrameReader<R>,
    router: MessageRouter,
    status: Arc<ConnectionStatus>,
    session: Shutdown,
    poll: Duration,
}

impl<R: AsyncRead + Unpin> ReceiverLoop<R> {
    pub fn new(
        reader: FrameReader<R>,
        router: MessageRouter,
        status: Arc<ConnectionStatus>,
        session: Shutdown,
        poll: Duration,
    ) -> Self {
        Self {
            reader,
            router,
            status,
            session,
            poll,
        }
    }

    /// Read until the stream fails, the connection is marked lost, or the
    /// session ends. A read failure ends the session for the mining side too.
    pub async fn run(mut self) {
        while !self.session.is_triggered() && self.status.is_connected() {
            let next = tokio::select! {
                next = self.reader.next_message(self.poll) => next,
                _ = self.session.cancelled() => break,
            };
            match next {
                Ok(Some(message)) => self.router.dispatch(message),
                Ok(None) => {}
                Err(e) => {
                    if self.status.mark_lost() {
                        warn!(target: LOG_TARGET, "Pool connection lost: {}", e);
                    }
                    self.session.trigger();
                    break;
                }
            }
            self.router.prune();
        }
        debug!(target: LOG_TARGET,
            "Receiver stopped ({} malformed line(s) dropped)",
            self.reader.dropped()
        );
    }
}


// Changelog:
// - v1.2.0: A lost connection ends the session signal so mining stops at once.
// - v1.1.0: Split routing from the loop so the handshake can reuse it.
// - v1.0.0: Receiver loop with notify, notify_block and submit handling.
