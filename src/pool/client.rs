// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/client.rs
// Version: 1.2.0
//
// This file implements the TCP client for communicating with the mining pool,
// located in the pool subdirectory. It dials the pool and drives the session
// handshake: subscribe, authorize, then wait for the first job.
//
// Tree Location:
// - src/pool/client.rs (pool TCP client logic)
// - Depends on: tokio, crate::pool::{codec, connection, receiver}

use crate::core::types::Job;
use crate::miner::job_store::JobStore;
use crate::miner::shutdown::Shutdown;
use crate::miner::stats::MinerStats;
use crate::pool::codec::{FrameReader, PoolMessage};
use crate::pool::connection::{ConnectionState, ConnectionStatus, PoolSender};
use crate::pool::error::PoolError;
use crate::pool::messages::methods;
use crate::pool::pending::PendingRequests;
use crate::pool::protocol::StratumProtocol;
use crate::pool::receiver::{MessageRouter, ReceiverLoop};
use log::{debug, info};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpStream, lookup_host};

const LOG_TARGET: &str = "saseul::pool_miner::client";

/// Dials the mining pool
#[derive(Debug, Clone)]
pub struct PoolClient {
    endpoint: String,
    connect_timeout: Duration,
}

impl PoolClient {
    pub fn new(endpoint: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Resolve pool address from either IP:port or domain:port format
    async fn resolve_pool_address(pool_str: &str) -> std::io::Result<SocketAddr> {
        if let Ok(addr) = pool_str.parse::<SocketAddr>() {
            return Ok(addr);
        }

        let mut addrs = lookup_host(pool_str).await?;
        addrs.next().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "No addresses found for hostname")
        })
    }

    async fn dial(&self) -> std::io::Result<TcpStream> {
        let resolved_addr = Self::resolve_pool_address(&self.endpoint).await?;
        let stream = TcpStream::connect(resolved_addr).await?;
        stream.set_nodelay(true)?; // Disable Nagle's algorithm for low latency
        Ok(stream)
    }

    /// Open the TCP stream, bounded by the connect timeout
    pub async fn connect(&self) -> Result<TcpStream, PoolError> {
        let failed = |reason: String| PoolError::ConnectionFailed {
            endpoint: self.endpoint.clone(),
            reason,
        };
        match tokio::time::timeout(self.connect_timeout, self.dial()).await {
            Ok(Ok(stream)) => {
                info!(target: LOG_TARGET, "Connected to pool {}", self.endpoint);
                Ok(stream)
            }
            Ok(Err(e)) => Err(failed(e.to_string())),
            Err(_) => Err(failed(format!("timed out after {:?}", self.connect_timeout))),
        }
    }
}

/// One live connection to the pool, before its receiver loop is spawned
pub struct PoolSession {
    reader: FrameReader<OwnedReadHalf>,
    sender: PoolSender,
    router: MessageRouter,
    status: Arc<ConnectionStatus>,
}

impl PoolSession {
    pub fn new(
        stream: TcpStream,
        job_store: Arc<JobStore>,
        stats: Arc<MinerStats>,
        pending_window: Duration,
    ) -> Self {
        let (read_half, write_half) = stream.into_split();
        let status = Arc::new(ConnectionStatus::new());
        status.set(ConnectionState::Connected);
        let pending = Arc::new(PendingRequests::new(pending_window));
        let sender = PoolSender::new(write_half, pending.clone(), status.clone());
        let router = MessageRouter::new(job_store, stats, pending);

        Self {
            reader: FrameReader::new(read_half),
            sender,
            router,
            status,
        }
    }

    pub fn sender(&self) -> PoolSender {
        self.sender.clone()
    }

    pub fn status(&self) -> Arc<ConnectionStatus> {
        self.status.clone()
    }

    /// Send `mining.subscribe`; the reply must carry a truthy result
    pub async fn subscribe(&mut self, timeout: Duration) -> Result<Value, PoolError> {
        let id = self
            .sender
            .send(methods::SUBSCRIBE, StratumProtocol::subscribe_params())
            .await?;
        let (result, error) = self.await_reply(id, "subscribe reply", timeout).await?;

        if !error.is_null() {
            return Err(PoolError::SubscribeRejected(error.to_string()));
        }
        if !is_truthy(&result) {
            return Err(PoolError::SubscribeRejected(format!("result {}", result)));
        }
        self.status.set(ConnectionState::Subscribed);
        info!(target: LOG_TARGET, "Subscribed to pool");
        Ok(result)
    }

    /// Send `mining.authorize`; a false or null result, or any error, fails it
    pub async fn authorize(
        &mut self,
        miner_address: &str,
        worker_name: &str,
        timeout: Duration,
    ) -> Result<(), PoolError> {
        let id = self
            .sender
            .send(
                methods::AUTHORIZE,
                StratumProtocol::authorize_params(miner_address, worker_name),
            )
            .await?;
        let (result, error) = self.await_reply(id, "authorize reply", timeout).await?;

        if !error.is_null() {
            return Err(PoolError::AuthorizeRejected(error.to_string()));
        }
        if !is_truthy(&result) {
            return Err(PoolError::AuthorizeRejected(format!("result {}", result)));
        }
        self.status.set(ConnectionState::Authorized);
        info!(target: LOG_TARGET, "Authorized: {} / {}", miner_address, worker_name);
        Ok(())
    }

    /// Wait for a job published after `since`, dispatching frames meanwhile
    pub async fn wait_for_job(&mut self, since: u64, timeout: Duration) -> Result<Job, PoolError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Some(job) = self.router.job_store().snapshot_since(since) {
                return Ok(job);
            }
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Err(PoolError::Timeout {
                    step: "first job",
                    timeout,
                });
            }
            match self.read(remaining).await? {
                Some(message) => self.router.dispatch(message),
                None => continue,
            }
        }
    }

    /// Read frames until the reply for `id` arrives; other frames are routed
    async fn await_reply(
        &mut self,
        id: u64,
        step: &'static str,
        timeout: Duration,
    ) -> Result<(Value, Value), PoolError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                self.router.pending().take(id);
                return Err(PoolError::Timeout { step, timeout });
            }
            match self.read(remaining).await? {
                Some(PoolMessage::Reply {
                    id: reply_id,
                    result,
                    error,
                }) if reply_id.as_u64() == Some(id) => {
                    self.router.pending().take(id);
                    debug!(target: LOG_TARGET, "Reply {} result={} error={}", id, result, error);
                    return Ok((result, error));
                }
                Some(other) => self.router.dispatch(other),
                None => {}
            }
        }
    }

    async fn read(&mut self, wait: Duration) -> Result<Option<PoolMessage>, PoolError> {
        match self.reader.next_message(wait).await {
            Ok(message) => Ok(message),
            Err(e) => {
                self.status.mark_lost();
                Err(e)
            }
        }
    }

    /// Hand the read half to a receiver loop for the rest of the session
    pub fn into_receiver(self, session: Shutdown, poll: Duration) -> ReceiverLoop<OwnedReadHalf> {
        ReceiverLoop::new(self.reader, self.router, self.status, session, poll)
    }
}

/// Truthiness of a reply result: null, false, zero and empty values are false
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}


// Changelog:
// - v1.2.0: Added PoolSession with the subscribe/authorize/first-job handshake.
// - v1.1.0: Added DNS resolution support.
// - v1.0.0: TCP connection to the pool with Nagle's algorithm disabled.
