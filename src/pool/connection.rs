// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/connection.rs
// Version: 1.1.0
//
// This file holds the connection state shared by the receiver loop and the
// mining loop, and the sender half used to write requests to the pool.
//
// Tree Location:
// - src/pool/connection.rs (shared connection state and sender)
// - Depends on: tokio, crate::pool::{codec, pending, protocol}

use crate::pool::codec::encode;
use crate::pool::error::PoolError;
use crate::pool::pending::PendingRequests;
use crate::pool::protocol::StratumProtocol;
use log::{debug, trace, warn};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

const LOG_TARGET: &str = "saseul::pool_miner::connection";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connected = 1,
    Subscribed = 2,
    Authorized = 3,
    Mining = 4,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connected,
            2 => ConnectionState::Subscribed,
            3 => ConnectionState::Authorized,
            4 => ConnectionState::Mining,
            _ => ConnectionState::Disconnected,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connected => "connected",
            ConnectionState::Subscribed => "subscribed",
            ConnectionState::Authorized => "authorized",
            ConnectionState::Mining => "mining",
        };
        f.write_str(name)
    }
}

/// Connection state observable from both session loops
#[derive(Debug)]
pub struct ConnectionStatus {
    state: AtomicU8,
}

impl ConnectionStatus {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(ConnectionState::Disconnected as u8),
        }
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn set(&self, state: ConnectionState) {
        let previous = ConnectionState::from_u8(self.state.swap(state as u8, Ordering::AcqRel));
        if previous != state {
            debug!(target: LOG_TARGET, "Connection state {} -> {}", previous, state);
        }
    }

    /// Move `from -> to` only if the state is still `from`
    pub fn advance(&self, from: ConnectionState, to: ConnectionState) -> bool {
        let moved = self
            .state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if moved {
            debug!(target: LOG_TARGET, "Connection state {} -> {}", from, to);
        }
        moved
    }

    /// Collapse to disconnected; returns true if this call made the change
    pub fn mark_lost(&self) -> bool {
        let previous = self.state.swap(ConnectionState::Disconnected as u8, Ordering::AcqRel);
        previous != ConnectionState::Disconnected as u8
    }

    pub fn is_connected(&self) -> bool {
        self.state() != ConnectionState::Disconnected
    }
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable write side of a pool session
#[derive(Clone)]
pub struct PoolSender {
    writer: Arc<Mutex<OwnedWriteHalf>>,
    next_id: Arc<AtomicU64>,
    pending: Arc<PendingRequests>,
    status: Arc<ConnectionStatus>,
}

impl PoolSender {
    pub fn new(
        writer: OwnedWriteHalf,
        pending: Arc<PendingRequests>,
        status: Arc<ConnectionStatus>,
    ) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            next_id: Arc::new(AtomicU64::new(1)),
            pending,
            status,
        }
    }

    /// Send a request under the next id and register it as pending.
    ///
    /// A write failure marks the connection lost.
    pub async fn send(&self, method: &str, params: Value) -> Result<u64, PoolError> {
        if !self.status.is_connected() {
            return Err(PoolError::Disconnected);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let line = encode(&StratumProtocol::request(id, method, params))?;
        self.pending.register(id, method);
        trace!(target: LOG_TARGET, "Sending: {}", line.trim_end());

        let result = {
            let mut writer = self.writer.lock().await;
            match writer.write_all(line.as_bytes()).await {
                Ok(()) => writer.flush().await,
                Err(e) => Err(e),
            }
        };

        if let Err(e) = result {
            warn!(target: LOG_TARGET, "Write of {} failed: {}", method, e);
            self.pending.take(id);
            self.status.mark_lost();
            return Err(PoolError::Io(e));
        }
        Ok(id)
    }

    pub fn status(&self) -> &Arc<ConnectionStatus> {
        &self.status
    }

    /// Close the write half so the pool sees the session end
    pub async fn shutdown(&self) {
        let mut writer = self.writer.lock().await;
        if let Err(e) = writer.shutdown().await {
            debug!(target: LOG_TARGET, "Write half shutdown: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let status = ConnectionStatus::new();
        assert!(!status.is_connected());

        status.set(ConnectionState::Connected);
        status.set(ConnectionState::Subscribed);
        status.set(ConnectionState::Authorized);
        status.set(ConnectionState::Mining);
        assert_eq!(status.state(), ConnectionState::Mining);
        assert!(status.is_connected());

        assert!(status.mark_lost());
        assert!(!status.mark_lost());
        assert_eq!(status.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_advance_does_not_revive_lost_connection() {
        let status = ConnectionStatus::new();
        status.set(ConnectionState::Authorized);
        status.mark_lost();

        assert!(!status.advance(ConnectionState::Authorized, ConnectionState::Mining));
        assert_eq!(status.state(), ConnectionState::Disconnected);

        status.set(ConnectionState::Authorized);
        assert!(status.advance(ConnectionState::Authorized, ConnectionState::Mining));
        assert_eq!(status.state(), ConnectionState::Mining);
    }
}

// Changelog:
// - v1.1.0: Compare-and-swap state advance so a lost session is not revived.
// - v1.0.0: Connection state machine and shared request sender.
