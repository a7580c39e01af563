// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/accelerator/client.rs
// Version: 1.0.0
//
// This file implements the per-round exchange with the GPU accelerator: open
// the Unix socket, write one request line, read one response line, close.
//
// Tree Location:
// - src/accelerator/client.rs (accelerator IPC client)
// - Depends on: tokio, serde_json, thiserror

use crate::accelerator::messages::{MineRequest, MineResponse};
use log::{debug, trace};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

const LOG_TARGET: &str = "saseul::pool_miner::accelerator";

/// Every variant means the accelerator is unavailable for this round
#[derive(Error, Debug)]
pub enum AcceleratorError {
    #[error("Cannot connect to accelerator at {path:?}: {source}")]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Accelerator I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Accelerator did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Accelerator closed the socket before a full response")]
    Closed,

    #[error("Malformed accelerator response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Accelerator reported found without a nonce")]
    MissingNonce,
}

#[derive(Debug, Clone)]
pub struct AcceleratorClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl AcceleratorClient {
    pub fn new(socket_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout,
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Run one search round, bounded by the client timeout
    pub async fn mine(&self, request: &MineRequest) -> Result<MineResponse, AcceleratorError> {
        let response = tokio::time::timeout(self.timeout, self.exchange(request))
            .await
            .map_err(|_| AcceleratorError::Timeout(self.timeout))??;

        if response.is_found() && response.found_nonce().is_none() {
            return Err(AcceleratorError::MissingNonce);
        }
        Ok(response)
    }

    async fn exchange(&self, request: &MineRequest) -> Result<MineResponse, AcceleratorError> {
        let mut stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|e| AcceleratorError::Connect {
                path: self.socket_path.clone(),
                source: e,
            })?;

        let mut line = serde_json::to_string(request)?;
        line.push('\n');
        trace!(target: LOG_TARGET, "Accelerator request: {}", line.trim_end());
        stream.write_all(line.as_bytes()).await?;
        stream.flush().await?;

        let mut reader = BufReader::new(stream);
        let mut reply = String::new();
        let read = reader.read_line(&mut reply).await?;
        if read == 0 || !reply.ends_with('\n') {
            return Err(AcceleratorError::Closed);
        }

        debug!(target: LOG_TARGET, "Accelerator reply: {}", reply.trim_end());
        Ok(serde_json::from_str(reply.trim())?)
    }
}


// Changelog:
// - v1.0.0: One-shot Unix socket exchange with timeout.
