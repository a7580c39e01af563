// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/job_store.rs
// Version: 1.0.0
//
// This file holds the single current job. Writers replace it wholesale and
// readers take independent copies. Every replace bumps a generation counter
// so a session can ignore jobs published before it started.

use crate::core::types::Job;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Slot {
    job: Option<Job>,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct JobStore {
    slot: Mutex<Slot>,
    updated: Notify,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Swap in a new job; returns its generation
    pub fn replace(&self, job: Job) -> u64 {
        let generation = {
            let mut slot = self.lock();
            slot.job = Some(job);
            slot.generation += 1;
            slot.generation
        };
        self.updated.notify_waiters();
        generation
    }

    pub fn snapshot(&self) -> Option<Job> {
        self.lock().job.clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// The current job, only if it was published after `generation`
    pub fn snapshot_since(&self, generation: u64) -> Option<Job> {
        let slot = self.lock();
        if slot.generation > generation {
            slot.job.clone()
        } else {
            None
        }
    }

    /// Wait until a job newer than `generation` is published.
    ///
    /// Returns false if `timeout` elapses first.
    pub async fn wait_for_update(&self, generation: u64, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let notified = self.updated.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.generation() > generation {
                return true;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.generation() > generation;
            }
        }
    }
}


// Changelog:
// - v1.0.0: Generation-tracked current job cell.
