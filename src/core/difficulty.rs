// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/difficulty.rs
// Version: 1.1.0
//
// This file converts pool difficulty values into 256-bit hash limits and
// compares hex digests against them, located in the core subdirectory of the
// pool miner source tree.

use log::{debug, warn};
use uint::construct_uint;

const LOG_TARGET: &str = "saseul::pool_miner::difficulty";

construct_uint! {
    pub struct U256(4);
}

/// Width of a rendered hash limit in hex digits.
pub const HASH_SIZE: usize = 64;

/// Hash limit for `difficulty`: `(2^256 - 1) / max(difficulty, 1)`, rendered
/// as 64 lowercase hex digits.
pub fn hash_limit(difficulty: u64) -> String {
    let divisor = U256::from(difficulty.max(1));
    let limit = U256::MAX / divisor;
    format!("{:064x}", limit)
}

/// Parse a hex digest or target into a `U256`.
///
/// Returns `None` for empty input, non-hex characters or values wider than
/// 256 bits.
pub fn parse_hash(hex_str: &str) -> Option<U256> {
    let trimmed = hex_str.trim_start_matches("0x");
    if trimmed.is_empty() || trimmed.len() > HASH_SIZE {
        return None;
    }
    let padded = format!("{:0>64}", trimmed);
    match hex::decode(&padded) {
        Ok(bytes) => Some(U256::from_big_endian(&bytes)),
        Err(e) => {
            warn!(target: LOG_TARGET, "Failed to decode hash hex {}: {}", hex_str, e);
            None
        }
    }
}

/// True when `hash_hex` is numerically less than or equal to `target_hex`.
///
/// Unparseable input never meets a target.
pub fn hash_meets_target(hash_hex: &str, target_hex: &str) -> bool {
    match (parse_hash(hash_hex), parse_hash(target_hex)) {
        (Some(hash), Some(target)) => {
            debug!(target: LOG_TARGET,
                "Hash check: hash={:064x}, target={:064x}",
                hash, target
            );
            hash <= target
        }
        _ => {
            warn!(target: LOG_TARGET,
                "Cannot compare hash {} against target {}",
                hash_hex, target_hex
            );
            false
        }
    }
}

/// True when target `a` is numerically at least target `b` (`a` is easier).
pub fn target_at_least(a: &str, b: &str) -> bool {
    match (parse_hash(a), parse_hash(b)) {
        (Some(a), Some(b)) => a >= b,
        _ => false,
    }
}


// Changelog:
// - v1.1.0: Added target_at_least for share/block target consistency checks.
// - v1.0.0: Replaced the u64 difficulty model with full 256-bit hash limits.
