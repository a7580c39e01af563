// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/accelerator/messages.rs
// Version: 1.0.0
//
// This file defines the request and response lines exchanged with the GPU
// accelerator over its Unix socket.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One search round handed to the accelerator
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MineRequest {
    pub cmd: &'static str,
    pub pow_left: String,
    pub target: String,
    pub height: u64,
    pub main_height: u64,
    pub job_id: String,
}

impl MineRequest {
    pub fn new(pow_left: String, target: String, height: u64, main_height: u64, job_id: String) -> Self {
        Self {
            cmd: "mine",
            pow_left,
            target,
            height,
            main_height,
            job_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MineStatus {
    Found,
    Continue,
}

/// Accelerator reply for one round
#[derive(Debug, Clone, Deserialize)]
pub struct MineResponse {
    pub result: MineStatus,
    #[serde(default)]
    pub nonce: Option<String>,
    #[serde(default)]
    pub ghps: f64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_hashes: u64,
    #[serde(default)]
    pub elapsed_ms: f64,
    #[serde(default)]
    pub winner_gpu: Option<Value>,
    #[serde(default)]
    pub gpu_ids: Vec<Value>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub nonce_stride: Option<Value>,
    #[serde(default)]
    pub snap_main_h: Option<Value>,
    #[serde(default)]
    pub snap_main_hash: Option<String>,
    #[serde(default)]
    pub snap_res_h: Option<Value>,
    #[serde(default)]
    pub snap_res_hash: Option<String>,
}

impl MineResponse {
    pub fn is_found(&self) -> bool {
        self.result == MineStatus::Found
    }

    /// Winning nonce of a `found` reply, if non-empty
    pub fn found_nonce(&self) -> Option<&str> {
        self.nonce.as_deref().filter(|n| !n.is_empty())
    }

    /// Device ids as strings, in reported order
    pub fn device_ids(&self) -> Vec<String> {
        self.gpu_ids
            .iter()
            .map(|id| match id {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_line_shape() {
        let request = MineRequest::new("ab".into(), "ff".into(), 100, 5000, "100_1700000000".into());
        let text = serde_json::to_string(&request).unwrap();
        assert_eq!(
            text,
            r#"{"cmd":"mine","pow_left":"ab","target":"ff","height":100,"main_height":5000,"job_id":"100_1700000000"}"#
        );
    }

    #[test]
    fn test_found_response() {
        let response: MineResponse = serde_json::from_value(json!({
            "result": "found",
            "nonce": "deadbeef",
            "ghps": 1.48,
            "total_hashes": 2.5e9,
            "elapsed_ms": 1690.2,
            "winner_gpu": 1,
            "gpu_ids": [0, 1]
        }))
        .unwrap();
        assert!(response.is_found());
        assert_eq!(response.found_nonce(), Some("deadbeef"));
        assert_eq!(response.total_hashes, 2_500_000_000);
        assert_eq!(response.device_ids(), vec!["0", "1"]);
    }

    #[test]
    fn test_continue_response_and_unknown_result() {
        let response: MineResponse =
            serde_json::from_value(json!({"result": "continue", "total_hashes": 100})).unwrap();
        assert!(!response.is_found());
        assert!(response.found_nonce().is_none());

        assert!(serde_json::from_value::<MineResponse>(json!({"result": "busy"})).is_err());
        assert!(serde_json::from_value::<MineResponse>(json!({"ghps": 1.0})).is_err());
    }
}

// Changelog:
// - v1.0.0: Mine request and found/continue response schemas.
