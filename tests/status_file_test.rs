// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: tests/status_file_test.rs
// Version: 1.1.0
//
// This file contains tests for the status document and the success log.
// Tests cover layout, atomic replacement, directory creation, error handling,
// and day-partitioned appends.

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use saseul_pool_miner::accelerator::MineResponse;
    use saseul_pool_miner::core::types::JobId;
    use saseul_pool_miner::miner::stats::MinerStats;
    use saseul_pool_miner::telemetry::{
        FoundRound, MinerStatus, StatusFileError, StatusFileManager, StatusSnapshot, SuccessLog,
        SuccessRecord,
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tempfile::{TempDir, tempdir};
    use tokio::fs;

    // Helper function to create a temporary directory for testing
    fn create_temp_dir() -> TempDir {
        tempdir().expect("Failed to create temporary directory")
    }

    fn sample_snapshot() -> StatusSnapshot {
        StatusSnapshot {
            pool_connected: true,
            total_mhs: 1480.44,
            device_ids: vec!["0".to_string(), "1".to_string()],
            height: 100,
            difficulty: "1000".to_string(),
        }
    }

    fn sample_response() -> MineResponse {
        serde_json::from_value(json!({
            "result": "found",
            "nonce": "00c0ffee",
            "ghps": 1.48,
            "total_hashes": 2_500_000_000u64,
            "elapsed_ms": 1690.5,
            "winner_gpu": 1,
            "gpu_ids": [0, 1],
            "hash": "abcd",
            "nonce_stride": 2,
            "snap_main_h": 5000,
            "snap_main_hash": "bb",
            "snap_res_h": 4999,
            "snap_res_hash": "cc"
        }))
        .expect("Failed to build response")
    }

    #[test]
    fn test_status_document_layout() {
        let stats = MinerStats::new();
        stats.record_share_submitted(100, true);
        let status = MinerStatus::build("pool.example:3333", &sample_snapshot(), &stats);

        let text = serde_json::to_string(&status).expect("Failed to serialize status");
        let keys = [
            "\"ts\"",
            "\"mode\"",
            "\"pool\"",
            "\"pool_connected\"",
            "\"gpus\"",
            "\"total_mhs\"",
            "\"height\"",
            "\"difficulty\"",
            "\"uptime_sec\"",
            "\"total_hashes\"",
            "\"total_shares\"",
            "\"total_blocks\"",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| text.find(k).expect("missing key"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "keys out of order: {}", text);

        assert_eq!(status.mode, "pool");
        assert_eq!(status.pool, "pool.example:3333");
        assert_eq!(status.total_mhs, 1480.4);
        assert_eq!(status.gpus["0"], json!(740.2));
        assert_eq!(status.gpus["1"], json!(740.2));
        assert_eq!(status.difficulty, "1000");
        assert_eq!(status.total_shares, 1);
        assert_eq!(status.total_blocks, 1);
    }

    #[test]
    fn test_status_defaults_to_two_devices() {
        let stats = MinerStats::new();
        let snapshot = StatusSnapshot {
            total_mhs: 10.0,
            ..StatusSnapshot::default()
        };
        let status = MinerStatus::build("p:1", &snapshot, &stats);
        let ids: Vec<&String> = status.gpus.keys().collect();
        assert_eq!(ids, vec!["0", "1"]);
        assert_eq!(status.gpus["0"], json!(5.0));
        assert!(!status.pool_connected);
    }

    #[tokio::test]
    async fn test_save_and_load_success() {
        let temp_dir = create_temp_dir();
        let manager = StatusFileManager::new(temp_dir.path().join("gpu_pool_status.json"))
            .expect("Failed to create manager");
        let stats = MinerStats::new();
        let status = MinerStatus::build("p:1", &sample_snapshot(), &stats);

        manager.save(&status).await.expect("Failed to save status");
        assert!(manager.file_path().exists());
        assert!(!manager.temp_path().exists(), "temporary file should be renamed away");

        let loaded = manager.load().await.expect("Failed to load status");
        assert_eq!(loaded, status);
    }

    #[tokio::test]
    async fn test_temp_path_is_sibling() {
        let temp_dir = create_temp_dir();
        let manager = StatusFileManager::new(temp_dir.path().join("status.json"))
            .expect("Failed to create manager");
        assert_eq!(manager.temp_path(), temp_dir.path().join("status.json.tmp"));
    }

    #[tokio::test]
    async fn test_save_creates_directory() {
        let temp_dir = create_temp_dir();
        let nested = temp_dir.path().join("shared").join("status.json");
        let manager = StatusFileManager::new(nested.clone()).expect("Failed to create manager");
        let status = MinerStatus::build("p:1", &sample_snapshot(), &MinerStats::new());

        manager.save(&status).await.expect("Failed to save status");
        assert!(nested.exists());
    }

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let temp_dir = create_temp_dir();
        let manager = StatusFileManager::new(temp_dir.path().join("absent.json"))
            .expect("Failed to create manager");
        assert!(matches!(
            manager.load().await,
            Err(StatusFileError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_json_handling() {
        let temp_dir = create_temp_dir();
        let path = temp_dir.path().join("status.json");
        fs::write(&path, "{ not json").await.expect("Failed to write file");

        let manager = StatusFileManager::new(path).expect("Failed to create manager");
        assert!(matches!(
            manager.load().await,
            Err(StatusFileError::DeserializationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_path() {
        assert!(matches!(
            StatusFileManager::new("/".into()),
            Err(StatusFileError::InvalidPath { .. })
        ));
    }

    #[tokio::test]
    async fn test_repeated_saves_replace_document() {
        let temp_dir = create_temp_dir();
        let manager = StatusFileManager::new(temp_dir.path().join("status.json"))
            .expect("Failed to create manager");
        let stats = Arc::new(MinerStats::new());

        for height in 1..=5 {
            let snapshot = StatusSnapshot {
                height,
                ..sample_snapshot()
            };
            manager
                .save(&MinerStatus::build("p:1", &snapshot, &stats))
                .await
                .expect("Failed to save status");
        }
        let loaded = manager.load().await.expect("Failed to load status");
        assert_eq!(loaded.height, 5);
    }

    #[tokio::test]
    async fn test_success_log_appends_per_day() {
        let temp_dir = create_temp_dir();
        let log = SuccessLog::new(temp_dir.path().join("success_logs"));
        let job_id = JobId::Text("job-7".to_string());
        let round = FoundRound {
            job_id: &job_id,
            height: 100,
            main_height: 5000,
            pow_left: "prefix",
            target: "00ff",
        };
        let response = sample_response();

        let day_one = Local
            .with_ymd_and_hms(2026, 10, 18, 12, 0, 0)
            .single()
            .expect("valid date");
        let day_two = Local
            .with_ymd_and_hms(2026, 10, 19, 0, 0, 1)
            .single()
            .expect("valid date");

        for at in [day_one, day_one, day_two] {
            let record = SuccessRecord::new(&round, &response, at);
            log.append(&record, &at).await.expect("Failed to append record");
        }

        let first = fs::read_to_string(log.directory().join("2026-10-18.jsonl"))
            .await
            .expect("missing day file");
        let second = fs::read_to_string(log.directory().join("2026-10-19.jsonl"))
            .await
            .expect("missing day file");
        assert_eq!(first.lines().count(), 2);
        assert_eq!(second.lines().count(), 1);

        let record: Value = serde_json::from_str(first.lines().next().unwrap()).unwrap();
        assert_eq!(record["ts"], "2026-10-18 12:00:00");
        assert_eq!(record["mode"], "pool");
        assert_eq!(record["result"], "found");
        assert_eq!(record["job_id"], "job-7");
        assert_eq!(record["pow_left"], "prefix");
        assert_eq!(record["target"], "00ff");
        assert_eq!(record["nonce"], "00c0ffee");
        assert_eq!(record["winner_gpu"], 1);
        assert_eq!(record["snap_res_h"], 4999);
        assert_eq!(record["total_hashes"], 2_500_000_000u64);
    }

    #[tokio::test]
    async fn test_success_record_defaults() {
        let response: MineResponse =
            serde_json::from_value(json!({"result": "found", "nonce": "1"})).unwrap();
        let job_id = JobId::Number(3);
        let round = FoundRound {
            job_id: &job_id,
            height: 3,
            main_height: 1,
            pow_left: "",
            target: "",
        };
        let record = SuccessRecord::new(&round, &response, Local::now());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["winner_gpu"], -1);
        assert_eq!(value["gpu_ids"], json!([]));
        assert_eq!(value["snap_main_hash"], "");
        assert_eq!(value["job_id"], 3);
    }
}
