// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: tests/hashing_test.rs
// Version: 1.1.0
//
// This file checks the chain hashing rules end to end: Merkle roots over
// receipts, object hashes, targets, and the proof-of-work prefix of a job.

#[cfg(test)]
mod tests {
    use saseul_pool_miner::core::difficulty::{hash_limit, hash_meets_target, parse_hash};
    use saseul_pool_miner::core::sha256::{
        canonical_text, merkle_root, object_hash, sha256_hex, time_hash, value_hash,
    };
    use saseul_pool_miner::core::types::{Job, Share};
    use serde_json::{Value, json};

    #[test]
    fn test_merkle_root_small_cases() {
        assert_eq!(merkle_root(&[]), sha256_hex(""));

        let x = json!({"type": "Send", "amount": "100"});
        assert_eq!(merkle_root(&[x.clone()]), value_hash(&x));

        let a = json!("receipt-a");
        let b = json!({"k": [1, 2]});
        let expected = sha256_hex(&format!("{}{}", value_hash(&a), value_hash(&b)));
        assert_eq!(merkle_root(&[a, b]), expected);
    }

    #[test]
    fn test_merkle_root_carries_odd_element() {
        let items = vec![json!("a"), json!("b"), json!("c")];
        let ab = sha256_hex(&format!("{}{}", sha256_hex("a"), sha256_hex("b")));
        let expected = sha256_hex(&format!("{}{}", ab, sha256_hex("c")));
        assert_eq!(merkle_root(&items), expected);
    }

    #[test]
    fn test_object_hash_respects_key_order() {
        let first = json!({"a": 1, "b": 2});
        let second = json!({"b": 2, "a": 1});
        assert_eq!(object_hash(&first).unwrap(), object_hash(&first).unwrap());
        assert_ne!(object_hash(&first).unwrap(), object_hash(&second).unwrap());
        assert_eq!(object_hash(&first).unwrap(), sha256_hex(r#"{"a":1,"b":2}"#));
    }

    #[test]
    fn test_target_properties() {
        assert_eq!(hash_limit(1), "f".repeat(64));
        let easy = parse_hash(&hash_limit(10)).unwrap();
        let hard = parse_hash(&hash_limit(1000)).unwrap();
        assert!(hard < easy);
        assert!(hash_meets_target(&hash_limit(1000), &hash_limit(10)));
        assert!(!hash_meets_target(&hash_limit(10), &hash_limit(1000)));
    }

    #[test]
    fn test_pow_prefix_matches_manual_header() {
        let receipts = vec![json!({"hash": "r1"}), json!({"hash": "r2"})];
        let job: Job = serde_json::from_value(json!({
            "job_id": 7,
            "height": 100,
            "difficulty": 1000,
            "previous_blockhash": "ab".repeat(39),
            "main_height": 5000,
            "main_blockhash": "cd".repeat(39),
            "validator": "validator-addr",
            "miner": "miner-addr",
            "receipts": receipts.clone()
        }))
        .unwrap();

        let timestamp = 1_760_000_000_000_000u64;
        let header = json!({
            "height": 100,
            "timestamp": timestamp,
            "receipt_root": merkle_root(&receipts),
            "main_height": 5000,
            "main_blockhash": "cd".repeat(39),
            "validator": "validator-addr",
            "miner": "miner-addr"
        });
        let expected = format!("{}{}", "ab".repeat(39), object_hash(&header).unwrap());
        assert_eq!(job.pow_left(timestamp).unwrap(), expected);

        let share = Share::new(&job, &expected, "0001", timestamp);
        assert_eq!(share.root, sha256_hex(&format!("{}0001", expected)));
        assert_eq!(&share.blockhash[..14], format!("{:014x}", timestamp));
        assert_eq!(&share.blockhash[14..], sha256_hex(&share.root));
    }

    // Known answers produced by the pool's reference hasher

    const TIMESTAMP: u64 = 1_760_000_000_000_000;

    fn reference_job() -> Job {
        serde_json::from_value(json!({
            "job_id": "job-100",
            "height": 100,
            "difficulty": 1000,
            "previous_blockhash": "ab".repeat(39),
            "main_height": 5000,
            "main_blockhash": "cd".repeat(39),
            "validator": "validator-addr",
            "miner": "miner-addr",
            "receipts": [{"hash": "r1"}, {"hash": "r2"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_merkle_root_known_answers() {
        assert_eq!(
            merkle_root(&[json!({"hash": "r1"}), json!({"hash": "r2"})]),
            "24f1dc171a91b5ebe16b497cbcc6793d999d5396afc9847244b11cb5667e8bf8"
        );

        let mixed = vec![
            json!({"z": 1, "a": "한글", "f": 1.5, "n": null, "b": true}),
            json!("plain"),
            json!(7),
            json!(1e-7),
            json!(true),
            Value::Null,
        ];
        assert_eq!(
            merkle_root(&mixed),
            "7bf9ff34f48cf3a41a8c9e4a183716710aada65078e0e21a044ec5ace8a68d79"
        );
    }

    #[test]
    fn test_scalar_hash_known_answers() {
        let cases = [
            (json!(true), "3cbc87c7681f34db4617feaa2c8801931bc5e42d8d0f560e756dd4cd92885f18"),
            (json!(false), "60a33e6cf5151f2d52eddae9685cfa270426aa89d8dbc7dfb854606f1d1a40fe"),
            (Value::Null, "dc937b59892604f5a86ac96936cd7ff09e25f18ae6b758e8014a24c7fa039e91"),
            (json!(1e-7), "e485fac25775a7da830698e7daac582737fc8b43ba4b351467a16cf8ed83122a"),
            (json!(2.0), "d84bdb34d4eeef4034d77e5403f850e35bc4a51b1143e3a83510e1aaad839748"),
            (json!(7), "7902699be42c8a8e46fbbb4501726517e86b22c56a189f7625a6da49081b2451"),
        ];
        for (value, expected) in cases {
            assert_eq!(value_hash(&value), expected, "{}", value);
        }
    }

    #[test]
    fn test_canonical_text_matches_reference_floats() {
        let value = json!({
            "f": 1e-7, "g": 1e16, "h": 1e-5, "i": 0.0001, "j": 1e15,
            "k": -2.5e-10, "l": 123.456, "m": 1.5e300, "o": -0.0, "p": 0.5
        });
        assert_eq!(
            canonical_text(&value),
            r#"{"f":1e-07,"g":1e+16,"h":1e-05,"i":0.0001,"j":1000000000000000.0,"k":-2.5e-10,"l":123.456,"m":1.5e+300,"o":-0.0,"p":0.5}"#
        );
    }

    #[test]
    fn test_pow_left_known_answer() {
        let job = reference_job();
        assert_eq!(
            object_hash(&job.header(TIMESTAMP)).unwrap(),
            "58f5dc79d1a3c28aad4a86a40d9bc57ba3c908dde1268c7edf6024a2e8b0b5b5"
        );
        assert_eq!(
            job.pow_left(TIMESTAMP).unwrap(),
            format!(
                "{}{}",
                "ab".repeat(39),
                "58f5dc79d1a3c28aad4a86a40d9bc57ba3c908dde1268c7edf6024a2e8b0b5b5"
            )
        );
    }

    #[test]
    fn test_time_hash_and_share_known_answers() {
        assert_eq!(
            time_hash("abc", TIMESTAMP),
            "0640b5eece0000ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );

        let job = reference_job();
        let pow_left = job.pow_left(TIMESTAMP).unwrap();
        let share = Share::new(&job, &pow_left, "0001", TIMESTAMP);
        assert_eq!(
            share.root,
            "58b642911abeda0233ba39fc198e8b9b71bb90c7c30f5635af5ea7cad3fa0c32"
        );
        assert_eq!(
            share.blockhash,
            "0640b5eece000032de0e7505b9863d8adc9ee097a3664049671aacd5317966dbc9cda813d14c18"
        );
    }
}
