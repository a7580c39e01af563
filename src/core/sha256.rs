// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/sha256.rs
// Version: 1.1.0
//
// This file implements the SHA-256 helpers the SASEUL chain uses to hash
// structured values, receipt Merkle roots, and time-prefixed block hashes.

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use serde_json::{Number, Value};
use sha2::{Digest, Sha256};
use std::io;

/// Width of the hex-encoded timestamp prefix of a time hash.
pub const HEX_TIME_SIZE: usize = 14;

/// SHA-256 of `data`, lowercase hex.
pub fn sha256_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

/// Float text in shortest round-trip form, switching to exponent notation
/// below 1e-4 and from 1e16 up. Exponents carry a sign and two digits at least
/// (`1e-07`, `1.5e+16`); fixed values keep a fractional part (`2.0`).
pub fn float_text(value: f64) -> String {
    let sign = if value.is_sign_negative() { "-" } else { "" };
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let point = exponent + 1;

    if !(-4 < point && point <= 16) {
        let (lead, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() { String::new() } else { format!(".{}", rest) };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}{}{}e{}{:02}", sign, lead, fraction, exp_sign, exponent.abs());
    }

    let body = if point <= 0 {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
    } else if point as usize >= digits.len() {
        format!("{}{}.0", digits, "0".repeat(point as usize - digits.len()))
    } else {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{}.{}", whole, fraction)
    };
    format!("{}{}", sign, body)
}

/// Compact JSON formatter that renders floats with `float_text`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashFormatter;

impl Formatter for HashFormatter {
    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(float_text(value).as_bytes())
    }

    fn write_f32<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f32) -> io::Result<()> {
        self.write_f64(writer, f64::from(value))
    }
}

/// Compact JSON text used for hashing: no whitespace, key order preserved,
/// non-ASCII left unescaped.
pub fn hash_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, HashFormatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(f) if number.is_f64() => float_text(f),
        _ => number.to_string(),
    }
}

/// Canonical text of a JSON value for hashing.
///
/// Objects and arrays use `hash_json`. Strings hash as their raw text.
/// Booleans and null use `True`, `False` and `None`, as the chain's reference
/// hasher stringifies them.
pub fn canonical_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        Value::Number(n) => number_text(n),
        Value::Object(_) | Value::Array(_) => {
            hash_json(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

/// Hash of a JSON value using its canonical text.
pub fn value_hash(value: &Value) -> String {
    sha256_hex(&canonical_text(value))
}

/// Hash of any serializable structure.
///
/// Struct fields serialize in declaration order, which fixes the key order of
/// the encoded object.
pub fn object_hash<T: Serialize>(object: &T) -> serde_json::Result<String> {
    Ok(sha256_hex(&hash_json(object)?))
}

/// Merkle root over `items`.
///
/// Empty input hashes the empty string. An unpaired trailing hash is carried
/// up to the next layer unchanged.
pub fn merkle_root(items: &[Value]) -> String {
    if items.is_empty() {
        return sha256_hex("");
    }

    let mut layer: Vec<String> = items.iter().map(value_hash).collect();
    while layer.len() > 1 {
        layer = layer
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => sha256_hex(&format!("{}{}", left, right)),
                [single] => single.clone(),
                _ => unreachable!("chunks(2) yields one or two items"),
            })
            .collect();
    }
    layer.swap_remove(0)
}

/// Fixed-width hex rendering of a microsecond timestamp.
pub fn hex_time(timestamp: u64) -> String {
    format!("{:0width$x}", timestamp, width = HEX_TIME_SIZE)
}

/// Time-prefixed hash: `hex_time(timestamp) ∥ sha256(data)`.
pub fn time_hash(data: &str, timestamp: u64) -> String {
    format!("{}{}", hex_time(timestamp), sha256_hex(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sha256_empty_string() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_canonical_text_is_compact() {
        let value = json!({"b": 1, "a": [1, 2, {"c": "d"}]});
        assert_eq!(canonical_text(&value), r#"{"b":1,"a":[1,2,{"c":"d"}]}"#);
    }

    #[test]
    fn test_canonical_text_scalars() {
        assert_eq!(canonical_text(&json!("abc")), "abc");
        assert_eq!(canonical_text(&json!(42)), "42");
        assert_eq!(canonical_text(&json!(-3)), "-3");
        assert_eq!(canonical_text(&json!(true)), "True");
        assert_eq!(canonical_text(&json!(false)), "False");
        assert_eq!(canonical_text(&Value::Null), "None");
        assert_eq!(canonical_text(&json!(2.0)), "2.0");
        assert_eq!(canonical_text(&json!(1e-7)), "1e-07");
    }

    #[test]
    fn test_float_text() {
        let cases = [
            (0.0, "0.0"),
            (-0.0, "-0.0"),
            (0.5, "0.5"),
            (1.5, "1.5"),
            (123.456, "123.456"),
            (0.0001, "0.0001"),
            (1e-5, "1e-05"),
            (1e-7, "1e-07"),
            (-2.5e-10, "-2.5e-10"),
            (1e15, "1000000000000000.0"),
            (1e16, "1e+16"),
            (1.5e300, "1.5e+300"),
            (1234.5e-8, "1.2345e-05"),
        ];
        for (value, expected) in cases {
            assert_eq!(float_text(value), expected, "{:?}", value);
        }
    }

    #[test]
    fn test_hash_json_floats_and_unicode() {
        let value = json!({"f": 1e-7, "g": 1e16, "t": "한글", "n": null, "b": true});
        assert_eq!(
            hash_json(&value).unwrap(),
            r#"{"f":1e-07,"g":1e+16,"t":"한글","n":null,"b":true}"#
        );
    }

    #[test]
    fn test_hex_time_width() {
        assert_eq!(hex_time(0), "00000000000000");
        assert_eq!(hex_time(255), "000000000000ff");
        assert_eq!(hex_time(1_700_000_000_000_000).len(), HEX_TIME_SIZE);
    }

    #[test]
    fn test_time_hash_layout() {
        let hash = time_hash("abc", 16);
        assert_eq!(hash.len(), HEX_TIME_SIZE + 64);
        assert!(hash.starts_with("00000000000010"));
        assert!(hash.ends_with(&sha256_hex("abc")));
    }
}

// Changelog:
// - v1.1.0: Float and scalar text matches the reference hasher byte for byte.
// - v1.0.0: SHA-256 helpers, Merkle root and time hash.
