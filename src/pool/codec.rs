// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/codec.rs
// Version: 1.2.0
//
// This file implements newline-delimited JSON framing for the pool connection,
// located in the pool subdirectory. The codec splits complete lines and
// classifies each one as a notification, a server request or a reply. The
// reader drives the codec through a FramedRead with a poll timeout.
//
// Tree Location:
// - src/pool/codec.rs (pool wire framing)
// - Depends on: serde_json, tokio, tokio-util, futures, bytes

use crate::pool::error::PoolError;
use bytes::BytesMut;
use futures::StreamExt;
use log::{error, trace, warn};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio_util::codec::{Decoder, FramedRead, LinesCodec, LinesCodecError};

const LOG_TARGET: &str = "saseul::pool_miner::codec";

/// Longest accepted line; longer lines are skipped up to their newline
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// One classified message from the pool
#[derive(Debug, Clone, PartialEq)]
pub enum PoolMessage {
    /// Has `method` and no (or a null) `id`
    Notification { method: String, params: Value },
    /// Has both `id` and `method`
    Request {
        id: Value,
        method: String,
        params: Value,
    },
    /// Has `id` plus `result` and/or `error`; missing members read as null
    Reply {
        id: Value,
        result: Value,
        error: Value,
    },
}

impl PoolMessage {
    /// Numeric id of a reply or request, if it has one
    pub fn id(&self) -> Option<u64> {
        match self {
            PoolMessage::Notification { .. } => None,
            PoolMessage::Request { id, .. } | PoolMessage::Reply { id, .. } => id.as_u64(),
        }
    }
}

/// Classify one line of text
pub fn classify(line: &str) -> Result<PoolMessage, PoolError> {
    let value: Value = serde_json::from_str(line)?;
    let Value::Object(mut object) = value else {
        return Err(PoolError::Protocol(format!("non-object message: {}", line)));
    };

    let id = object.remove("id").unwrap_or(Value::Null);
    let method = match object.remove("method") {
        Some(Value::String(method)) => Some(method),
        Some(other) => {
            return Err(PoolError::Protocol(format!("non-string method: {}", other)));
        }
        None => None,
    };
    let params = object.remove("params").unwrap_or(Value::Null);

    match (id.is_null(), method) {
        (true, Some(method)) => Ok(PoolMessage::Notification { method, params }),
        (false, Some(method)) => Ok(PoolMessage::Request { id, method, params }),
        (false, None) if has_reply_members(&object) => Ok(PoolMessage::Reply {
            id,
            result: object.remove("result").unwrap_or(Value::Null),
            error: object.remove("error").unwrap_or(Value::Null),
        }),
        _ => Err(PoolError::Protocol(format!("unclassifiable message: {}", line))),
    }
}

fn has_reply_members(object: &Map<String, Value>) -> bool {
    object.contains_key("result") || object.contains_key("error")
}

/// Serialize a message as one compact JSON line
pub fn encode<T: Serialize>(message: &T) -> Result<String, PoolError> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

/// Line codec for the pool stream.
///
/// Line splitting and the length cap come from `LinesCodec`; each complete
/// line is then classified. Blank lines are skipped. Malformed, oversized and
/// non UTF-8 lines are logged, counted and dropped without ending the stream.
#[derive(Debug)]
pub struct PoolCodec {
    lines: LinesCodec,
    dropped: u64,
}

impl PoolCodec {
    pub fn new() -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(MAX_FRAME_LEN),
            dropped: 0,
        }
    }

    /// Lines discarded since creation
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn accept_line(&mut self, line: &str) -> Option<PoolMessage> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match classify(line) {
            Ok(message) => {
                trace!(target: LOG_TARGET, "Received: {}", line);
                Some(message)
            }
            Err(e) => {
                error!(target: LOG_TARGET, "Protocol error, line dropped: {}", e);
                self.dropped += 1;
                None
            }
        }
    }

    fn drop_line(&mut self, error: LinesCodecError) -> Result<(), PoolError> {
        match error {
            LinesCodecError::MaxLineLengthExceeded => {
                error!(target: LOG_TARGET, "Discarding line longer than {} bytes", MAX_FRAME_LEN);
            }
            LinesCodecError::Io(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn!(target: LOG_TARGET, "Dropping non UTF-8 line: {}", e);
            }
            LinesCodecError::Io(e) => return Err(e.into()),
        }
        self.dropped += 1;
        Ok(())
    }
}

impl Default for PoolCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for PoolCodec {
    type Item = PoolMessage;
    type Error = PoolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<PoolMessage>, PoolError> {
        loop {
            match self.lines.decode(src) {
                Ok(Some(line)) => {
                    if let Some(message) = self.accept_line(&line) {
                        return Ok(Some(message));
                    }
                }
                Ok(None) => return Ok(None),
                Err(e) => self.drop_line(e)?,
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<PoolMessage>, PoolError> {
        if let Some(message) = self.decode(src)? {
            return Ok(Some(message));
        }
        if !src.is_empty() {
            warn!(target: LOG_TARGET, "Discarding {} bytes of an unterminated line", src.len());
            src.clear();
            self.dropped += 1;
        }
        Ok(None)
    }
}

/// Reads classified messages from an async byte stream
pub struct FrameReader<R> {
    framed: FramedRead<R, PoolCodec>,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            framed: FramedRead::new(inner, PoolCodec::new()),
        }
    }

    /// Wait up to `poll` for the next message.
    ///
    /// `Ok(None)` means the poll window elapsed quietly; end of stream is
    /// reported as `PoolError::Disconnected`.
    pub async fn next_message(&mut self, poll: Duration) -> Result<Option<PoolMessage>, PoolError> {
        let deadline = tokio::time::Instant::now() + poll;
        match tokio::time::timeout_at(deadline, self.framed.next()).await {
            Err(_) => Ok(None),
            Ok(None) => Err(PoolError::Disconnected),
            Ok(Some(message)) => message.map(Some),
        }
    }

    pub fn dropped(&self) -> u64 {
        self.framed.decoder().dropped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_notification() {
        let msg = classify(r#"{"method":"mining.notify","params":{"height":1}}"#).unwrap();
        assert_eq!(
            msg,
            PoolMessage::Notification {
                method: "mining.notify".to_string(),
                params: json!({"height": 1}),
            }
        );

        let msg = classify(r#"{"id":null,"method":"mining.set_difficulty","params":[5]}"#).unwrap();
        assert!(matches!(msg, PoolMessage::Notification { .. }));
    }

    #[test]
    fn test_classify_request_and_reply() {
        let msg = classify(r#"{"id":9,"method":"client.get_version","params":[]}"#).unwrap();
        assert!(matches!(msg, PoolMessage::Request { .. }));
        assert_eq!(msg.id(), Some(9));

        let msg = classify(r#"{"id":3,"result":true,"error":null}"#).unwrap();
        assert_eq!(
            msg,
            PoolMessage::Reply {
                id: json!(3),
                result: json!(true),
                error: Value::Null,
            }
        );

        let msg = classify(r#"{"id":4,"error":"low difficulty"}"#).unwrap();
        assert!(matches!(msg, PoolMessage::Reply { result: Value::Null, .. }));
    }

    #[test]
    fn test_classify_rejects_invalid() {
        assert!(classify("not json").is_err());
        assert!(classify("[1,2,3]").is_err());
        assert!(classify(r#"{"id":1}"#).is_err());
        assert!(classify(r#"{"params":{}}"#).is_err());
    }

    fn drain(codec: &mut PoolCodec, buf: &mut BytesMut) -> Vec<PoolMessage> {
        std::iter::from_fn(|| codec.decode(buf).unwrap()).collect()
    }

    #[test]
    fn test_decoder_handles_split_and_batched_lines() {
        let mut codec = PoolCodec::new();
        let mut buf = BytesMut::from(&br#"{"id":1,"result":true}"#[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert!(!buf.is_empty());

        buf.extend_from_slice(b"\n\n{\"method\":\"mining.notify_block\",\"params\":{\"height\":5}}\n{\"id\":2,");
        let messages = drain(&mut codec, &mut buf);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id(), Some(1));
        assert!(matches!(&messages[1], PoolMessage::Notification { method, .. } if method == "mining.notify_block"));

        buf.extend_from_slice(b"\"result\":false}\n");
        assert_eq!(codec.decode(&mut buf).unwrap().and_then(|m| m.id()), Some(2));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decoder_counts_dropped_lines() {
        let mut codec = PoolCodec::new();
        let mut buf = BytesMut::from(&b"garbage\n42\n\xff\xfe\n{\"id\":1,\"result\":true}\r\n"[..]);
        let messages = drain(&mut codec, &mut buf);
        assert_eq!(messages.len(), 1);
        assert_eq!(codec.dropped(), 3);
    }

    #[test]
    fn test_decoder_skips_oversized_line() {
        let mut codec = PoolCodec::new();
        let mut buf = BytesMut::with_capacity(MAX_FRAME_LEN + 64);
        buf.extend_from_slice(&vec![b'x'; MAX_FRAME_LEN + 1]);
        buf.extend_from_slice(b"\n{\"id\":3,\"result\":true}\n");
        let messages = drain(&mut codec, &mut buf);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id(), Some(3));
        assert_eq!(codec.dropped(), 1);
    }

    #[test]
    fn test_decode_eof_discards_partial_line() {
        let mut codec = PoolCodec::new();
        let mut buf = BytesMut::from(&b"{\"id\":1,\"result\":true}\n{\"id\":2"[..]);
        assert_eq!(codec.decode_eof(&mut buf).unwrap().and_then(|m| m.id()), Some(1));
        assert!(codec.decode_eof(&mut buf).unwrap().is_none());
        assert!(buf.is_empty());
        assert_eq!(codec.dropped(), 1);
    }

    #[test]
    fn test_encode_is_compact_line() {
        let line = encode(&json!({"id": 1, "method": "mining.subscribe", "params": ["x"]})).unwrap();
        assert_eq!(line, "{\"id\":1,\"method\":\"mining.subscribe\",\"params\":[\"x\"]}\n");
    }

    #[tokio::test]
    async fn test_reader_reports_timeout_and_eof() {
        let (mut client, server) = tokio::io::duplex(64);
        let mut reader = FrameReader::new(server);

        let quiet = reader.next_message(Duration::from_millis(20)).await.unwrap();
        assert!(quiet.is_none());

        use tokio::io::AsyncWriteExt;
        client.write_all(b"{\"id\":7,\"result\":true}\n").await.unwrap();
        let msg = reader.next_message(Duration::from_secs(1)).await.unwrap();
        assert_eq!(msg.and_then(|m| m.id()), Some(7));

        drop(client);
        let err = reader.next_message(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, PoolError::Disconnected));
    }
}

// Changelog:
// - v1.2.0: Framing moved onto tokio-util's LinesCodec and FramedRead.
// - v1.1.0: Added FrameReader with poll timeouts for the receiver loop.
// - v1.0.0: Line splitting, classification and compact encoding.
