//! Wire protocol v1.
//!
//! One frame per line: the standard base64 encoding of a JSON object holding
//! the record fields. The trailing newline is the frame delimiter and is not
//! part of the frame.

use crate::record::LogRecord;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;

pub const PROTOCOL_VERSION: u8 = 1;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty frame")]
    Empty,

    #[error("frame is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not a valid record: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct WireRecord<'a> {
    level_name: Cow<'static, str>,
    #[serde(flatten)]
    record: &'a LogRecord,
}

/// Decode one raw line, dropping it on any failure.
///
/// A corrupt line must never interrupt the stream, so the reason is only
/// traced and the caller sees `None`.
pub fn decode(raw: &[u8]) -> Option<LogRecord> {
    match try_decode(raw) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::trace!(error = %e, bytes = raw.len(), "dropping undecodable line");
            None
        }
    }
}

pub fn try_decode(raw: &[u8]) -> Result<LogRecord, DecodeError> {
    let frame = raw.trim_ascii();
    if frame.is_empty() {
        return Err(DecodeError::Empty);
    }

    let payload = STANDARD.decode(frame)?;
    Ok(serde_json::from_slice(&payload)?)
}

/// Encode a record as a single frame, without the line delimiter.
pub fn encode(record: &LogRecord) -> Result<String, serde_json::Error> {
    let payload = serde_json::to_vec(&WireRecord {
        level_name: record.level.name(),
        record,
    })?;

    Ok(STANDARD.encode(payload))
}
