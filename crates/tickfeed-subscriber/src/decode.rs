// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Multipart frame decoding
//!
//! Frame 0 is the topic. Every later frame is a JSON payload unless it is the
//! literal sentinel `ISR`, which is skipped but still counts as a frame.

use serde_json::Value;
use tickfeed_config::PayloadMode;
use tickfeed_transports::MultipartMessage;
use tracing::trace;

use crate::error::{FeedError, FeedResult};

/// Marker frame carrying no payload
pub const SENTINEL_FRAME: &[u8] = b"ISR";

/// Topic frame plus at least one more
pub const MIN_FRAMES: usize = 2;

/// One decoded multipart message
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    /// Frame 0 as text
    pub topic: String,
    /// Last payload (`PayloadMode::Last`) or every payload as an array (`PayloadMode::All`).
    /// `Null` in `Last` mode when every payload frame was a sentinel.
    pub payload: Value,
    /// How many frames were decoded as JSON
    pub payload_frames: usize,
}

pub fn is_sentinel(frame: &[u8]) -> bool {
    frame == SENTINEL_FRAME
}

/// Decode one payload frame as UTF-8 JSON
pub fn decode_frame(index: usize, frame: &[u8]) -> FeedResult<Value> {
    let text = std::str::from_utf8(frame).map_err(|e| FeedError::decode(index, e))?;
    serde_json::from_str(text).map_err(|e| FeedError::decode(index, e))
}

/// Decode a whole message
///
/// # Errors
///
/// - `MalformedMessage` when fewer than [`MIN_FRAMES`] frames arrived
/// - `DecodeFailure` for the first frame that is not UTF-8 JSON (topic frame
///   included, which only has to be UTF-8)
pub fn decode_message(message: &MultipartMessage, mode: PayloadMode) -> FeedResult<DecodedMessage> {
    let frames = message.frames();
    if frames.len() < MIN_FRAMES {
        return Err(FeedError::MalformedMessage {
            frames: frames.len(),
        });
    }

    let mut last = Value::Null;
    let mut all = Vec::new();
    let mut payload_frames = 0;

    for (index, frame) in frames.iter().enumerate().skip(1) {
        if is_sentinel(frame) {
            trace!("[DECODE] Skipping sentinel frame {}", index);
            continue;
        }

        let value = decode_frame(index, frame)?;
        payload_frames += 1;
        match mode {
            PayloadMode::Last => last = value,
            PayloadMode::All => all.push(value),
        }
    }

    let topic = std::str::from_utf8(&frames[0])
        .map_err(|e| FeedError::decode(0, e))?
        .to_string();

    let payload = match mode {
        PayloadMode::Last => last,
        PayloadMode::All => Value::Array(all),
    };

    Ok(DecodedMessage {
        topic,
        payload,
        payload_frames,
    })
}
