// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for the tickfeed subscriber

use thiserror::Error;
use tickfeed_transports::TransportError;

/// Result type for subscriber operations
pub type FeedResult<T> = std::result::Result<T, FeedError>;

/// Why a single frame could not be turned into a payload
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by a feed
///
/// Every variant ends the feed that produced it.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Fewer frames than a topic plus a payload
    #[error("Malformed message: only {frames} frame(s) received, expected topic and payload")]
    MalformedMessage { frames: usize },

    /// A non-sentinel frame was not UTF-8 JSON
    #[error("Failed to decode frame {frame}: {source}")]
    DecodeFailure {
        frame: usize,
        #[source]
        source: DecodeError,
    },

    /// `subscribe_topics` was called without any topic
    #[error("No topics supplied for multi-topic subscription")]
    EmptyTopicSet,

    /// Socket-level failure, including receive timeouts
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl FeedError {
    pub(crate) fn decode(frame: usize, source: impl Into<DecodeError>) -> Self {
        Self::DecodeFailure {
            frame,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FeedError::MalformedMessage { frames: 1 };
        assert_eq!(
            err.to_string(),
            "Malformed message: only 1 frame(s) received, expected topic and payload"
        );

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FeedError::decode(2, json_err);
        assert!(err.to_string().starts_with("Failed to decode frame 2: invalid JSON"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_transport_error_is_transparent() {
        let err: FeedError = TransportError::Timeout.into();
        assert_eq!(err.to_string(), "Operation timed out");
    }
}
