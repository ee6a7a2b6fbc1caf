// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Transport trait definitions
//!
//! These traits define the common interface for subscriber transports so the
//! decoding layer can run over ZMQ sockets or over an in-memory stand-in.

use crate::common::{MultipartMessage, ReceiveTuning, TransportResult};

/// Base transport trait - implemented by all transports
pub trait Transport: Send + Sync {
    /// Start the transport
    fn start(&mut self) -> TransportResult<()>;

    /// Stop the transport
    fn stop(&mut self) -> TransportResult<()>;

    /// Check if transport is running
    fn is_running(&self) -> bool;

    /// Get transport name/type
    fn transport_type(&self) -> &str;
}

/// Publish-Subscribe pattern (Subscriber side)
///
/// Filters are cumulative: every `subscribe` call adds one, nothing resets them
/// short of `unsubscribe` or a restart.
pub trait Subscriber: Transport {
    /// Subscribe to a topic prefix (empty = everything)
    fn subscribe(&mut self, topic: &[u8]) -> TransportResult<()>;

    /// Unsubscribe from a topic prefix
    fn unsubscribe(&mut self, topic: &[u8]) -> TransportResult<()>;

    /// Apply receive buffer and high water mark options
    fn apply_receive_tuning(&mut self, tuning: &ReceiveTuning) -> TransportResult<()>;

    /// Block until one complete multipart message arrives
    fn receive_multipart(&self) -> TransportResult<MultipartMessage>;

    /// Wait at most `timeout_ms` for a multipart message
    ///
    /// Returns `TransportError::Timeout` when nothing arrived in time.
    fn receive_multipart_timeout(&self, timeout_ms: u64) -> TransportResult<MultipartMessage>;
}
