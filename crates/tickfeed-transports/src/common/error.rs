// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Common error types for all transports

use thiserror::Error;

/// Result type alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport-agnostic error type
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to initialize transport
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Failed to connect client socket
    #[error("Connect failed: {endpoint}: {reason}")]
    ConnectFailed { endpoint: String, reason: String },

    /// Failed to receive message
    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    /// Timeout occurred
    #[error("Operation timed out")]
    Timeout,

    /// A signal arrived while blocked in poll or receive
    #[error("Interrupted by signal")]
    Interrupted,

    /// Transport is not running
    #[error("Transport is not running")]
    NotRunning,

    /// Transport is already running
    #[error("Transport is already running")]
    AlreadyRunning,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Transport-specific error
    #[cfg(feature = "zmq-client")]
    #[error("ZMQ error: {0}")]
    Zmq(#[source] zmq::Error),
}

impl TransportError {
    /// True when the receive can simply be attempted again (timeout or EINTR)
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Interrupted)
    }
}

#[cfg(feature = "zmq-client")]
impl From<zmq::Error> for TransportError {
    fn from(err: zmq::Error) -> Self {
        match err {
            zmq::Error::EAGAIN => Self::Timeout,
            zmq::Error::EINTR => Self::Interrupted,
            _ => Self::Zmq(err),
        }
    }
}
