// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # tickfeed-transports
//!
//! Transport layer for tickfeed: a transport-agnostic subscriber interface and
//! its ZMQ implementation.
//!
//! ## Feature Flags
//!
//! - `zmq-client` (default): ZMQ SUB socket
//! - `client`: All client implementations
//! - `all`: Everything
//!
//! ## Example: ZMQ Subscriber
//!
//! ```no_run
//! use tickfeed_transports::prelude::*;
//!
//! let mut subscriber = ZmqSub::with_address("tcp://localhost:5556")?;
//! subscriber.start()?;
//! subscriber.subscribe(b"topic")?;
//!
//! loop {
//!     let message = subscriber.receive_multipart()?;
//!     println!("Received {} frames", message.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! 1. **Common**: Shared types (errors, configs, messages)
//! 2. **Traits**: Transport-agnostic interfaces
//! 3. **Implementations**: Protocol-specific code (ZMQ)

pub mod common;
pub mod traits;

#[cfg(feature = "zmq-client")]
pub mod zmq;

// Re-export commonly used types
pub use common::{
    tcp_endpoint, MultipartMessage, ReceiveTuning, SubscriberConfig, TransportError,
    TransportResult,
};

pub use traits::{Subscriber, Transport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::common::*;
    pub use crate::traits::*;

    #[cfg(feature = "zmq-client")]
    pub use crate::zmq::client::*;
}
