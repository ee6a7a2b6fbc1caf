// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! ZMQ transport implementations
//!
//! Only the client side of publish-subscribe lives here: a SUB socket that
//! connects to one or more PUB endpoints.
//!
//! ## Feature Flags
//!
//! - `zmq-client`: Enable client-side sockets (SUB)
//!
//! ## Example
//!
//! ```no_run
//! use tickfeed_transports::zmq::client::ZmqSub;
//! use tickfeed_transports::traits::{Subscriber, Transport};
//!
//! let mut sub = ZmqSub::with_ports("127.0.0.1", &["5601", "5602"])?;
//! sub.start()?;
//! sub.subscribe(b"LTC_USDN")?;
//!
//! let message = sub.receive_multipart()?;
//! println!("{} frames", message.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(feature = "zmq-client")]
pub mod client;

#[cfg(feature = "zmq-client")]
pub use client::ZmqSub;
