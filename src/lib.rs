// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # tickfeed
//!
//! Subscribe to one or more ZMQ publishers through a single SUB socket and
//! consume their multipart messages as decoded JSON.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! tickfeed = "0.1"
//! ```
//!
//! ```rust,no_run
//! use tickfeed::prelude::*;
//!
//! let mut subscriber = TopicSubscriber::new(&["5601", "5602", "5603"], "LTC_USDN", "127.0.0.1")?;
//! for payload in subscriber.subscribe()? {
//!     println!("{}", payload?);
//! }
//! # Ok::<(), FeedError>(())
//! ```
//!
//! ### From a config file
//!
//! ```rust,no_run
//! use tickfeed::config::{load_config_or_default, validate_config};
//! use tickfeed::prelude::*;
//!
//! let config = load_config_or_default(None, None)?;
//! validate_config(&config)?;
//!
//! let mut subscriber = TopicSubscriber::from_settings(&config.subscriber)?;
//! let stop = subscriber.stop_handle();
//! for item in subscriber.subscribe_topics(config.subscriber.topics.clone())? {
//!     let (topic, payload) = item?;
//!     println!("{} {}", topic, payload);
//!     # stop.stop();
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: tickfeed-config, tickfeed-observability    │
//! │  (TOML + env + CLI settings, tracing setup)             │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  I/O: tickfeed-transports                               │
//! │  (ZMQ SUB socket, multipart receive)                    │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Feeds: tickfeed-subscriber                             │
//! │  (topic filters, frame decoding, cancellation)          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

pub use tickfeed_config as config;
pub use tickfeed_observability as observability;
pub use tickfeed_subscriber as subscriber;
pub use tickfeed_transports as transports;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::subscriber::{
        Feed, FeedError, FeedResult, PayloadMode, StopHandle, SubscriberOptions, TaggedFeed,
        TopicSubscriber,
    };
    pub use crate::transports::prelude::*;
}
