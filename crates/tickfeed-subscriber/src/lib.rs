// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # tickfeed-subscriber
//!
//! Connects one ZMQ SUB socket to any number of publishers, filters by
//! topic, and turns each multipart message into a JSON payload.
//!
//! # Wire format
//!
//! `[topic, payload, ...]` where every frame after the topic is JSON text,
//! except literal `ISR` frames which are skipped. Fewer than two frames is an
//! error. When several payload frames arrive, only the last is kept unless
//! [`PayloadMode::All`] is configured.
//!
//! # Quick Start
//!
//! ```no_run
//! use tickfeed_subscriber::TopicSubscriber;
//!
//! // Single topic: bare payloads
//! let mut subscriber = TopicSubscriber::new(&["5601", "5602", "5603"], "LTC_USDN", "127.0.0.1")?;
//! for payload in subscriber.subscribe()?.take(10) {
//!     println!("{}", payload?);
//! }
//!
//! // Several topics: (topic, payload) pairs
//! for item in subscriber.subscribe_topics(["LTC_USDN", "WAVES_USDN"])?.take(10) {
//!     let (topic, payload) = item?;
//!     println!("{} {}", topic, payload);
//! }
//! # Ok::<(), tickfeed_subscriber::FeedError>(())
//! ```
//!
//! # Error Handling
//!
//! Feeds yield `Result<_, FeedError>`. The first error is also the last item:
//! after it the feed returns `None`. Nothing is retried.
//!
//! # Cancellation
//!
//! Feeds block until a message arrives. [`StopHandle::stop`] (from
//! [`TopicSubscriber::stop_handle`]) ends them within one poll interval.

pub mod decode;
pub mod error;
pub mod filter;
pub mod stop;
pub mod subscriber;

#[cfg(test)]
mod scripted;

// Re-export main types for convenience
pub use decode::{decode_message, DecodedMessage, MIN_FRAMES, SENTINEL_FRAME};
pub use error::{DecodeError, FeedError, FeedResult};
pub use filter::TopicFilter;
pub use stop::StopHandle;
pub use subscriber::{Feed, SubscriberOptions, TaggedFeed, TopicSubscriber};

pub use tickfeed_config::PayloadMode;
