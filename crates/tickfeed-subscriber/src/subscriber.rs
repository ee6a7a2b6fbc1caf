// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Topic subscriber and its feeds

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use serde_json::Value;
use tickfeed_config::{PayloadMode, SubscriberSettings};
use tickfeed_transports::prelude::*;
use tracing::{debug, info};

use crate::decode::{decode_message, DecodedMessage};
use crate::error::{FeedError, FeedResult};
use crate::filter::TopicFilter;
use crate::stop::StopHandle;

/// Default wake-up interval for cancellation checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Behaviour shared by every feed of one subscriber
#[derive(Debug, Clone)]
pub struct SubscriberOptions {
    /// Filter applied by [`TopicSubscriber::subscribe`]
    pub default_topic: String,
    /// Applied by [`TopicSubscriber::subscribe`] only
    pub tuning: ReceiveTuning,
    pub payload_mode: PayloadMode,
    /// `None` blocks forever
    pub receive_timeout: Option<Duration>,
    pub poll_interval: Duration,
}

impl SubscriberOptions {
    pub fn new(default_topic: impl Into<String>) -> Self {
        Self {
            default_topic: default_topic.into(),
            tuning: ReceiveTuning::default(),
            payload_mode: PayloadMode::Last,
            receive_timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_payload_mode(mut self, mode: PayloadMode) -> Self {
        self.payload_mode = mode;
        self
    }

    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = Some(timeout);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_tuning(mut self, tuning: ReceiveTuning) -> Self {
        self.tuning = tuning;
        self
    }
}

impl From<&SubscriberSettings> for SubscriberOptions {
    fn from(settings: &SubscriberSettings) -> Self {
        Self {
            default_topic: settings.topic.clone(),
            tuning: ReceiveTuning {
                receive_buffer: settings.receive_buffer,
                receive_hwm: settings.receive_hwm,
            },
            payload_mode: settings.payload_mode,
            receive_timeout: settings.receive_timeout(),
            poll_interval: settings.poll_interval(),
        }
    }
}

/// Subscriber connected to one or more publishers through a single socket
///
/// Filters accumulate across `subscribe*` calls; nothing resets them. The
/// socket closes on [`close`](Self::close) or drop.
///
/// # Example
///
/// ```no_run
/// use tickfeed_subscriber::TopicSubscriber;
///
/// let mut subscriber = TopicSubscriber::new(&["5601", "5602", "5603"], "LTC_USDN", "127.0.0.1")?;
/// for payload in subscriber.subscribe()? {
///     println!("{}", payload?);
/// }
/// # Ok::<(), tickfeed_subscriber::FeedError>(())
/// ```
pub struct TopicSubscriber<S: Subscriber = ZmqSub> {
    transport: S,
    options: SubscriberOptions,
    active_topics: BTreeSet<String>,
    stop: StopHandle,
}

impl TopicSubscriber<ZmqSub> {
    /// Connect to `tcp://{ip}:{port}` for every port, all on one socket
    ///
    /// Unreachable publishers do not fail construction; ZMQ keeps connecting
    /// in the background.
    pub fn new<P: AsRef<str>>(
        ports: &[P],
        topic: impl Into<String>,
        ip: &str,
    ) -> FeedResult<Self> {
        let transport = ZmqSub::with_ports(ip, ports)?;
        Self::with_transport(transport, SubscriberOptions::new(topic))
    }

    /// Connect to explicit endpoints (any ZMQ transport: tcp, ipc, inproc)
    pub fn connect(
        context: std::sync::Arc<zmq::Context>,
        config: SubscriberConfig,
        options: SubscriberOptions,
    ) -> FeedResult<Self> {
        let transport = ZmqSub::new(context, config)?;
        Self::with_transport(transport, options)
    }

    /// Build from loaded configuration
    pub fn from_settings(settings: &SubscriberSettings) -> FeedResult<Self> {
        let transport = ZmqSub::with_ports(&settings.ip, settings.ports.as_slice())?;
        Self::with_transport(transport, SubscriberOptions::from(settings))
    }
}

impl<S: Subscriber> TopicSubscriber<S> {
    /// Wrap a transport, starting it if needed
    pub fn with_transport(mut transport: S, options: SubscriberOptions) -> FeedResult<Self> {
        if !transport.is_running() {
            transport.start()?;
        }

        info!(
            "[SUBSCRIBER] Ready on {} (default topic '{}')",
            transport.transport_type(),
            options.default_topic
        );

        Ok(Self {
            transport,
            options,
            active_topics: BTreeSet::new(),
            stop: StopHandle::new(),
        })
    }

    /// Single-topic mode: filter on the default topic and yield bare payloads
    ///
    /// Also applies the receive tuning (unbounded queueing by default).
    pub fn subscribe(&mut self) -> FeedResult<Feed<'_, S>> {
        self.apply_filter(&TopicFilter::Single(self.options.default_topic.clone()))?;
        self.transport.apply_receive_tuning(&self.options.tuning)?;

        Ok(Feed {
            core: self.feed_core(),
        })
    }

    /// Multi-topic mode: filter on every given topic and yield `(topic, payload)`
    ///
    /// The default topic is not added, and no receive tuning is applied.
    pub fn subscribe_topics<I, T>(&mut self, topics: I) -> FeedResult<TaggedFeed<'_, S>>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let filter = TopicFilter::multi(topics);
        if filter.is_empty() {
            return Err(FeedError::EmptyTopicSet);
        }
        self.apply_filter(&filter)?;

        Ok(TaggedFeed {
            core: self.feed_core(),
        })
    }

    /// Every filter applied so far
    pub fn active_topics(&self) -> impl Iterator<Item = &str> {
        self.active_topics.iter().map(String::as_str)
    }

    pub fn default_topic(&self) -> &str {
        &self.options.default_topic
    }

    pub fn options(&self) -> &SubscriberOptions {
        &self.options
    }

    /// Handle that ends this subscriber's feeds from anywhere
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn transport(&self) -> &S {
        &self.transport
    }

    /// Stop all feeds and close the socket
    pub fn close(mut self) -> FeedResult<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> FeedResult<()> {
        self.stop.stop();
        if self.transport.is_running() {
            self.transport.stop()?;
            debug!("[SUBSCRIBER] Closed {}", self.transport.transport_type());
        }
        Ok(())
    }

    fn apply_filter(&mut self, filter: &TopicFilter) -> FeedResult<()> {
        for topic in filter.topics() {
            self.transport.subscribe(topic.as_bytes())?;
            self.active_topics.insert(topic.to_string());
        }
        debug!(
            "[SUBSCRIBER] Active filters: {:?}",
            self.active_topics.iter().collect::<Vec<_>>()
        );
        Ok(())
    }

    fn feed_core(&self) -> FeedCore<'_, S> {
        FeedCore {
            transport: &self.transport,
            payload_mode: self.options.payload_mode,
            receive_timeout: self.options.receive_timeout,
            poll_interval: self.options.poll_interval.max(Duration::from_millis(1)),
            stop: self.stop.clone(),
            finished: false,
        }
    }
}

impl<S: Subscriber> Drop for TopicSubscriber<S> {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

/// Receive loop shared by both feed shapes
struct FeedCore<'a, S: Subscriber> {
    transport: &'a S,
    payload_mode: PayloadMode,
    receive_timeout: Option<Duration>,
    poll_interval: Duration,
    stop: StopHandle,
    finished: bool,
}

impl<S: Subscriber> FeedCore<'_, S> {
    fn next_message(&mut self) -> Option<FeedResult<DecodedMessage>> {
        if self.finished {
            return None;
        }

        let started = Instant::now();
        loop {
            if self.stop.is_stopped() {
                self.finished = true;
                return None;
            }

            let wait = match self.receive_timeout {
                Some(timeout) => {
                    let elapsed = started.elapsed();
                    if elapsed >= timeout {
                        return Some(self.fail(TransportError::Timeout.into()));
                    }
                    (timeout - elapsed).min(self.poll_interval)
                }
                None => self.poll_interval,
            };

            // 0 means "block" to the transport, so never round down to it
            let wait_ms = (wait.as_millis() as u64).max(1);
            match self.transport.receive_multipart_timeout(wait_ms) {
                Ok(message) => {
                    debug!("[FEED] Received {} frame(s)", message.len());
                    return Some(match decode_message(&message, self.payload_mode) {
                        Ok(decoded) => Ok(decoded),
                        Err(e) => self.fail(e),
                    });
                }
                // Timeouts and EINTR just loop back to the stop check
                Err(e) if e.is_retryable() => continue,
                Err(e) => return Some(self.fail(e.into())),
            }
        }
    }

    fn fail(&mut self, error: FeedError) -> FeedResult<DecodedMessage> {
        self.finished = true;
        Err(error)
    }
}

/// Infinite sequence of bare payloads from [`TopicSubscriber::subscribe`]
///
/// Ends (`None`) only after the stop handle fires or an error was yielded.
pub struct Feed<'a, S: Subscriber = ZmqSub> {
    core: FeedCore<'a, S>,
}

impl<S: Subscriber> Iterator for Feed<'_, S> {
    type Item = FeedResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.core
            .next_message()
            .map(|result| result.map(|decoded| decoded.payload))
    }
}

/// Infinite sequence of `(topic, payload)` from [`TopicSubscriber::subscribe_topics`]
pub struct TaggedFeed<'a, S: Subscriber = ZmqSub> {
    core: FeedCore<'a, S>,
}

impl<S: Subscriber> Iterator for TaggedFeed<'_, S> {
    type Item = FeedResult<(String, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.core
            .next_message()
            .map(|result| result.map(|decoded| (decoded.topic, decoded.payload)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::scripted::ScriptedSubscriber;
    use serde_json::json;
    use std::thread;

    fn options() -> SubscriberOptions {
        SubscriberOptions::new("ads").with_receive_timeout(Duration::from_millis(200))
    }

    fn subscriber_with(messages: &[&[&[u8]]]) -> TopicSubscriber<ScriptedSubscriber> {
        let transport = ScriptedSubscriber::with_messages(messages);
        TopicSubscriber::with_transport(transport, options()).unwrap()
    }

    #[test]
    fn test_with_transport_starts_it() {
        let subscriber = subscriber_with(&[]);
        assert!(subscriber.transport().is_running());
        assert_eq!(subscriber.default_topic(), "ads");
    }

    #[test]
    fn test_single_topic_yields_bare_payload() {
        let mut subscriber = subscriber_with(&[&[b"ads", br#"{"a":1}"#]]);
        let mut feed = subscriber.subscribe().unwrap();

        assert_eq!(feed.next().unwrap().unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_single_topic_applies_default_filter_and_tuning() {
        let mut subscriber = subscriber_with(&[]);
        drop(subscriber.subscribe().unwrap());

        assert_eq!(subscriber.transport().subscriptions(), vec!["ads"]);
        assert_eq!(
            subscriber.transport().tuning(),
            Some(ReceiveTuning {
                receive_buffer: 200_000,
                receive_hwm: 0
            })
        );
    }

    #[test]
    fn test_multi_topic_yields_tagged_payload() {
        let mut subscriber = subscriber_with(&[&[b"LTC_USDN", br#"{"p":3}"#]]);
        let mut feed = subscriber.subscribe_topics(["LTC_USDN", "WAVES_USDN"]).unwrap();

        let (topic, payload) = feed.next().unwrap().unwrap();
        assert_eq!(topic, "LTC_USDN");
        assert_eq!(payload, json!({"p": 3}));
    }

    #[test]
    fn test_multi_topic_skips_default_topic_and_tuning() {
        let mut subscriber = subscriber_with(&[]);
        drop(subscriber.subscribe_topics(["LTC_USDN", "WAVES_USDN"]).unwrap());

        assert_eq!(
            subscriber.transport().subscriptions(),
            vec!["LTC_USDN", "WAVES_USDN"]
        );
        assert_eq!(subscriber.transport().tuning(), None);
        assert_eq!(
            subscriber.active_topics().collect::<Vec<_>>(),
            vec!["LTC_USDN", "WAVES_USDN"]
        );
    }

    #[test]
    fn test_empty_topic_set_rejected() {
        let mut subscriber = subscriber_with(&[]);
        let result = subscriber.subscribe_topics(Vec::<String>::new());
        assert!(matches!(result, Err(FeedError::EmptyTopicSet)));
        assert!(subscriber.transport().subscriptions().is_empty());
    }

    #[test]
    fn test_resubscribe_accumulates_filters() {
        let mut subscriber = subscriber_with(&[]);
        drop(subscriber.subscribe_topics(["A"]).unwrap());
        drop(subscriber.subscribe_topics(["B"]).unwrap());
        drop(subscriber.subscribe().unwrap());

        assert_eq!(subscriber.transport().subscriptions(), vec!["A", "B", "ads"]);
        assert_eq!(
            subscriber.active_topics().collect::<Vec<_>>(),
            vec!["A", "B", "ads"]
        );
    }

    #[test]
    fn test_keeps_only_last_payload_frame() {
        let mut subscriber = subscriber_with(&[&[b"t", br#"{"a":1}"#, br#"{"a":2}"#]]);
        let payload = subscriber.subscribe().unwrap().next().unwrap().unwrap();
        assert_eq!(payload, json!({"a": 2}));
    }

    #[test]
    fn test_all_payload_mode() {
        let transport =
            ScriptedSubscriber::with_messages(&[&[b"t", br#"{"a":1}"#, b"ISR", br#"{"a":2}"#]]);
        let mut subscriber = TopicSubscriber::with_transport(
            transport,
            options().with_payload_mode(PayloadMode::All),
        )
        .unwrap();

        let payload = subscriber.subscribe().unwrap().next().unwrap().unwrap();
        assert_eq!(payload, json!([{"a": 1}, {"a": 2}]));
    }

    #[test]
    fn test_all_sentinel_message_yields_null() {
        let mut subscriber = subscriber_with(&[&[b"t", b"ISR", b"ISR"]]);
        let payload = subscriber.subscribe().unwrap().next().unwrap().unwrap();
        assert_eq!(payload, Value::Null);
    }

    #[test]
    fn test_single_frame_is_malformed_in_both_modes() {
        let mut subscriber = subscriber_with(&[&[br#"{"a":1}"#]]);
        let err = subscriber.subscribe().unwrap().next().unwrap().unwrap_err();
        assert!(matches!(err, FeedError::MalformedMessage { frames: 1 }));

        let mut subscriber = subscriber_with(&[&[b"A"]]);
        let err = subscriber
            .subscribe_topics(["A"])
            .unwrap()
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, FeedError::MalformedMessage { frames: 1 }));
    }

    #[test]
    fn test_malformed_json_ends_feed() {
        let mut subscriber = subscriber_with(&[
            &[b"t", br#"{"n":1}"#],
            &[b"t", br#"{"n":"#],
            &[b"t", br#"{"n":3}"#],
        ]);
        let mut feed = subscriber.subscribe().unwrap();

        assert_eq!(feed.next().unwrap().unwrap(), json!({"n": 1}));
        assert!(matches!(
            feed.next(),
            Some(Err(FeedError::DecodeFailure {
                frame: 1,
                source: DecodeError::Json(_)
            }))
        ));
        assert!(feed.next().is_none());
        assert!(feed.next().is_none());
    }

    #[test]
    fn test_receive_timeout_ends_feed() {
        let mut subscriber = subscriber_with(&[]);
        let mut feed = subscriber.subscribe().unwrap();

        let started = Instant::now();
        assert!(matches!(
            feed.next(),
            Some(Err(FeedError::Transport(TransportError::Timeout)))
        ));
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert!(feed.next().is_none());
    }

    #[test]
    fn test_transport_failure_ends_feed() {
        let transport = ScriptedSubscriber::with_messages(&[]);
        transport.fail_next_receive(TransportError::ReceiveFailed("gone".to_string()));
        let mut subscriber = TopicSubscriber::with_transport(transport, options()).unwrap();
        let mut feed = subscriber.subscribe().unwrap();

        assert!(matches!(
            feed.next(),
            Some(Err(FeedError::Transport(TransportError::ReceiveFailed(_))))
        ));
        assert!(feed.next().is_none());
    }

    #[test]
    fn test_interrupted_receive_is_retried() {
        let transport = ScriptedSubscriber::with_messages(&[&[b"ads", br#"{"n":1}"#]]);
        transport.fail_next_receive(TransportError::Interrupted);
        let mut subscriber = TopicSubscriber::with_transport(transport, options()).unwrap();
        let mut feed = subscriber.subscribe().unwrap();

        assert_eq!(feed.next().unwrap().unwrap(), json!({"n": 1}));
    }

    #[test]
    fn test_interrupt_then_stop_ends_feed_cleanly() {
        let transport = ScriptedSubscriber::with_messages(&[]);
        transport.fail_next_receive(TransportError::Interrupted);
        let mut subscriber = TopicSubscriber::with_transport(transport, options()).unwrap();
        let stop = subscriber.stop_handle();

        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            stop.stop();
        });

        let mut feed = subscriber.subscribe().unwrap();
        assert!(feed.next().is_none());
        stopper.join().unwrap();
    }

    #[test]
    fn test_stop_handle_ends_blocking_feed() {
        let transport = ScriptedSubscriber::with_messages(&[]);
        let mut subscriber = TopicSubscriber::with_transport(
            transport,
            SubscriberOptions::new("ads").with_poll_interval(Duration::from_millis(10)),
        )
        .unwrap();
        let stop = subscriber.stop_handle();

        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            stop.stop();
        });

        let mut feed = subscriber.subscribe().unwrap();
        assert!(feed.next().is_none());
        stopper.join().unwrap();
    }

    #[test]
    fn test_stop_handle_also_ends_later_feeds() {
        let mut subscriber = subscriber_with(&[&[b"t", b"1"]]);
        subscriber.stop_handle().stop();
        assert!(subscriber.subscribe().unwrap().next().is_none());
    }

    #[test]
    fn test_close_stops_transport() {
        let subscriber = subscriber_with(&[]);
        let stop = subscriber.stop_handle();
        let running = subscriber.transport().running_flag();

        subscriber.close().unwrap();
        assert!(stop.is_stopped());
        assert!(!running.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_options_from_settings() {
        let settings = SubscriberSettings {
            topic: "Bittrex".to_string(),
            receive_buffer: 1024,
            receive_hwm: 10,
            receive_timeout_ms: 250,
            payload_mode: PayloadMode::All,
            ..Default::default()
        };

        let options = SubscriberOptions::from(&settings);
        assert_eq!(options.default_topic, "Bittrex");
        assert_eq!(options.tuning.receive_buffer, 1024);
        assert_eq!(options.tuning.receive_hwm, 10);
        assert_eq!(options.receive_timeout, Some(Duration::from_millis(250)));
        assert_eq!(options.payload_mode, PayloadMode::All);
        assert_eq!(options.poll_interval, DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn test_new_rejects_empty_ports() {
        let ports: [&str; 0] = [];
        assert!(matches!(
            TopicSubscriber::new(&ports, "ads", "127.0.0.1"),
            Err(FeedError::Transport(TransportError::InvalidConfig(_)))
        ));
    }
}
