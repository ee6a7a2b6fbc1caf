// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! ZMQ SUB pattern (client-side publish-subscribe)
//!
//! One SUB socket connected to any number of PUB endpoints. ZMQ fair-queues
//! the incoming streams, so there is no ordering guarantee across endpoints.
//! Connecting is asynchronous: `start` succeeds even when no publisher is up.

use crate::common::{
    MultipartMessage, ReceiveTuning, SubscriberConfig, TransportError, TransportResult,
};
use crate::traits::{Subscriber, Transport};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// ZMQ SUB socket implementation (subscriber)
pub struct ZmqSub {
    context: Arc<zmq::Context>,
    config: SubscriberConfig,
    socket: Mutex<Option<zmq::Socket>>,
    running: Mutex<bool>,
}

impl ZmqSub {
    /// Create a new SUB socket
    pub fn new(context: Arc<zmq::Context>, config: SubscriberConfig) -> TransportResult<Self> {
        config.validate()?;

        Ok(Self {
            context,
            config,
            socket: Mutex::new(None),
            running: Mutex::new(false),
        })
    }

    /// Create with default context
    pub fn with_address(address: impl Into<String>) -> TransportResult<Self> {
        let context = Arc::new(zmq::Context::new());
        Self::new(context, SubscriberConfig::new(address))
    }

    /// Create with default context, one `tcp://{host}:{port}` endpoint per port
    pub fn with_ports<S: AsRef<str>>(host: &str, ports: &[S]) -> TransportResult<Self> {
        let context = Arc::new(zmq::Context::new());
        Self::new(context, SubscriberConfig::from_ports(host, ports)?)
    }

    /// Endpoints this socket connects to
    pub fn endpoints(&self) -> &[String] {
        &self.config.endpoints
    }

    fn with_socket<T>(
        &self,
        f: impl FnOnce(&zmq::Socket) -> TransportResult<T>,
    ) -> TransportResult<T> {
        let sock_guard = self.socket.lock();
        let sock = sock_guard.as_ref().ok_or(TransportError::NotRunning)?;
        f(sock)
    }
}

impl Transport for ZmqSub {
    fn start(&mut self) -> TransportResult<()> {
        if *self.running.lock() {
            return Err(TransportError::AlreadyRunning);
        }

        let socket = self
            .context
            .socket(zmq::SUB)
            .map_err(|e| TransportError::InitializationFailed(e.to_string()))?;

        // Close without waiting on queued subscription frames
        socket.set_linger(0)?;

        for endpoint in &self.config.endpoints {
            socket
                .connect(endpoint)
                .map_err(|e| TransportError::ConnectFailed {
                    endpoint: endpoint.clone(),
                    reason: e.to_string(),
                })?;
            debug!("[ZMQ-SUB] Connecting to {}", endpoint);
        }

        *self.socket.lock() = Some(socket);
        *self.running.lock() = true;

        info!(
            "[ZMQ-SUB] Connected to {} endpoint(s): {}",
            self.config.endpoints.len(),
            self.config.endpoints.join(", ")
        );

        Ok(())
    }

    fn stop(&mut self) -> TransportResult<()> {
        *self.running.lock() = false;
        *self.socket.lock() = None;
        Ok(())
    }

    fn is_running(&self) -> bool {
        *self.running.lock()
    }

    fn transport_type(&self) -> &str {
        "zmq-sub"
    }
}

impl Subscriber for ZmqSub {
    fn subscribe(&mut self, topic: &[u8]) -> TransportResult<()> {
        self.with_socket(|sock| {
            sock.set_subscribe(topic)?;
            debug!(
                "[ZMQ-SUB] Subscribed to '{}'",
                String::from_utf8_lossy(topic)
            );
            Ok(())
        })
    }

    fn unsubscribe(&mut self, topic: &[u8]) -> TransportResult<()> {
        self.with_socket(|sock| {
            sock.set_unsubscribe(topic)?;
            Ok(())
        })
    }

    fn apply_receive_tuning(&mut self, tuning: &ReceiveTuning) -> TransportResult<()> {
        self.with_socket(|sock| {
            sock.set_rcvbuf(tuning.receive_buffer)?;
            sock.set_rcvhwm(tuning.receive_hwm)?;
            debug!(
                "[ZMQ-SUB] rcvbuf={} rcvhwm={}",
                tuning.receive_buffer, tuning.receive_hwm
            );
            Ok(())
        })
    }

    fn receive_multipart(&self) -> TransportResult<MultipartMessage> {
        self.receive_multipart_timeout(0) // 0 = blocking
    }

    fn receive_multipart_timeout(&self, timeout_ms: u64) -> TransportResult<MultipartMessage> {
        self.with_socket(|sock| {
            // Poll for messages if timeout specified. A signal surfaces as
            // `Interrupted` (EINTR) so callers can check for shutdown and retry.
            if timeout_ms > 0 {
                let poll_items = &mut [sock.as_poll_item(zmq::POLLIN)];
                zmq::poll(poll_items, timeout_ms as i64)?;

                if !poll_items[0].is_readable() {
                    return Err(TransportError::Timeout);
                }
            }

            let parts = sock.recv_multipart(0).map_err(|e| match e {
                zmq::Error::EINTR => TransportError::Interrupted,
                e => TransportError::ReceiveFailed(e.to_string()),
            })?;

            Ok(MultipartMessage::from(parts))
        })
    }
}
