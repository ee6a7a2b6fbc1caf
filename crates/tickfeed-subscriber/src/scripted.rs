// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! In-memory `Subscriber` that replays a fixed script of messages

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tickfeed_transports::prelude::*;

pub(crate) struct ScriptedSubscriber {
    inbox: Mutex<VecDeque<MultipartMessage>>,
    next_error: Mutex<Option<TransportError>>,
    subscriptions: Vec<String>,
    tuning: Option<ReceiveTuning>,
    running: Arc<AtomicBool>,
}

impl ScriptedSubscriber {
    pub(crate) fn with_messages(messages: &[&[&[u8]]]) -> Self {
        let inbox = messages
            .iter()
            .map(|frames| MultipartMessage::from(frames.iter().map(|f| f.to_vec()).collect::<Vec<_>>()))
            .collect();

        Self {
            inbox: Mutex::new(inbox),
            next_error: Mutex::new(None),
            subscriptions: Vec::new(),
            tuning: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn fail_next_receive(&self, error: TransportError) {
        *self.next_error.lock() = Some(error);
    }

    pub(crate) fn subscriptions(&self) -> Vec<&str> {
        self.subscriptions.iter().map(String::as_str).collect()
    }

    pub(crate) fn tuning(&self) -> Option<ReceiveTuning> {
        self.tuning
    }

    pub(crate) fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }
}

impl Transport for ScriptedSubscriber {
    fn start(&mut self) -> TransportResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(TransportError::AlreadyRunning);
        }
        Ok(())
    }

    fn stop(&mut self) -> TransportResult<()> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn transport_type(&self) -> &str {
        "scripted"
    }
}

impl Subscriber for ScriptedSubscriber {
    fn subscribe(&mut self, topic: &[u8]) -> TransportResult<()> {
        self.subscriptions
            .push(String::from_utf8_lossy(topic).into_owned());
        Ok(())
    }

    fn unsubscribe(&mut self, topic: &[u8]) -> TransportResult<()> {
        let topic = String::from_utf8_lossy(topic);
        if let Some(pos) = self.subscriptions.iter().position(|t| *t == topic) {
            self.subscriptions.remove(pos);
        }
        Ok(())
    }

    fn apply_receive_tuning(&mut self, tuning: &ReceiveTuning) -> TransportResult<()> {
        self.tuning = Some(*tuning);
        Ok(())
    }

    fn receive_multipart(&self) -> TransportResult<MultipartMessage> {
        loop {
            match self.receive_multipart_timeout(10) {
                Err(TransportError::Timeout) => continue,
                other => return other,
            }
        }
    }

    fn receive_multipart_timeout(&self, timeout_ms: u64) -> TransportResult<MultipartMessage> {
        if !self.is_running() {
            return Err(TransportError::NotRunning);
        }
        if let Some(error) = self.next_error.lock().take() {
            return Err(error);
        }
        if let Some(message) = self.inbox.lock().pop_front() {
            return Ok(message);
        }
        thread::sleep(Duration::from_millis(timeout_ms));
        Err(TransportError::Timeout)
    }
}
