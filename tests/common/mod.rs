#![allow(dead_code)]

use async_trait::async_trait;
use checkout_flow::domain::callback::CallbackPayload;
use checkout_flow::domain::ports::CallbackNotifier;
use checkout_flow::error::{FlowError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the fake backend answers.
#[derive(Clone, Copy, Debug)]
pub enum Reply {
    Status(u16),
    Unreachable,
}

/// A callback notifier that records every request instead of sending it.
#[derive(Clone)]
pub struct RecordingNotifier {
    calls: Arc<Mutex<Vec<(String, CallbackPayload)>>>,
    settled: Arc<AtomicUsize>,
    latency: Duration,
    reply: Reply,
}

impl RecordingNotifier {
    pub fn new(latency: Duration, reply: Reply) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            settled: Arc::new(AtomicUsize::new(0)),
            latency,
            reply,
        }
    }

    pub fn ok() -> Self {
        Self::new(Duration::ZERO, Reply::Status(200))
    }

    pub fn calls(&self) -> Vec<(String, CallbackPayload)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Requests that ran to completion.
    pub fn settled_count(&self) -> usize {
        self.settled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CallbackNotifier for RecordingNotifier {
    async fn notify(&self, endpoint: &str, payload: &CallbackPayload) -> Result<u16> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), payload.clone()));
        tokio::time::sleep(self.latency).await;
        self.settled.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Reply::Status(status) => Ok(status),
            Reply::Unreachable => Err(FlowError::StageError("connection refused".to_string())),
        }
    }
}
