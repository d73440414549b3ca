use super::callback::CallbackPayload;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Session-scoped key-value storage.
///
/// The selection stage writes a snapshot here. No stage of the flow reads it
/// back; `get` exists for inspection only.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: String) -> Result<()>;
    async fn get(&self, key: &str) -> Result<Option<String>>;
}

/// Delivers the completion callback to the caller's backend.
#[async_trait]
pub trait CallbackNotifier: Send + Sync {
    /// POSTs `payload` to `endpoint` and returns the HTTP status code.
    async fn notify(&self, endpoint: &str, payload: &CallbackPayload) -> Result<u16>;
}

pub type SessionStoreBox = Box<dyn SessionStore>;
pub type CallbackNotifierRef = Arc<dyn CallbackNotifier>;
