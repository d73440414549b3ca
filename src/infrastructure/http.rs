use crate::domain::callback::CallbackPayload;
use crate::domain::ports::CallbackNotifier;
use crate::error::Result;
use async_trait::async_trait;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub total_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            total_timeout: Duration::from_millis(10_000),
            connect_timeout: Duration::from_millis(5_000),
        }
    }
}

/// Sends callbacks over HTTP with `reqwest`.
///
/// Redirects are not followed: the status the backend answers with is what
/// gets reported.
#[derive(Debug, Clone)]
pub struct HttpCallbackNotifier {
    client: reqwest::Client,
}

impl HttpCallbackNotifier {
    pub fn new(options: HttpOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.total_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CallbackNotifier for HttpCallbackNotifier {
    async fn notify(&self, endpoint: &str, payload: &CallbackPayload) -> Result<u16> {
        let start_time = Instant::now();

        // `json` sets `Content-Type: application/json`
        let response = self.client.post(endpoint).json(payload).send().await?;

        let status = response.status().as_u16();
        tracing::debug!(
            endpoint,
            status,
            latency_ms = start_time.elapsed().as_millis() as u64,
            "callback response received"
        );
        Ok(status)
    }
}
