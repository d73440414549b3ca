use super::context::TransactionContext;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

/// Path appended to the caller's backend base URL.
pub const CALLBACK_PATH: &str = "/api/payelu/upi/callback";

/// Builds the callback endpoint, dropping trailing slashes from the base.
pub fn callback_url(backend_url: &str) -> String {
    format!("{}{}", backend_url.trim_end_matches('/'), CALLBACK_PATH)
}

/// Secrets sent in every callback body.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CallbackCredentials {
    pub api_key: String,
    pub security_hash: String,
}

impl CallbackCredentials {
    pub fn new(api_key: impl Into<String>, security_hash: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            security_hash: security_hash.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.api_key.is_empty() && self.security_hash.is_empty()
    }
}

// Keep secrets out of logs.
impl fmt::Debug for CallbackCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackCredentials")
            .field("api_key", &"***")
            .field("security_hash", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallbackStatus {
    Completed,
}

/// JSON body of the callback request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallbackPayload {
    pub api_key: String,
    pub security_hash: String,
    pub transaction_id: String,
    pub reference: String,
    pub status: CallbackStatus,
    pub message: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub updated_at: DateTime<Utc>,
}

fn serialize_timestamp<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl CallbackPayload {
    /// Reports the transaction as completed, stamped with `updated_at`.
    pub fn completed(
        ctx: &TransactionContext,
        credentials: &CallbackCredentials,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            api_key: credentials.api_key.clone(),
            security_hash: credentials.security_hash.clone(),
            transaction_id: ctx.gateway_order_id.clone(),
            reference: ctx.customer_order_id.clone(),
            status: CallbackStatus::Completed,
            message: "Approved".to_string(),
            updated_at,
        }
    }
}

/// How a dispatched callback settled. Only ever logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// The backend answered with a 2xx status.
    Delivered { status: u16 },
    /// The backend answered with any other status.
    Rejected { status: u16 },
    /// No response: connection, timeout or encoding failure.
    Failed { reason: String },
}

impl CallbackOutcome {
    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            Self::Delivered { status }
        } else {
            Self::Rejected { status }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::context::DEFAULT_REDIRECT_URL;
    use crate::domain::query::QueryParams;
    use chrono::TimeZone;

    #[test]
    fn test_callback_url_strips_trailing_slashes() {
        assert_eq!(
            callback_url("https://api.example.com/"),
            "https://api.example.com/api/payelu/upi/callback"
        );
        assert_eq!(
            callback_url("https://api.example.com//"),
            "https://api.example.com/api/payelu/upi/callback"
        );
        assert_eq!(
            callback_url("https://api.example.com/v2"),
            "https://api.example.com/v2/api/payelu/upi/callback"
        );
    }

    #[test]
    fn test_payload_shape() {
        let params = QueryParams::parse("gateway_order_id=GW1&customer_order_id=CUST1");
        let ctx = TransactionContext::from_query(&params, DEFAULT_REDIRECT_URL);
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let payload =
            CallbackPayload::completed(&ctx, &CallbackCredentials::new("key", "hash"), ts);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "api_key": "key",
                "security_hash": "hash",
                "transaction_id": "GW1",
                "reference": "CUST1",
                "status": "COMPLETED",
                "message": "Approved",
                "updated_at": "2024-05-01T12:30:00.000Z",
            })
        );
    }

    #[test]
    fn test_outcome_classification() {
        assert_eq!(
            CallbackOutcome::from_status(204),
            CallbackOutcome::Delivered { status: 204 }
        );
        assert_eq!(
            CallbackOutcome::from_status(500),
            CallbackOutcome::Rejected { status: 500 }
        );
        assert_eq!(
            CallbackOutcome::from_status(302),
            CallbackOutcome::Rejected { status: 302 }
        );
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = CallbackCredentials::new("secret-key", "secret-hash");
        let printed = format!("{creds:?}");
        assert!(!printed.contains("secret"));
    }
}
