use super::method::PaymentMethod;
use super::query::QueryParams;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

pub const METHOD_PARAM: &str = "method";
pub const AMOUNT_PARAM: &str = "amount";
pub const REDIRECT_URL_PARAM: &str = "redirect_url";
pub const BACKEND_URL_PARAM: &str = "backend_url";
pub const GATEWAY_ORDER_ID_PARAM: &str = "gateway_order_id";
pub const CUSTOMER_ORDER_ID_PARAM: &str = "customer_order_id";

/// Redirect target used when the caller supplies none.
pub const DEFAULT_REDIRECT_URL: &str = "http://dubaibiglottery.ae/payelu/check_payment";

/// The amount as the caller sent it.
///
/// The raw text is forwarded untouched between stages; it is only parsed
/// for display and is never validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount(String);

impl Amount {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric value, if the raw text happens to be a decimal.
    pub fn decimal(&self) -> Option<Decimal> {
        Decimal::from_str(&self.0).ok()
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self("0".to_string())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transaction parameters as seen by one stage.
///
/// Rebuilt from the query string on every navigation and never mutated
/// afterwards. Missing or empty parameters fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionContext {
    pub method: PaymentMethod,
    pub amount: Amount,
    pub redirect_url: String,
    pub backend_url: Option<String>,
    pub gateway_order_id: String,
    pub customer_order_id: String,
}

impl TransactionContext {
    /// Builds a context from query parameters.
    ///
    /// # Arguments
    ///
    /// * `params` - The query parameters of the current navigation.
    /// * `fallback_redirect_url` - Used when `redirect_url` is missing or empty.
    pub fn from_query(params: &QueryParams, fallback_redirect_url: &str) -> Self {
        let amount = params
            .get_non_empty(AMOUNT_PARAM)
            .map(Amount::new)
            .unwrap_or_default();
        if amount.decimal().is_none() {
            tracing::debug!(amount = %amount, "amount is not a decimal, forwarding as-is");
        }

        Self {
            method: PaymentMethod::from_query(params.get_non_empty(METHOD_PARAM)),
            amount,
            redirect_url: params
                .get_non_empty(REDIRECT_URL_PARAM)
                .unwrap_or(fallback_redirect_url)
                .to_string(),
            backend_url: params.get_non_empty(BACKEND_URL_PARAM).map(str::to_string),
            gateway_order_id: params
                .get(GATEWAY_ORDER_ID_PARAM)
                .unwrap_or_default()
                .to_string(),
            customer_order_id: params
                .get(CUSTOMER_ORDER_ID_PARAM)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Parameters handed from the verification stage to the processing stage.
    ///
    /// Backend and order parameters are only included when a backend is set,
    /// so the callback-less flow keeps its three-parameter URL.
    pub fn processing_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.append(METHOD_PARAM, self.method.as_str());
        params.append(AMOUNT_PARAM, self.amount.as_str());
        params.append(REDIRECT_URL_PARAM, self.redirect_url.as_str());
        if let Some(backend_url) = &self.backend_url {
            params.append(BACKEND_URL_PARAM, backend_url.as_str());
            params.append(GATEWAY_ORDER_ID_PARAM, self.gateway_order_id.as_str());
            params.append(CUSTOMER_ORDER_ID_PARAM, self.customer_order_id.as_str());
        }
        params
    }
}
