use crate::error::FlowError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The payment method chosen on the selection stage.
///
/// Travels between stages as the `method` query parameter using its
/// kebab-case wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    BankTransfer,
    DigitalWallet,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::CreditCard,
        PaymentMethod::BankTransfer,
        PaymentMethod::DigitalWallet,
    ];

    /// Wire name used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit-card",
            PaymentMethod::BankTransfer => "bank-transfer",
            PaymentMethod::DigitalWallet => "digital-wallet",
        }
    }

    /// Name of the issuing institution shown on the verification and
    /// processing stages.
    pub fn bank_name(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Emirates NBD Bank",
            PaymentMethod::BankTransfer => "ADCB Bank",
            PaymentMethod::DigitalWallet => "Digital Payment Gateway",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit/Debit Card",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::DigitalWallet => "Digital Wallet",
        }
    }

    /// Resolves an optional query value, falling back to the default method
    /// for missing or unrecognised input.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::debug!(method = raw, "unrecognised method, using default");
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| FlowError::UnknownMethod(s.to_string()))
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
