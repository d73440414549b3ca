use crate::domain::query::QueryParams;
use std::fmt;

pub const SELECTION_ROUTE: &str = "/payment";
pub const VERIFICATION_ROUTE: &str = "/payment/bank-verification";
pub const PROCESSING_ROUTE: &str = "/payment/processing";

/// Where a stage sends the user next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// In-app route change to another stage.
    Route {
        path: &'static str,
        query: QueryParams,
    },
    /// Full-page navigation leaving the flow. The target is not validated.
    External(String),
}

impl Navigation {
    pub fn route(path: &'static str, query: QueryParams) -> Self {
        Self::Route { path, query }
    }

    pub fn href(&self) -> String {
        match self {
            Self::Route { path, query } if query.is_empty() => path.to_string(),
            Self::Route { path, query } => format!("{path}?{}", query.encode()),
            Self::External(url) => url.clone(),
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Route { .. } => write!(f, "navigate {}", self.href()),
            Self::External(url) => write!(f, "redirect {url}"),
        }
    }
}
