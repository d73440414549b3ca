use super::navigation::{Navigation, VERIFICATION_ROUTE};
use crate::domain::context::METHOD_PARAM;
use crate::domain::method::PaymentMethod;
use crate::domain::ports::SessionStore;
use crate::domain::query::QueryParams;
use crate::error::Result;
use tracing::{debug, info};

/// Session key holding the snapshot of the entry parameters.
pub const SESSION_SNAPSHOT_KEY: &str = "paymentData";

/// The method-selection stage.
///
/// On mount it snapshots the incoming parameters into the session store.
/// Submitting is only possible once a method has been chosen.
#[derive(Debug)]
pub struct SelectionStage {
    params: QueryParams,
    selected: Option<PaymentMethod>,
}

impl SelectionStage {
    /// Mounts the stage, overwriting the session snapshot with `params`.
    pub async fn mount(params: QueryParams, store: &dyn SessionStore) -> Result<Self> {
        let snapshot = serde_json::to_string(&params.to_snapshot())?;
        store.put(SESSION_SNAPSHOT_KEY, snapshot).await?;
        debug!(params = params.len(), "session snapshot written");

        Ok(Self {
            params,
            selected: None,
        })
    }

    pub fn select(&mut self, method: PaymentMethod) {
        self.selected = Some(method);
    }

    pub fn selected(&self) -> Option<PaymentMethod> {
        self.selected
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some()
    }

    /// Navigation to the verification stage, or `None` while no method is
    /// chosen.
    ///
    /// The chosen method replaces any incoming `method`; all other
    /// parameters ride along unchanged.
    pub fn submit(&self) -> Option<Navigation> {
        let method = self.selected?;
        let mut query = self.params.clone();
        query.set(METHOD_PARAM, method.as_str());
        info!(%method, label = method.label(), "payment method selected");
        Some(Navigation::route(VERIFICATION_ROUTE, query))
    }
}
