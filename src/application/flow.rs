use super::navigation::Navigation;
use super::processing::ProcessingStage;
use super::selection::SelectionStage;
use super::verification::VerificationStage;
use crate::config::FlowConfig;
use crate::domain::context::TransactionContext;
use crate::domain::method::PaymentMethod;
use crate::domain::ports::{CallbackNotifierRef, SessionStoreBox};
use crate::domain::query::QueryParams;
use crate::error::{FlowError, Result};
use tracing::info;

/// What the simulated user does on each interactive stage.
#[derive(Debug, Clone)]
pub struct FlowInput {
    pub method: PaymentMethod,
    /// Raw keystrokes typed into the code field.
    pub otp: String,
}

/// Every navigation the flow performed, in order. The last one is the
/// terminal redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowOutcome {
    pub navigations: Vec<Navigation>,
}

impl FlowOutcome {
    pub fn redirect(&self) -> Option<&Navigation> {
        self.navigations.last().filter(|nav| nav.is_external())
    }
}

/// Drives one user through selection, verification and processing.
///
/// Each stage is mounted from the query of the previous navigation only and
/// is torn down before the next one mounts.
pub struct CheckoutFlow {
    config: FlowConfig,
    session_store: SessionStoreBox,
    notifier: CallbackNotifierRef,
}

impl CheckoutFlow {
    pub fn new(
        config: FlowConfig,
        session_store: SessionStoreBox,
        notifier: CallbackNotifierRef,
    ) -> Self {
        Self {
            config,
            session_store,
            notifier,
        }
    }

    pub fn session_store(&self) -> &SessionStoreBox {
        &self.session_store
    }

    pub async fn run(&self, entry: QueryParams, input: &FlowInput) -> Result<FlowOutcome> {
        let mut navigations = Vec::with_capacity(3);

        let mut selection = SelectionStage::mount(entry, self.session_store.as_ref()).await?;
        selection.select(input.method);
        let to_verification = selection
            .submit()
            .ok_or_else(|| FlowError::StageError("no payment method selected".to_string()))?;
        navigations.push(self.log(to_verification));

        let verification = VerificationStage::mount(
            self.context_for(navigations.last()),
            &self.config.timings,
        );
        verification.input(&input.otp);
        let to_processing = verification.submit().await.ok_or_else(|| {
            FlowError::StageError(format!(
                "verification code must have 6 digits, got {:?}",
                verification.challenge().code()
            ))
        })?;
        verification.unmount();
        navigations.push(self.log(to_processing));

        let mut processing = ProcessingStage::mount(
            self.context_for(navigations.last()),
            &self.config,
            self.notifier.clone(),
        );
        let redirect = processing.redirected().await.ok_or_else(|| {
            FlowError::StageError("processing ended without redirect".to_string())
        })?;
        processing.unmount();
        navigations.push(self.log(redirect));

        Ok(FlowOutcome { navigations })
    }

    fn context_for(&self, navigation: Option<&Navigation>) -> TransactionContext {
        let query = match navigation {
            Some(Navigation::Route { query, .. }) => query.clone(),
            _ => QueryParams::new(),
        };
        TransactionContext::from_query(&query, &self.config.fallback_redirect_url)
    }

    fn log(&self, navigation: Navigation) -> Navigation {
        info!(href = %navigation.href(), external = navigation.is_external(), "navigation");
        navigation
    }
}
