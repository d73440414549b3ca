use super::navigation::Navigation;
use super::scope::StageScope;
use crate::config::FlowConfig;
use crate::domain::callback::{CallbackCredentials, CallbackOutcome, CallbackPayload, callback_url};
use crate::domain::context::TransactionContext;
use crate::domain::ports::CallbackNotifierRef;
use crate::domain::processing::ProcessingRun;
use chrono::Utc;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Sends the completion callback at most once per processing run.
struct CallbackDispatch {
    run: Arc<watch::Sender<ProcessingRun>>,
    notifier: CallbackNotifierRef,
    endpoint: String,
    ctx: TransactionContext,
    credentials: CallbackCredentials,
}

impl CallbackDispatch {
    /// Claims the run's callback guard and, if this call won it, starts the
    /// request on a detached task.
    ///
    /// The guard is set before the request begins, so re-triggering while the
    /// first request is in flight is a no-op.
    fn trigger(&self) -> Option<JoinHandle<CallbackOutcome>> {
        let mut claimed = false;
        self.run.send_if_modified(|run| {
            claimed = run.claim_callback();
            claimed
        });
        if !claimed {
            debug!(endpoint = %self.endpoint, "callback already issued, skipping");
            return None;
        }

        let payload = CallbackPayload::completed(&self.ctx, &self.credentials, Utc::now());
        let notifier = self.notifier.clone();
        let endpoint = self.endpoint.clone();
        info!(
            endpoint = %endpoint,
            transaction_id = %payload.transaction_id,
            reference = %payload.reference,
            "dispatching payment callback"
        );

        // Not part of the stage scope: once sent, the request runs to
        // completion even if the stage is torn down.
        Some(tokio::spawn(async move {
            let outcome = match notifier.notify(&endpoint, &payload).await {
                Ok(status) => CallbackOutcome::from_status(status),
                Err(e) => CallbackOutcome::Failed {
                    reason: e.to_string(),
                },
            };
            match &outcome {
                CallbackOutcome::Delivered { status } => {
                    info!(endpoint = %endpoint, status, "payment callback delivered")
                }
                CallbackOutcome::Rejected { status } => {
                    warn!(endpoint = %endpoint, status, "payment callback rejected")
                }
                CallbackOutcome::Failed { reason } => {
                    warn!(endpoint = %endpoint, reason = %reason, "payment callback failed")
                }
            }
            outcome
        }))
    }
}

/// The processing stage.
///
/// Mounting starts two cosmetic timers (progress and step cursor), fires the
/// callback when a backend is set, and schedules the terminal redirect. The
/// redirect waits either for the callback to settle or for the progress bar
/// plus a grace delay, depending on the configured trigger.
pub struct ProcessingStage {
    ctx: TransactionContext,
    run: Arc<watch::Sender<ProcessingRun>>,
    dispatch: Option<CallbackDispatch>,
    redirect_rx: Option<oneshot::Receiver<Navigation>>,
    scope: StageScope,
}

impl ProcessingStage {
    /// Mounts the stage.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Parameters of the processing navigation.
    /// * `config` - Timings, credentials and redirect trigger.
    /// * `notifier` - Used only when `ctx.backend_url` is set.
    pub fn mount(
        ctx: TransactionContext,
        config: &FlowConfig,
        notifier: CallbackNotifierRef,
    ) -> Self {
        let timings = config.timings;
        let (run, _) = watch::channel(ProcessingRun::new());
        let run = Arc::new(run);
        let mut scope = StageScope::new();

        let progress = run.clone();
        scope.spawn_periodic(timings.progress_tick, move || {
            let mut flow = ControlFlow::Continue(());
            progress.send_modify(|run| flow = run.advance_progress());
            flow
        });

        let steps = run.clone();
        scope.spawn_periodic(timings.step_tick, move || {
            let mut flow = ControlFlow::Continue(());
            steps.send_modify(|run| flow = run.advance_step());
            flow
        });

        let dispatch = ctx.backend_url.as_deref().map(|backend_url| {
            if config.credentials.is_empty() {
                warn!("callback credentials are not configured, sending empty values");
            }
            CallbackDispatch {
                run: run.clone(),
                notifier,
                endpoint: callback_url(backend_url),
                ctx: ctx.clone(),
                credentials: config.credentials.clone(),
            }
        });
        let callback = dispatch.as_ref().and_then(CallbackDispatch::trigger);

        let (redirect_tx, redirect_rx) = oneshot::channel();
        let target = Navigation::External(ctx.redirect_url.clone());
        let waits_for_callback = config
            .redirect_trigger
            .waits_for_callback(ctx.backend_url.is_some());

        if waits_for_callback && let Some(callback) = callback {
            scope.spawn(async move {
                // Success or failure, the redirect goes ahead once settled.
                let _ = callback.await;
                debug!("callback settled, redirecting");
                let _ = redirect_tx.send(target);
            });
        } else {
            let mut progress_rx = run.subscribe();
            let grace = timings.redirect_grace;
            scope.spawn(async move {
                let _ = progress_rx.wait_for(ProcessingRun::is_progress_complete).await;
                debug!("progress complete, redirecting after grace period");
                tokio::time::sleep(grace).await;
                let _ = redirect_tx.send(target);
            });
        }

        info!(
            method = %ctx.method,
            amount = %ctx.amount,
            callback = ctx.backend_url.is_some(),
            waits_for_callback,
            "processing stage mounted"
        );
        Self {
            ctx,
            run,
            dispatch,
            redirect_rx: Some(redirect_rx),
            scope,
        }
    }

    /// Current state of the run.
    pub fn run(&self) -> ProcessingRun {
        self.run.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProcessingRun> {
        self.run.subscribe()
    }

    /// Re-runs the callback effect. Returns `true` only if a request was
    /// actually sent, which never happens after the first one.
    pub fn trigger_callback(&self) -> bool {
        self.dispatch
            .as_ref()
            .and_then(CallbackDispatch::trigger)
            .is_some()
    }

    /// Waits for the terminal redirect.
    ///
    /// Returns `None` if the stage was torn down first or the redirect was
    /// already taken.
    pub async fn redirected(&mut self) -> Option<Navigation> {
        let redirect_rx = self.redirect_rx.take()?;
        let navigation = redirect_rx.await.ok()?;
        info!(redirect_url = %self.ctx.redirect_url, "redirecting");
        Some(navigation)
    }

    /// Tears the stage down, cancelling both timers and the pending redirect.
    pub fn unmount(mut self) {
        self.scope.cancel();
    }
}
