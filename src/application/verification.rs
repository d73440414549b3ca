use super::navigation::{Navigation, PROCESSING_ROUTE};
use super::scope::StageScope;
use crate::config::FlowTimings;
use crate::domain::context::TransactionContext;
use crate::domain::otp::{OtpChallenge, TimerState};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationPhase {
    AwaitingInput,
    Submitting,
}

/// The OTP verification stage.
///
/// Owns a one-second countdown for as long as it is mounted. Every complete
/// code is accepted after a fixed simulated latency.
pub struct VerificationStage {
    ctx: TransactionContext,
    challenge: Arc<watch::Sender<OtpChallenge>>,
    phase: watch::Sender<VerificationPhase>,
    restart: Arc<Notify>,
    verify_latency: Duration,
    scope: StageScope,
}

impl VerificationStage {
    /// Mounts the stage and starts the countdown.
    pub fn mount(ctx: TransactionContext, timings: &FlowTimings) -> Self {
        let (challenge, _) = watch::channel(OtpChallenge::new());
        let challenge = Arc::new(challenge);
        let (phase, _) = watch::channel(VerificationPhase::AwaitingInput);

        let restart = Arc::new(Notify::new());
        let mut scope = StageScope::new();
        let countdown = challenge.clone();
        scope.spawn_restartable(timings.otp_tick, restart.clone(), move || {
            let mut expired_now = false;
            countdown.send_if_modified(|otp| {
                let before = otp.seconds_remaining();
                let state = otp.tick();
                expired_now = before > 0 && state == TimerState::Expired;
                before != otp.seconds_remaining()
            });
            if expired_now {
                debug!("verification code expired, resend available");
            }
            // Keeps running after expiry so a resend restarts the countdown.
            ControlFlow::Continue(())
        });

        info!(method = %ctx.method, bank = ctx.method.bank_name(), "verification stage mounted");
        Self {
            ctx,
            challenge,
            phase,
            restart,
            verify_latency: timings.verify_latency,
            scope,
        }
    }

    /// Current challenge state.
    pub fn challenge(&self) -> OtpChallenge {
        self.challenge.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OtpChallenge> {
        self.challenge.subscribe()
    }

    pub fn phase(&self) -> VerificationPhase {
        *self.phase.borrow()
    }

    /// Applies one edit of the code field.
    pub fn input(&self, raw: &str) {
        self.challenge.send_modify(|otp| otp.enter_code(raw));
    }

    /// Restarts the countdown if the current code has expired. The next tick
    /// comes one full second after the resend.
    pub fn resend(&self) -> bool {
        let mut resent = false;
        self.challenge.send_if_modified(|otp| {
            resent = otp.resend();
            resent
        });
        if resent {
            self.restart.notify_one();
            info!("verification code resent");
        }
        resent
    }

    pub fn can_submit(&self) -> bool {
        self.phase() == VerificationPhase::AwaitingInput && self.challenge.borrow().is_complete()
    }

    /// Submits the current code.
    ///
    /// Returns `None` when submission is disabled (incomplete code or a
    /// submission already in flight). Otherwise waits the simulated latency
    /// and navigates to the processing stage, whatever the digits.
    pub async fn submit(&self) -> Option<Navigation> {
        let complete = self.challenge.borrow().is_complete();
        if !complete {
            return None;
        }
        let entered = self.phase.send_if_modified(|phase| {
            if *phase == VerificationPhase::AwaitingInput {
                *phase = VerificationPhase::Submitting;
                true
            } else {
                false
            }
        });
        if !entered {
            return None;
        }

        debug!(latency_ms = self.verify_latency.as_millis() as u64, "verifying code");
        tokio::time::sleep(self.verify_latency).await;

        info!(method = %self.ctx.method, amount = %self.ctx.amount, "code accepted");
        Some(Navigation::route(PROCESSING_ROUTE, self.ctx.processing_query()))
    }

    /// Tears the stage down, stopping the countdown.
    pub fn unmount(mut self) {
        self.scope.cancel();
    }
}
