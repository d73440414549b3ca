use crate::domain::callback::CallbackCredentials;
use crate::domain::context::DEFAULT_REDIRECT_URL;
use std::time::Duration;

/// What the processing stage waits for before redirecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RedirectTrigger {
    /// Wait for the callback when a backend is configured, otherwise for the
    /// progress bar.
    #[default]
    Auto,
    /// Always wait for the progress bar plus the grace delay. A callback, if
    /// any, is fire-and-forget.
    Progress,
    /// Redirect as soon as the callback settles. Without a backend this
    /// behaves like `Progress`.
    Callback,
}

impl RedirectTrigger {
    /// Resolves the trigger for one run, given whether a callback is due.
    pub fn waits_for_callback(self, has_backend: bool) -> bool {
        match self {
            RedirectTrigger::Auto | RedirectTrigger::Callback => has_backend,
            RedirectTrigger::Progress => false,
        }
    }
}

/// Timer periods and delays used by the stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowTimings {
    pub otp_tick: Duration,
    pub verify_latency: Duration,
    pub progress_tick: Duration,
    pub step_tick: Duration,
    pub redirect_grace: Duration,
}

impl Default for FlowTimings {
    fn default() -> Self {
        Self {
            otp_tick: Duration::from_secs(1),
            verify_latency: Duration::from_secs(2),
            progress_tick: Duration::from_millis(100),
            step_tick: Duration::from_millis(800),
            redirect_grace: Duration::from_secs(1),
        }
    }
}

impl FlowTimings {
    /// Divides every period by `speed`. A speed of 0 is treated as 1.
    pub fn scaled(self, speed: u32) -> Self {
        let speed = speed.max(1);
        Self {
            otp_tick: self.otp_tick / speed,
            verify_latency: self.verify_latency / speed,
            progress_tick: self.progress_tick / speed,
            step_tick: self.step_tick / speed,
            redirect_grace: self.redirect_grace / speed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlowConfig {
    pub fallback_redirect_url: String,
    pub credentials: CallbackCredentials,
    pub redirect_trigger: RedirectTrigger,
    pub timings: FlowTimings,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            fallback_redirect_url: DEFAULT_REDIRECT_URL.to_string(),
            credentials: CallbackCredentials::default(),
            redirect_trigger: RedirectTrigger::default(),
            timings: FlowTimings::default(),
        }
    }
}
