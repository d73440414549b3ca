/// Number of digits in a complete code.
pub const CODE_LENGTH: usize = 6;
/// Lifetime of a code, counted in countdown ticks.
pub const CODE_LIFETIME_SECS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Active,
    Expired,
}

/// The one-time-passcode challenge shown on the verification stage.
///
/// Nothing here knows the "right" code: any complete code is accepted. The
/// countdown only decides when a resend is offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    code: String,
    seconds_remaining: u32,
    resend_eligible: bool,
}

impl Default for OtpChallenge {
    fn default() -> Self {
        Self::new()
    }
}

impl OtpChallenge {
    pub fn new() -> Self {
        Self {
            code: String::new(),
            seconds_remaining: CODE_LIFETIME_SECS,
            resend_eligible: false,
        }
    }

    /// Replaces the code with the digits of `raw`, truncated to six.
    pub fn enter_code(&mut self, raw: &str) {
        self.code = raw
            .chars()
            .filter(char::is_ascii_digit)
            .take(CODE_LENGTH)
            .collect();
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn is_complete(&self) -> bool {
        self.code.len() == CODE_LENGTH
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn resend_eligible(&self) -> bool {
        self.resend_eligible
    }

    pub fn timer_state(&self) -> TimerState {
        if self.seconds_remaining == 0 {
            TimerState::Expired
        } else {
            TimerState::Active
        }
    }

    /// One countdown second. Clamps at zero, where resend becomes available.
    pub fn tick(&mut self) -> TimerState {
        if self.seconds_remaining <= 1 {
            self.seconds_remaining = 0;
            self.resend_eligible = true;
        } else {
            self.seconds_remaining -= 1;
        }
        self.timer_state()
    }

    /// Restarts the countdown. Returns `false` while the current code is
    /// still live.
    pub fn resend(&mut self) -> bool {
        if !self.resend_eligible {
            return false;
        }
        self.seconds_remaining = CODE_LIFETIME_SECS;
        self.resend_eligible = false;
        true
    }

    /// Remaining time as `m:ss`.
    pub fn remaining_display(&self) -> String {
        format!(
            "{}:{:02}",
            self.seconds_remaining / 60,
            self.seconds_remaining % 60
        )
    }
}
