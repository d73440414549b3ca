use std::ops::ControlFlow;

/// Labels of the processing steps, in display order.
pub const PROCESSING_STEPS: [&str; 5] = [
    "Validating payment details...",
    "Connecting to bank...",
    "Processing transaction...",
    "Verifying payment...",
    "Finalizing transaction...",
];

pub const PROGRESS_STEP: u8 = 2;
pub const PROGRESS_COMPLETE: u8 = 100;

/// Observable state of one processing stage mount.
///
/// Progress and step cursor are cosmetic. `callback_issued` is the
/// write-once guard for the outbound notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingRun {
    progress_percent: u8,
    step_index: usize,
    callback_issued: bool,
}

impl ProcessingRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn current_step(&self) -> &'static str {
        PROCESSING_STEPS[self.step_index]
    }

    pub fn callback_issued(&self) -> bool {
        self.callback_issued
    }

    pub fn is_progress_complete(&self) -> bool {
        self.progress_percent >= PROGRESS_COMPLETE
    }

    /// Advances the progress bar by one step. Breaks once it has reached 100.
    pub fn advance_progress(&mut self) -> ControlFlow<()> {
        self.progress_percent = self
            .progress_percent
            .saturating_add(PROGRESS_STEP)
            .min(PROGRESS_COMPLETE);
        if self.is_progress_complete() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    /// Moves the step cursor forward. Breaks on the last step.
    pub fn advance_step(&mut self) -> ControlFlow<()> {
        let last = PROCESSING_STEPS.len() - 1;
        if self.step_index < last {
            self.step_index += 1;
        }
        if self.step_index == last {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    /// Claims the right to send the callback.
    ///
    /// Returns `true` exactly once per run.
    pub fn claim_callback(&mut self) -> bool {
        if self.callback_issued {
            return false;
        }
        self.callback_issued = true;
        true
    }
}
