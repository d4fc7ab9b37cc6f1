//! Engine lifecycle state and run results

/// Lifecycle of an [`OverrideEngine`](super::OverrideEngine).
///
/// An engine exists only once configuration succeeded, so the first
/// observable state is `Configured`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    /// Configuration parsed; no run started yet.
    Configured,
    /// A run is in progress.
    Running,
    /// The last run processed every chart.
    Succeeded,
    /// The last run stopped at the first hard error.
    Failed {
        /// Rendered error of the failed run.
        error: String,
    },
}

impl EngineState {
    /// Returns true once a run has finished, successfully or not.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed { .. })
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Charts whose target was rewritten and patched, in order.
    pub patched: Vec<String>,
    /// Charts whose target was not found.
    pub skipped: Vec<String>,
}

impl RunReport {
    /// Returns the number of charts processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.patched.len() + self.skipped.len()
    }
}
