//! Processing statistics tracking.
//!
//! Counts how often each pipeline step ran and each warning occurred. Counters are
//! atomic so one tracker can be shared (`Arc`) between the components registered
//! by [`SeoPlugin`](crate::SeoPlugin).

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{StepType, WarningType};

/// Processing statistics tracker.
///
/// All step and warning types are initialized to zero on creation.
#[derive(Debug)]
pub struct ProcessingStats {
    steps: HashMap<StepType, AtomicUsize>,
    warnings: HashMap<WarningType, AtomicUsize>,
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStats {
    /// Creates a tracker with every counter at zero.
    pub fn new() -> Self {
        let mut steps = HashMap::new();
        for step in StepType::iter() {
            steps.insert(step, AtomicUsize::new(0));
        }

        let mut warnings = HashMap::new();
        for warning in WarningType::iter() {
            warnings.insert(warning, AtomicUsize::new(0));
        }

        ProcessingStats { steps, warnings }
    }

    /// Increment a step counter.
    pub fn increment_step(&self, step: StepType) {
        if let Some(counter) = self.steps.get(&step) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment step counter for {:?} which is not in the map.",
                step
            );
        }
    }

    /// Increment a warning counter.
    pub fn increment_warning(&self, warning: WarningType) {
        if let Some(counter) = self.warnings.get(&warning) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment warning counter for {:?} which is not in the map.",
                warning
            );
        }
    }

    /// Get the count for a step type.
    pub fn get_step_count(&self, step: StepType) -> usize {
        self.steps
            .get(&step)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get the count for a warning type.
    pub fn get_warning_count(&self, warning: WarningType) -> usize {
        self.warnings
            .get(&warning)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get total step count across all step types.
    pub fn total_steps(&self) -> usize {
        StepType::iter().map(|s| self.get_step_count(s)).sum()
    }

    /// Get total warning count across all warning types.
    pub fn total_warnings(&self) -> usize {
        WarningType::iter().map(|w| self.get_warning_count(w)).sum()
    }

    /// Logs non-zero counters, steps first.
    pub fn log_summary(&self) {
        for step in StepType::iter() {
            let count = self.get_step_count(step);
            if count > 0 {
                log::info!("{}: {}", step, count);
            }
        }
        for warning in WarningType::iter() {
            let count = self.get_warning_count(warning);
            if count > 0 {
                log::warn!("{}: {}", warning.as_str(), count);
            }
        }
    }
}
