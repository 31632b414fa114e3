//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (`thiserror`)
//! - Processing statistics tracking (steps executed, warnings)
//!
//! Hard failures propagate as errors; best-effort steps (image compression,
//! readability scoring) record a warning instead.

mod stats;
mod types;

// Re-export public API
pub use stats::ProcessingStats;
pub use types::{
    CryptoError, HostError, InitializationError, NonceError, PipelineError, StepType,
    WarningType,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_processing_stats_initialization() {
        let stats = ProcessingStats::new();
        for step in StepType::iter() {
            assert_eq!(stats.get_step_count(step), 0);
        }
        for warning in WarningType::iter() {
            assert_eq!(stats.get_warning_count(warning), 0);
        }
    }

    #[test]
    fn test_processing_stats_increment() {
        let stats = ProcessingStats::new();
        stats.increment_step(StepType::MetaGenerated);
        stats.increment_step(StepType::MetaGenerated);
        assert_eq!(stats.get_step_count(StepType::MetaGenerated), 2);

        stats.increment_warning(WarningType::ImageFileMissing);
        assert_eq!(stats.get_warning_count(WarningType::ImageFileMissing), 1);
    }

    #[test]
    fn test_processing_stats_totals() {
        let stats = ProcessingStats::new();
        stats.increment_step(StepType::VersionBackup);
        stats.increment_step(StepType::SchemaInjected);
        stats.increment_warning(WarningType::NoKeywords);

        assert_eq!(stats.total_steps(), 2);
        assert_eq!(stats.total_warnings(), 1);
    }
}
