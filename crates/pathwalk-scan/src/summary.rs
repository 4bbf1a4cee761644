//! Walk statistics and collected warnings.

use std::time::Duration;

use serde::Serialize;

use pathwalk_core::WalkWarning;

/// Warnings kept in [`WalkSummary::warnings`]; later ones are only counted.
pub const MAX_STORED_WARNINGS: usize = 1000;

/// Counters and warnings gathered over one run of the walker.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WalkSummary {
    /// Directories successfully opened.
    pub dirs_opened: u64,
    /// Entries handed to the predicate.
    pub entries_examined: u64,
    /// Pathnames written to the output.
    pub matches: u64,
    /// Roots that were traversed.
    pub roots_walked: u64,
    /// Roots skipped because their device could not be determined.
    pub roots_skipped: u64,
    /// The first [`MAX_STORED_WARNINGS`] non-fatal problems, in order.
    pub warnings: Vec<WalkWarning>,
    /// Every warning reported, stored or not.
    pub warnings_total: u64,
    /// Wall time of the last [`crate::Walker::run`].
    pub elapsed: Duration,
}

impl WalkSummary {
    /// Create empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a warning on stderr (through `tracing`) and keep it while
    /// there is room.
    pub fn record_warning(&mut self, warning: WalkWarning) {
        tracing::warn!(kind = ?warning.kind, "{warning}");
        self.warnings_total += 1;
        if self.warnings.len() < MAX_STORED_WARNINGS {
            self.warnings.push(warning);
        }
    }

    /// True when at least one root was given and every one was skipped.
    pub fn all_roots_failed(&self) -> bool {
        self.roots_skipped > 0 && self.roots_walked == 0
    }

    /// Number of warnings recorded.
    pub fn warning_count(&self) -> u64 {
        self.warnings_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathwalk_core::WarningKind;

    #[test]
    fn test_all_roots_failed() {
        let mut summary = WalkSummary::new();
        assert!(!summary.all_roots_failed());

        summary.roots_skipped = 2;
        assert!(summary.all_roots_failed());

        summary.roots_walked = 1;
        assert!(!summary.all_roots_failed());
    }

    #[test]
    fn test_record_warning() {
        let mut summary = WalkSummary::new();
        summary.record_warning(WalkWarning::path_too_long("/deep"));
        assert_eq!(summary.warning_count(), 1);
        assert_eq!(summary.warnings[0].kind, WarningKind::PathTooLong);
    }

    #[test]
    fn test_stored_warnings_are_capped() {
        let mut summary = WalkSummary::new();
        for i in 0..=MAX_STORED_WARNINGS {
            summary.record_warning(WalkWarning::path_too_long(format!("/deep/{i}")));
        }
        assert_eq!(summary.warning_count(), MAX_STORED_WARNINGS as u64 + 1);
        assert_eq!(summary.warnings.len(), MAX_STORED_WARNINGS);
        assert_eq!(summary.warnings[0].path, std::path::PathBuf::from("/deep/0"));
    }
}
