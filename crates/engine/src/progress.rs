//! Derived classification progress.
//!
//! Progress is a pure function of the effective view, recomputed on demand.
//! Catalogs are header rows (tens of concepts), so nothing is cached.

use serde::Serialize;

/// Snapshot of how far the closing's classification has come.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Concepts in the catalog.
    pub total: usize,
    /// Concepts with an effective category.
    pub classified: usize,
    /// Concepts still unclassified. Always `total - classified`.
    pub pending: usize,
    /// Rounded percentage, 0 to 100. Zero for an empty catalog.
    pub percent: u8,
}

impl Progress {
    pub(crate) fn from_counts(total: usize, classified: usize) -> Self {
        debug_assert!(classified <= total);
        let percent = if total == 0 {
            0
        } else {
            ((classified as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            total,
            classified,
            pending: total - classified,
            percent,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.pending == 0 && self.total > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_identity() {
        let progress = Progress::from_counts(7, 3);
        assert_eq!(progress.classified + progress.pending, progress.total);
        assert_eq!(progress.pending, 4);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(Progress::from_counts(3, 1).percent, 33);
        assert_eq!(Progress::from_counts(3, 2).percent, 67);
        assert_eq!(Progress::from_counts(8, 8).percent, 100);
        assert_eq!(Progress::from_counts(8, 0).percent, 0);
    }

    #[test]
    fn test_empty_catalog() {
        let progress = Progress::from_counts(0, 0);
        assert_eq!(progress.percent, 0);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_is_complete() {
        assert!(Progress::from_counts(4, 4).is_complete());
        assert!(!Progress::from_counts(4, 3).is_complete());
    }
}
