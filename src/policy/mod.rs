use serde::{Deserialize, Serialize};

use crate::extractor::ExtractionResult;

/// Process-wide download limits, read-only after startup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PolicyLimits {
    /// Maximum file size in bytes
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    /// Maximum video duration in seconds
    #[serde(default = "default_max_duration")]
    pub max_duration: u64,
}

fn default_max_size() -> u64 {
    50 * 1024 * 1024
}

fn default_max_duration() -> u64 {
    30 * 60
}

impl Default for PolicyLimits {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            max_duration: default_max_duration(),
        }
    }
}

/// First rule violated by an extraction result, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Duration { actual: u64, limit: u64 },
    Size { actual: u64, limit: u64 },
}

/// Check an extraction result against the configured limits.
///
/// Pure: no side effects, never touches the file. Duration is re-checked here
/// even though the adapter pre-checks it before downloading - probed metadata
/// can be imprecise. A duration of zero means unknown and passes. Values
/// equal to the limit pass; only strictly-greater values violate.
pub fn check(result: &ExtractionResult, limits: &PolicyLimits) -> Option<Violation> {
    if result.duration > limits.max_duration {
        return Some(Violation::Duration {
            actual: result.duration,
            limit: limits.max_duration,
        });
    }

    if result.file_size > limits.max_size {
        return Some(Violation::Size {
            actual: result.file_size,
            limit: limits.max_size,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn result_with(duration: u64, file_size: u64) -> ExtractionResult {
        ExtractionResult {
            file_path: PathBuf::from("/tmp/audio.mp3"),
            title: "Test".to_string(),
            duration,
            uploader: "Uploader".to_string(),
            file_size,
        }
    }

    #[test]
    fn test_compliant_result_passes() {
        let limits = PolicyLimits::default();
        assert_eq!(check(&result_with(120, 1024), &limits), None);
    }

    #[test]
    fn test_size_at_limit_passes() {
        let limits = PolicyLimits::default();
        assert_eq!(check(&result_with(120, 50 * 1024 * 1024), &limits), None);
    }

    #[test]
    fn test_size_over_limit_violates() {
        let limits = PolicyLimits::default();
        assert_eq!(
            check(&result_with(120, 50 * 1024 * 1024 + 1), &limits),
            Some(Violation::Size {
                actual: 50 * 1024 * 1024 + 1,
                limit: 50 * 1024 * 1024,
            })
        );
    }

    #[test]
    fn test_duration_over_limit_violates() {
        let limits = PolicyLimits::default();
        assert_eq!(
            check(&result_with(1801, 1024), &limits),
            Some(Violation::Duration {
                actual: 1801,
                limit: 1800,
            })
        );
    }

    #[test]
    fn test_duration_checked_before_size() {
        let limits = PolicyLimits::default();
        let result = result_with(1801, 60 * 1024 * 1024);
        assert!(matches!(
            check(&result, &limits),
            Some(Violation::Duration { .. })
        ));
    }

    #[test]
    fn test_unknown_duration_passes() {
        let limits = PolicyLimits::default();
        assert_eq!(check(&result_with(0, 1024), &limits), None);
    }

    #[test]
    fn test_check_is_pure() {
        let limits = PolicyLimits::default();
        let result = result_with(1801, 1024);
        assert_eq!(check(&result, &limits), check(&result, &limits));
    }
}
