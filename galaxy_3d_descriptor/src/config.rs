/// Tracker configuration

use crate::descriptor::CompatibilityCheck;

/// Configuration for a `DescriptorTracker`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// How per-binding descriptor counts are compared by set compatibility checks
    pub compatibility_check: CompatibilityCheck,

    /// Log every applied write/copy at TRACE severity
    pub trace_updates: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            compatibility_check: CompatibilityCheck::TotalCount,
            trace_updates: false,
        }
    }
}
