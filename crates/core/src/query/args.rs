//! Per-query arguments understood by every exclusion filter.

use serde::{Deserialize, Serialize};

/// Arguments a listing call passes down to the exclusion filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryArgs {
    /// `Some(false)` skips every exclusion filter.
    #[serde(default)]
    pub moderation_query: Option<bool>,
    /// Member the listing is rendered for; `None` for anonymous visitors.
    #[serde(default)]
    pub viewer_id: Option<i64>,
}

impl QueryArgs {
    /// Arguments for a lookup that must not be filtered, such as the
    /// sub-queries that compute hidden ID sets.
    #[must_use]
    pub const fn unmoderated() -> Self {
        Self {
            moderation_query: Some(false),
            viewer_id: None,
        }
    }

    #[must_use]
    pub const fn for_viewer(viewer_id: i64) -> Self {
        Self {
            moderation_query: None,
            viewer_id: Some(viewer_id),
        }
    }

    #[must_use]
    pub const fn bypasses_moderation(&self) -> bool {
        matches!(self.moderation_query, Some(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_explicit_false_bypasses() {
        assert!(!QueryArgs::default().bypasses_moderation());
        assert!(
            !QueryArgs {
                moderation_query: Some(true),
                viewer_id: None
            }
            .bypasses_moderation()
        );
        assert!(QueryArgs::unmoderated().bypasses_moderation());
        assert!(!QueryArgs::for_viewer(3).bypasses_moderation());
    }
}
