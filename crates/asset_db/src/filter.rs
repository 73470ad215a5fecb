use serde::{Deserialize, Serialize};

use crate::AssetId;

/// Path patterns that take an asset out of scope for indexing and browsing
/// (tool-internal folders, test-only folders, source files).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionFilter {
    /// Excluded when the path contains any of these
    pub fragments: Vec<String>,
    /// Excluded when the path ends with any of these
    pub suffixes: Vec<String>,
}

impl ExclusionFilter {
    pub fn new(fragments: Vec<String>, suffixes: Vec<String>) -> Self {
        Self { fragments, suffixes }
    }

    /// Filter that lets everything through
    pub fn none() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn is_excluded(&self, path: &AssetId) -> bool {
        let path = path.as_str();
        self.fragments.iter().any(|f| path.contains(f.as_str()))
            || self.suffixes.iter().any(|s| path.ends_with(s.as_str()))
    }
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::new(
            vec!["/Editor/".to_string(), "/Tests/".to_string()],
            vec![".cs".to_string()],
        )
    }
}
