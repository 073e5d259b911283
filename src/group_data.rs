/// Data structures for Focus Blocker
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default window given to a freshly created group
pub const DEFAULT_BLOCK_START: &str = "09:00";
pub const DEFAULT_BLOCK_END: &str = "17:00";

/// A single blocking window within a day.
///
/// `enabled` is optional for compatibility with blobs written before the
/// flag existed; an absent flag means the block is active.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeBlock {
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl TimeBlock {
    pub fn new(start: &str, end: &str) -> TimeBlock {
        TimeBlock {
            start: start.to_string(),
            end: end.to_string(),
            enabled: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// A named bundle of target URLs plus the windows during which they block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionGroup {
    pub name: String,
    pub urls: Vec<String>,
    pub time_blocks: Vec<TimeBlock>,
    pub enabled: bool,
}

impl SectionGroup {
    /// New group with the default 09:00-17:00 window, enabled
    pub fn new(name: &str) -> SectionGroup {
        SectionGroup {
            name: name.to_string(),
            urls: Vec::new(),
            time_blocks: vec![TimeBlock::new(DEFAULT_BLOCK_START, DEFAULT_BLOCK_END)],
            enabled: true,
        }
    }
}

/// Group mapping keyed by name. Iteration order is insertion order, which
/// the blocking decision depends on (first match wins).
pub type SectionGroups = IndexMap<String, SectionGroup>;

/// Verdict of a blocking check, with attribution when blocked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockCheckResult {
    pub should_block: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_url: Option<String>,
}

impl BlockCheckResult {
    pub fn no_block() -> BlockCheckResult {
        BlockCheckResult {
            should_block: false,
            group_name: None,
            current_time: None,
            matched_url: None,
        }
    }

    pub fn blocked(group_name: &str, current_time: &str, matched_url: &str) -> BlockCheckResult {
        BlockCheckResult {
            should_block: true,
            group_name: Some(group_name.to_string()),
            current_time: Some(current_time.to_string()),
            matched_url: Some(matched_url.to_string()),
        }
    }
}
