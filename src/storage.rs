/// Storage serialization and group mutations for chrome.storage.local
///
/// The whole configuration lives under one key as a JSON blob. Mutations
/// here are pure and in-memory; the UI layer persists the updated blob over
/// the JS bridge (read-modify-write, last write wins).
use serde::{Deserialize, Serialize};

use crate::group_data::{SectionGroup, SectionGroups, TimeBlock};
use crate::time_utils::{
    is_time_overlapping, is_valid_time_format, is_valid_time_range, sort_time_blocks_by_start,
};

/// Storage key holding the full group mapping
pub const STORAGE_KEY: &str = "sectionGroups";

/// Root storage structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageData {
    #[serde(default)]
    pub section_groups: SectionGroups,
}

impl StorageData {
    pub fn new() -> Self {
        StorageData {
            section_groups: SectionGroups::new(),
        }
    }

    /// Create a new group seeded with the default time block
    pub fn create_group(&mut self, name: &str) -> Result<(), String> {
        if name.trim().is_empty() {
            return Err("Group name must not be empty".to_string());
        }
        if self.section_groups.contains_key(name) {
            return Err(format!("Group '{}' already exists", name));
        }

        self.section_groups
            .insert(name.to_string(), SectionGroup::new(name));
        Ok(())
    }

    pub fn save_group(&mut self, name: &str, group: SectionGroup) {
        self.section_groups.insert(name.to_string(), group);
    }

    pub fn delete_group(&mut self, name: &str) -> bool {
        // shift_remove keeps the remaining insertion order intact
        self.section_groups.shift_remove(name).is_some()
    }

    pub fn get_group(&self, name: &str) -> Option<&SectionGroup> {
        self.section_groups.get(name)
    }

    /// Rename as insert-under-new-key plus delete-old. Not atomic: a
    /// persistence failure between the two steps can leave both keys.
    pub fn rename_group(&mut self, old_name: &str, new_name: &str) -> Result<(), String> {
        if old_name == new_name {
            return Ok(());
        }
        if self.section_groups.contains_key(new_name) {
            return Err(format!("Group '{}' already exists", new_name));
        }

        let mut group = self
            .section_groups
            .get(old_name)
            .cloned()
            .ok_or_else(|| format!("Group '{}' not found", old_name))?;
        group.name = new_name.to_string();

        self.section_groups.insert(new_name.to_string(), group);
        self.section_groups.shift_remove(old_name);
        Ok(())
    }

    /// Flip a group's enabled flag, returning the new state
    pub fn toggle_group(&mut self, name: &str) -> Result<bool, String> {
        let group = self
            .section_groups
            .get_mut(name)
            .ok_or_else(|| format!("Group '{}' not found", name))?;
        group.enabled = !group.enabled;
        Ok(group.enabled)
    }

    pub fn add_url_to_group(&mut self, name: &str, url: &str) -> Result<(), String> {
        if url.trim().is_empty() {
            return Err("URL must not be empty".to_string());
        }

        let group = self
            .section_groups
            .get_mut(name)
            .ok_or_else(|| format!("Group '{}' not found", name))?;

        if group.urls.iter().any(|u| u == url) {
            return Err("URL is already registered".to_string());
        }

        group.urls.push(url.to_string());
        Ok(())
    }

    pub fn remove_url_from_group(&mut self, name: &str, url: &str) -> Result<(), String> {
        let group = self
            .section_groups
            .get_mut(name)
            .ok_or_else(|| format!("Group '{}' not found", name))?;

        group.urls.retain(|u| u != url);
        Ok(())
    }

    /// Add a time block after the interactive validation chain: format,
    /// strict start < end (overnight rejected here), then overlap against
    /// every existing block. The block list stays sorted by start.
    pub fn add_time_block(&mut self, name: &str, start: &str, end: &str) -> Result<(), String> {
        if !is_valid_time_format(start) || !is_valid_time_format(end) {
            return Err("Invalid time format, expected HH:MM".to_string());
        }
        if !is_valid_time_range(start, end) {
            return Err("End time must be after start time".to_string());
        }

        let group = self
            .section_groups
            .get_mut(name)
            .ok_or_else(|| format!("Group '{}' not found", name))?;

        let overlaps = group
            .time_blocks
            .iter()
            .any(|block| is_time_overlapping(start, end, &block.start, &block.end));
        if overlaps {
            return Err("Time block overlaps an existing one".to_string());
        }

        group.time_blocks.push(TimeBlock::new(start, end));
        group.time_blocks = sort_time_blocks_by_start(&group.time_blocks);
        Ok(())
    }

    pub fn remove_time_block(&mut self, name: &str, index: usize) -> Result<(), String> {
        let group = self
            .section_groups
            .get_mut(name)
            .ok_or_else(|| format!("Group '{}' not found", name))?;

        if index >= group.time_blocks.len() {
            return Err(format!("No time block at index {}", index));
        }

        group.time_blocks.remove(index);
        Ok(())
    }

    /// Flip one block's enabled flag, returning the new state
    pub fn toggle_time_block(&mut self, name: &str, index: usize) -> Result<bool, String> {
        let group = self
            .section_groups
            .get_mut(name)
            .ok_or_else(|| format!("Group '{}' not found", name))?;

        let block = group
            .time_blocks
            .get_mut(index)
            .ok_or_else(|| format!("No time block at index {}", index))?;

        let enabled = !block.is_enabled();
        block.enabled = Some(enabled);
        Ok(enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_with_group(name: &str) -> StorageData {
        let mut storage = StorageData::new();
        storage.create_group(name).unwrap();
        storage
    }

    #[test]
    fn test_create_group() {
        let mut storage = StorageData::new();
        storage.create_group("SNS").unwrap();

        let group = storage.get_group("SNS").unwrap();
        assert_eq!(group.name, "SNS");
        assert_eq!(group.time_blocks.len(), 1);
        assert!(group.enabled);
    }

    #[test]
    fn test_create_group_rejects_duplicate() {
        let mut storage = storage_with_group("SNS");
        assert!(storage.create_group("SNS").is_err());
        assert!(storage.create_group("  ").is_err());
    }

    #[test]
    fn test_delete_group() {
        let mut storage = storage_with_group("SNS");

        assert!(storage.delete_group("SNS"));
        assert!(!storage.delete_group("SNS"));
        assert!(storage.get_group("SNS").is_none());
    }

    #[test]
    fn test_rename_group() {
        let mut storage = storage_with_group("SNS");
        storage.add_url_to_group("SNS", "twitter.com").unwrap();

        storage.rename_group("SNS", "Social").unwrap();

        assert!(storage.get_group("SNS").is_none());
        let renamed = storage.get_group("Social").unwrap();
        assert_eq!(renamed.name, "Social");
        assert_eq!(renamed.urls, ["twitter.com"]);
    }

    #[test]
    fn test_rename_group_rejects_collision() {
        let mut storage = storage_with_group("SNS");
        storage.create_group("Video").unwrap();

        assert!(storage.rename_group("SNS", "Video").is_err());
        assert!(storage.rename_group("Missing", "Other").is_err());
        // Renaming onto itself is a no-op
        assert!(storage.rename_group("SNS", "SNS").is_ok());
    }

    #[test]
    fn test_rename_group_moves_to_end_of_listing() {
        let mut storage = storage_with_group("SNS");
        storage.create_group("Video").unwrap();
        storage.create_group("News").unwrap();

        // Insert-then-delete lands the renamed group at the end, which is
        // where the popup group list shows it afterwards
        storage.rename_group("SNS", "Social").unwrap();
        let names: Vec<&String> = storage.section_groups.keys().collect();
        assert_eq!(names, ["Video", "News", "Social"]);
    }

    #[test]
    fn test_toggle_group() {
        let mut storage = storage_with_group("SNS");

        assert_eq!(storage.toggle_group("SNS"), Ok(false));
        assert_eq!(storage.toggle_group("SNS"), Ok(true));
        assert!(storage.toggle_group("Missing").is_err());
    }

    #[test]
    fn test_add_url_to_group() {
        let mut storage = storage_with_group("SNS");

        storage.add_url_to_group("SNS", "twitter.com").unwrap();
        assert!(storage.add_url_to_group("SNS", "twitter.com").is_err());
        assert!(storage.add_url_to_group("SNS", "").is_err());

        assert_eq!(storage.get_group("SNS").unwrap().urls, ["twitter.com"]);
    }

    #[test]
    fn test_remove_url_from_group() {
        let mut storage = storage_with_group("SNS");
        storage.add_url_to_group("SNS", "twitter.com").unwrap();
        storage.add_url_to_group("SNS", "facebook.com").unwrap();

        storage.remove_url_from_group("SNS", "twitter.com").unwrap();
        assert_eq!(storage.get_group("SNS").unwrap().urls, ["facebook.com"]);
    }

    #[test]
    fn test_add_time_block_validation_chain() {
        let mut storage = storage_with_group("SNS");

        // Default block is 09:00-17:00
        assert!(storage.add_time_block("SNS", "25:00", "26:00").is_err());
        // Overnight input rejected by the strict range check
        assert!(storage.add_time_block("SNS", "23:00", "02:00").is_err());
        // Overlaps the default block
        assert!(storage.add_time_block("SNS", "10:00", "11:00").is_err());

        storage.add_time_block("SNS", "18:00", "20:00").unwrap();
        let group = storage.get_group("SNS").unwrap();
        assert_eq!(group.time_blocks.len(), 2);
    }

    #[test]
    fn test_add_time_block_keeps_sorted() {
        let mut storage = storage_with_group("SNS");
        storage.remove_time_block("SNS", 0).unwrap();

        storage.add_time_block("SNS", "16:00", "17:00").unwrap();
        storage.add_time_block("SNS", "09:00", "12:00").unwrap();
        storage.add_time_block("SNS", "13:00", "15:00").unwrap();

        let starts: Vec<&str> = storage
            .get_group("SNS")
            .unwrap()
            .time_blocks
            .iter()
            .map(|b| b.start.as_str())
            .collect();
        assert_eq!(starts, ["09:00", "13:00", "16:00"]);
    }

    #[test]
    fn test_remove_time_block() {
        let mut storage = storage_with_group("SNS");

        storage.remove_time_block("SNS", 0).unwrap();
        assert!(storage.get_group("SNS").unwrap().time_blocks.is_empty());
        assert!(storage.remove_time_block("SNS", 0).is_err());
    }

    #[test]
    fn test_toggle_time_block() {
        let mut storage = storage_with_group("SNS");

        assert_eq!(storage.toggle_time_block("SNS", 0), Ok(false));
        assert_eq!(storage.toggle_time_block("SNS", 0), Ok(true));
        assert!(storage.toggle_time_block("SNS", 5).is_err());
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut storage = storage_with_group("SNS");
        storage.add_url_to_group("SNS", "twitter.com").unwrap();

        let json = serde_json::to_string(&storage).unwrap();
        assert!(json.contains("\"sectionGroups\""));

        let deserialized: StorageData = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, storage);
    }

    #[test]
    fn test_deserialize_empty_blob() {
        let storage: StorageData = serde_json::from_str("{}").unwrap();
        assert!(storage.section_groups.is_empty());
    }
}
