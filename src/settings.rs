/// Settings import/export as a downloadable JSON file
///
/// The exported shape is the raw group mapping (not the storage root), the
/// same layout the popup persists. Imports are validated as a whole before
/// anything merges; one bad group rejects the file.
use crate::group_data::{SectionGroup, SectionGroups};
use crate::time_utils::is_valid_time_format;

/// Serialize a group mapping as pretty JSON for download
pub fn export_settings(groups: &SectionGroups) -> Result<String, String> {
    serde_json::to_string_pretty(groups).map_err(|e| format!("Failed to export settings: {}", e))
}

/// File name for an export, `date` in YYYY-MM-DD
pub fn export_filename(date: &str) -> String {
    format!("focus-blocker-settings-{}.json", date)
}

/// Parse and validate an imported settings file. Deserializing into the
/// group mapping enforces the structural shape (and keeps file order);
/// time formats and names get checked on top.
pub fn import_settings(content: &str) -> Result<SectionGroups, String> {
    let groups: SectionGroups = serde_json::from_str(content)
        .map_err(|e| format!("Invalid settings file format: {}", e))?;

    for (key, group) in &groups {
        validate_group(key, group)?;
    }

    Ok(groups)
}

fn validate_group(key: &str, group: &SectionGroup) -> Result<(), String> {
    if group.name.trim().is_empty() {
        return Err(format!("Group '{}' is missing a name", key));
    }

    for block in &group.time_blocks {
        if !is_valid_time_format(&block.start) || !is_valid_time_format(&block.end) {
            return Err(format!(
                "Group '{}' has an invalid time block: {} - {}",
                key, block.start, block.end
            ));
        }
    }

    Ok(())
}
