/// Focus Blocker - Chrome Extension for time-boxed site blocking
/// Built with Rust + WASM + Yew

pub mod block_logic;
pub mod group_data;
pub mod messages;
pub mod settings;
pub mod storage;
pub mod time_utils;
pub mod ui;
pub mod watcher;

use wasm_bindgen::prelude::*;

use group_data::SectionGroups;
use storage::StorageData;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Current wall-clock time as "HH:MM", from the browser clock
fn current_time_string() -> String {
    let now = js_sys::Date::new_0();
    time_utils::format_time(now.get_hours(), now.get_minutes())
}

// Core entry points exposed to the JS background/content scripts

/// Evaluate one URL against the group mapping at the current wall-clock
/// time. `groups` is the raw stored mapping; a missing or malformed blob
/// degrades to "do not block" rather than throwing into JS.
#[wasm_bindgen]
pub fn check_block(url: &str, groups: JsValue) -> JsValue {
    let groups: SectionGroups = if groups.is_null() || groups.is_undefined() {
        SectionGroups::new()
    } else {
        match serde_wasm_bindgen::from_value(groups) {
            Ok(groups) => groups,
            Err(e) => {
                log::error!("Failed to parse group mapping: {:?}", e);
                SectionGroups::new()
            }
        }
    };

    let result = block_logic::check_if_should_block(url, &groups, &current_time_string());
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Build the block page redirect URL for a blocking verdict
#[wasm_bindgen]
pub fn block_page_url(base_url: &str, result: JsValue) -> Option<String> {
    let result = serde_wasm_bindgen::from_value(result).ok()?;
    block_logic::build_block_page_url(base_url, &result).ok()
}

/// Dispatch one extension message against the stored group mapping.
/// Returns `[response, updatedGroups]` so the caller can persist mutations;
/// null when the message is unrecognized.
#[wasm_bindgen]
pub fn handle_extension_message(
    message: JsValue,
    groups: JsValue,
    active_url: Option<String>,
) -> JsValue {
    let message: messages::ExtensionMessage = match serde_wasm_bindgen::from_value(message) {
        Ok(message) => message,
        Err(e) => {
            log::warn!("Unrecognized message: {:?}", e);
            return JsValue::NULL;
        }
    };

    let section_groups: SectionGroups = serde_wasm_bindgen::from_value(groups).unwrap_or_else(|e| {
        log::error!("Failed to parse group mapping: {:?}", e);
        SectionGroups::new()
    });
    let mut storage = StorageData { section_groups };

    let response = messages::handle_message(
        message,
        &mut storage,
        active_url.as_deref(),
        &current_time_string(),
    );

    let pair = js_sys::Array::new();
    pair.push(&serde_wasm_bindgen::to_value(&response).unwrap_or(JsValue::NULL));
    pair.push(&serde_wasm_bindgen::to_value(&storage.section_groups).unwrap_or(JsValue::NULL));
    pair.into()
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the block page
#[wasm_bindgen]
pub fn start_blocked_page() {
    yew::Renderer::<ui::blocked::BlockedPage>::new().render();
}
