/// Cross-context extension messages as closed tagged unions
///
/// The wire shape is `{"type": "CHECK_BLOCK", ...}` with the original
/// SCREAMING_SNAKE tags, so the JS background/content scripts keep talking
/// the same protocol. Unknown tags surface as a decode error rather than a
/// silently ignored message.
use log::warn;
use serde::{Deserialize, Serialize};

use crate::block_logic::check_if_should_block;
use crate::group_data::BlockCheckResult;
use crate::storage::StorageData;

/// Requests the popup/content scripts send to the background context
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ExtensionMessage {
    #[serde(rename = "CHECK_BLOCK")]
    CheckBlock { url: String },
    #[serde(rename = "GET_CURRENT_URL")]
    GetCurrentUrl,
    #[serde(rename = "OPEN_SETTINGS")]
    OpenSettings,
    #[serde(rename = "ADD_CURRENT_URL")]
    AddCurrentUrl {
        #[serde(rename = "groupName")]
        group_name: String,
    },
}

/// One response per request variant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageResponse {
    CheckBlock(BlockCheckResult),
    CurrentUrl { url: Option<String> },
    Ack {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl MessageResponse {
    fn ok() -> MessageResponse {
        MessageResponse::Ack {
            success: true,
            error: None,
        }
    }

    fn failed(error: String) -> MessageResponse {
        MessageResponse::Ack {
            success: false,
            error: Some(error),
        }
    }
}

/// Decode a message from its JSON wire form. An unrecognized `type` tag is
/// the error case here.
pub fn decode_message(json: &str) -> Result<ExtensionMessage, String> {
    serde_json::from_str(json).map_err(|e| format!("Unrecognized message: {}", e))
}

/// Dispatch a decoded message against the current storage snapshot.
///
/// `active_url` is the focused tab's URL as reported by the tabs API (None
/// when there is no usable tab). `current_time` is the ambient wall clock
/// as "HH:MM"; the wasm boundary supplies it so this stays pure.
pub fn handle_message(
    message: ExtensionMessage,
    storage: &mut StorageData,
    active_url: Option<&str>,
    current_time: &str,
) -> MessageResponse {
    match message {
        ExtensionMessage::CheckBlock { url } => {
            if url.is_empty() {
                warn!("CHECK_BLOCK carried an empty URL");
                return MessageResponse::CheckBlock(BlockCheckResult::no_block());
            }
            MessageResponse::CheckBlock(check_if_should_block(
                &url,
                &storage.section_groups,
                current_time,
            ))
        }
        ExtensionMessage::GetCurrentUrl => MessageResponse::CurrentUrl {
            url: active_url.map(str::to_string),
        },
        ExtensionMessage::OpenSettings => {
            // Opening the settings page is tab-creation glue on the JS
            // side; the handler only acknowledges the request.
            MessageResponse::ok()
        }
        ExtensionMessage::AddCurrentUrl { group_name } => {
            let Some(url) = active_url else {
                return MessageResponse::failed("No active tab URL".to_string());
            };
            match storage.add_url_to_group(&group_name, url) {
                Ok(()) => MessageResponse::ok(),
                Err(e) => MessageResponse::failed(e),
            }
        }
    }
}
