/// Block page shown in place of a blocked site
///
/// The background script redirects here with the verdict's attribution in
/// the query string. While displayed, the page re-checks the originally
/// blocked URL on a fixed cadence and navigates back the moment the block
/// window ends.

use log::warn;
use patternfly_yew::prelude::*;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::messages::{ExtensionMessage, MessageResponse};
use crate::watcher::BLOCK_PAGE_POLL_MS;

// Import JS bridge functions
#[wasm_bindgen(module = "/blocked.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendMessage(message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sleep(ms: f64) -> Result<(), JsValue>;
}

/// Attribution parsed from the block page's own query string
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockPageParams {
    pub group: String,
    pub time: String,
    pub url: String,
}

/// Parse `group`, `time` and `url` out of a block page URL. Missing
/// parameters fall back to empty strings rather than failing the page.
pub fn parse_block_page_params(href: &str) -> BlockPageParams {
    let Ok(parsed) = Url::parse(href) else {
        warn!("Block page could not parse its own URL: {}", href);
        return BlockPageParams::default();
    };

    let mut params = BlockPageParams::default();
    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            "group" => params.group = value.into_owned(),
            "time" => params.time = value.into_owned(),
            "url" => params.url = value.into_owned(),
            _ => {}
        }
    }
    params
}

#[function_component(BlockedPage)]
pub fn blocked_page() -> Html {
    let params = use_state(BlockPageParams::default);

    {
        let params = params.clone();
        use_effect_with((), move |_| {
            let href = web_sys::window()
                .and_then(|w| w.location().href().ok())
                .unwrap_or_default();
            let parsed = parse_block_page_params(&href);
            let blocked_url = parsed.url.clone();
            params.set(parsed);

            // Re-check the blocked URL until the window ends, then return
            spawn_local(async move {
                if blocked_url.is_empty() {
                    return;
                }
                loop {
                    if sleep(BLOCK_PAGE_POLL_MS).await.is_err() {
                        return;
                    }
                    match check_still_blocked(&blocked_url).await {
                        Some(true) => continue,
                        Some(false) => {
                            navigate_to(&blocked_url);
                            return;
                        }
                        // Messaging failed; try again on the next tick
                        None => continue,
                    }
                }
            });
            || ()
        });
    }

    html! {
        <div style="max-width: 480px; margin: 80px auto; text-align: center; font-family: -apple-system, 'Segoe UI', sans-serif;">
            <h1 style="font-size: 28px;">{"🔒 Stay focused"}</h1>

            if !params.group.is_empty() {
                <p style="font-size: 15px; color: #444;">
                    {format!("\"{}\" is blocked right now (group: {})", params.url, params.group)}
                </p>
                <p style="font-size: 13px; color: #888;">
                    {format!("Blocked at {}", params.time)}
                </p>
            } else {
                <p style="font-size: 15px; color: #444;">
                    {"This site is blocked during your focus time."}
                </p>
            }

            <Alert r#type={AlertType::Info} title={"You will be sent back automatically when the block ends."} inline={true}>
            </Alert>
        </div>
    }
}

// Helper functions

async fn check_still_blocked(url: &str) -> Option<bool> {
    let message = serde_wasm_bindgen::to_value(&ExtensionMessage::CheckBlock {
        url: url.to_string(),
    })
    .ok()?;

    let response = sendMessage(message).await.ok()?;
    match serde_wasm_bindgen::from_value::<MessageResponse>(response) {
        Ok(MessageResponse::CheckBlock(result)) => Some(result.should_block),
        _ => None,
    }
}

fn navigate_to(url: &str) {
    if let Some(window) = web_sys::window() {
        if window.location().set_href(url).is_err() {
            warn!("Failed to navigate back to {}", url);
        }
    }
}
