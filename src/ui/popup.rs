/// Popup UI for the Focus Blocker extension

use patternfly_yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::group_data::SectionGroup;
use crate::messages::{ExtensionMessage, MessageResponse};
use crate::settings::{export_filename, export_settings, import_settings};
use crate::storage::{StorageData, STORAGE_KEY};
use crate::ui::components::{StatusBadge, TimeBlockRow, UrlListItem};

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendMessage(message: JsValue) -> Result<JsValue, JsValue>;

    fn exportToFile(data: &str, filename: &str);
}

#[derive(Clone, PartialEq)]
enum AppState {
    Loading,
    Idle,
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Loading);
    let storage = use_state(StorageData::new);
    let current_url = use_state(|| None::<String>);
    let selected_group = use_state(|| None::<String>);
    let notice = use_state(|| None::<String>);
    let show_import = use_state(|| false);

    // Load the blob and the active tab URL on mount
    {
        let state = state.clone();
        let storage = storage.clone();
        let current_url = current_url.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match load_storage().await {
                    Ok(data) => {
                        storage.set(data);
                        state.set(AppState::Idle);
                    }
                    Err(e) => {
                        state.set(AppState::Error(format!("Failed to load settings: {}", e)));
                    }
                }
                current_url.set(fetch_current_url().await);
            });
            || ()
        });
    }

    // Apply a mutation to the blob and persist the whole thing
    // (read-modify-write, last write wins). Returns whether the mutation
    // itself was accepted; persistence failures surface through `state`.
    let apply = {
        let storage = storage.clone();
        let state = state.clone();
        let notice = notice.clone();

        move |mutate: Box<dyn FnOnce(&mut StorageData) -> Result<(), String>>| {
            let storage = storage.clone();
            let state = state.clone();
            let notice = notice.clone();

            let mut updated = (*storage).clone();
            match mutate(&mut updated) {
                Ok(()) => {
                    notice.set(None);
                    spawn_local(async move {
                        match save_storage(&updated).await {
                            Ok(()) => storage.set(updated),
                            Err(e) => {
                                state.set(AppState::Error(format!("Failed to save: {}", e)))
                            }
                        }
                    });
                    true
                }
                Err(e) => {
                    notice.set(Some(e));
                    false
                }
            }
        }
    };

    // Group list handlers

    let on_create_group = {
        let apply = apply.clone();
        Callback::from(move |name: String| {
            apply(Box::new(move |data| data.create_group(&name)));
        })
    };

    let on_delete_group = {
        let apply = apply.clone();
        let selected_group = selected_group.clone();
        Callback::from(move |name: String| {
            selected_group.set(None);
            apply(Box::new(move |data| {
                data.delete_group(&name);
                Ok(())
            }));
        })
    };

    let on_toggle_group = {
        let apply = apply.clone();
        Callback::from(move |name: String| {
            apply(Box::new(move |data| data.toggle_group(&name).map(|_| ())));
        })
    };

    let on_rename_group = {
        let apply = apply.clone();
        let selected_group = selected_group.clone();
        Callback::from(move |(old_name, new_name): (String, String)| {
            let renamed = new_name.clone();
            if apply(Box::new(move |data| data.rename_group(&old_name, &new_name))) {
                selected_group.set(Some(renamed));
            }
        })
    };

    let on_select_group = {
        let selected_group = selected_group.clone();
        Callback::from(move |name: Option<String>| selected_group.set(name))
    };

    // Detail view handlers, all scoped to the selected group

    let on_add_url = {
        let apply = apply.clone();
        Callback::from(move |(name, url): (String, String)| {
            apply(Box::new(move |data| data.add_url_to_group(&name, &url)));
        })
    };

    let on_remove_url = {
        let apply = apply.clone();
        Callback::from(move |(name, url): (String, String)| {
            apply(Box::new(move |data| data.remove_url_from_group(&name, &url)));
        })
    };

    let on_add_time_block = {
        let apply = apply.clone();
        Callback::from(move |(name, start, end): (String, String, String)| {
            apply(Box::new(move |data| data.add_time_block(&name, &start, &end)));
        })
    };

    let on_remove_time_block = {
        let apply = apply.clone();
        Callback::from(move |(name, index): (String, usize)| {
            apply(Box::new(move |data| data.remove_time_block(&name, index)));
        })
    };

    let on_toggle_time_block = {
        let apply = apply.clone();
        Callback::from(move |(name, index): (String, usize)| {
            apply(Box::new(move |data| {
                data.toggle_time_block(&name, index).map(|_| ())
            }));
        })
    };

    // Import/export

    let on_export = {
        let storage = storage.clone();
        let notice = notice.clone();
        Callback::from(move |_| {
            match export_settings(&storage.section_groups) {
                Ok(json) => {
                    let date = today_string();
                    exportToFile(&json, &export_filename(&date));
                }
                Err(e) => notice.set(Some(e)),
            }
        })
    };

    let on_toggle_import = {
        let show_import = show_import.clone();
        Callback::from(move |_| show_import.set(!*show_import))
    };

    let on_import = {
        let apply = apply.clone();
        let show_import = show_import.clone();
        let notice = notice.clone();
        Callback::from(move |content: String| {
            match import_settings(&content) {
                Ok(groups) => {
                    show_import.set(false);
                    apply(Box::new(move |data| {
                        data.section_groups = groups;
                        Ok(())
                    }));
                }
                Err(e) => notice.set(Some(e)),
            }
        })
    };

    html! {
        <div style="width: 360px; padding: 16px; font-family: -apple-system, 'Segoe UI', sans-serif;">
            <h1 style="font-size: 18px; margin: 0 0 8px 0;">{"Focus Blocker"}</h1>

            <CurrentUrlDisplay url={(*current_url).clone()} />

            {match &*state {
                AppState::Loading => html! {
                    <div style="text-align: center; padding: 20px;">
                        <Spinner />
                    </div>
                },
                AppState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                AppState::Idle => html! {},
            }}

            if let Some(message) = (*notice).clone() {
                <Alert r#type={AlertType::Warning} title={message} inline={true}>
                </Alert>
            }

            {match &*selected_group {
                Some(name) => match storage.get_group(name) {
                    Some(group) => html! {
                        <GroupDetail
                            key={group.name.clone()}
                            group={group.clone()}
                            current_url={(*current_url).clone()}
                            on_back={on_select_group.reform(|_: ()| None)}
                            on_rename={on_rename_group}
                            on_add_url={on_add_url}
                            on_remove_url={on_remove_url}
                            on_add_time_block={on_add_time_block}
                            on_remove_time_block={on_remove_time_block}
                            on_toggle_time_block={on_toggle_time_block}
                        />
                    },
                    // Selected group vanished (deleted elsewhere)
                    None => html! {
                        <GroupList
                            storage={(*storage).clone()}
                            on_create={on_create_group}
                            on_delete={on_delete_group}
                            on_toggle={on_toggle_group}
                            on_select={on_select_group.reform(Some)}
                        />
                    },
                },
                None => html! {
                    <>
                        <GroupList
                            storage={(*storage).clone()}
                            on_create={on_create_group}
                            on_delete={on_delete_group}
                            on_toggle={on_toggle_group}
                            on_select={on_select_group.reform(Some)}
                        />

                        <div style="display: flex; gap: 8px; margin-top: 12px;">
                            <Button onclick={on_export} variant={ButtonVariant::Secondary}>
                                {"Export settings"}
                            </Button>
                            <Button onclick={on_toggle_import} variant={ButtonVariant::Secondary}>
                                {"Import settings"}
                            </Button>
                        </div>

                        if *show_import {
                            <ImportForm on_import={on_import} />
                        }
                    </>
                },
            }}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct CurrentUrlDisplayProps {
    url: Option<String>,
}

#[function_component(CurrentUrlDisplay)]
fn current_url_display(props: &CurrentUrlDisplayProps) -> Html {
    html! {
        <p style="font-size: 12px; color: #666; margin: 0 0 12px 0; overflow: hidden; text-overflow: ellipsis; white-space: nowrap;">
            {match &props.url {
                Some(url) => format!("Current tab: {}", url),
                None => "Current tab unavailable".to_string(),
            }}
        </p>
    }
}

#[derive(Properties, PartialEq)]
struct GroupListProps {
    storage: StorageData,
    on_create: Callback<String>,
    on_delete: Callback<String>,
    on_toggle: Callback<String>,
    on_select: Callback<String>,
}

#[function_component(GroupList)]
fn group_list(props: &GroupListProps) -> Html {
    let new_name = use_state(String::new);

    let on_name_input = {
        let new_name = new_name.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                new_name.set(input.value());
            }
        })
    };

    let on_create_click = {
        let new_name = new_name.clone();
        let on_create = props.on_create.clone();
        Callback::from(move |_| {
            on_create.emit((*new_name).clone());
            new_name.set(String::new());
        })
    };

    html! {
        <div>
            {for props.storage.section_groups.values().map(|group| {
                let name = group.name.clone();
                let on_select = {
                    let on_select = props.on_select.clone();
                    let name = name.clone();
                    Callback::from(move |_| on_select.emit(name.clone()))
                };
                let on_toggle = {
                    let on_toggle = props.on_toggle.clone();
                    let name = name.clone();
                    Callback::from(move |_| on_toggle.emit(name.clone()))
                };
                let on_delete = {
                    let on_delete = props.on_delete.clone();
                    let name = name.clone();
                    Callback::from(move |_| on_delete.emit(name.clone()))
                };

                html! {
                    <div style="display: flex; align-items: center; justify-content: space-between; padding: 6px 0; border-bottom: 1px solid #eee;">
                        <a onclick={on_select} style="cursor: pointer; font-weight: 500;">
                            {&group.name}
                            <span style="color: #999; font-size: 12px; margin-left: 6px;">
                                {format!("({} URLs)", group.urls.len())}
                            </span>
                        </a>
                        <span style="display: flex; align-items: center; gap: 6px;">
                            <StatusBadge enabled={group.enabled} />
                            <button onclick={on_toggle} style="border: none; background: none; cursor: pointer;">
                                {if group.enabled { "⏸" } else { "▶" }}
                            </button>
                            <button onclick={on_delete} style="border: none; background: none; cursor: pointer;">
                                {"🗑"}
                            </button>
                        </span>
                    </div>
                }
            })}

            <div style="display: flex; gap: 8px; margin-top: 12px;">
                <input
                    type="text"
                    placeholder="New group name"
                    value={(*new_name).clone()}
                    oninput={on_name_input}
                    style="flex: 1; padding: 6px;"
                />
                <Button
                    onclick={on_create_click}
                    disabled={new_name.trim().is_empty()}
                    variant={ButtonVariant::Primary}
                >
                    {"Add"}
                </Button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct GroupDetailProps {
    group: SectionGroup,
    current_url: Option<String>,
    on_back: Callback<()>,
    on_rename: Callback<(String, String)>,
    on_add_url: Callback<(String, String)>,
    on_remove_url: Callback<(String, String)>,
    on_add_time_block: Callback<(String, String, String)>,
    on_remove_time_block: Callback<(String, usize)>,
    on_toggle_time_block: Callback<(String, usize)>,
}

#[function_component(GroupDetail)]
fn group_detail(props: &GroupDetailProps) -> Html {
    let url_input = use_state(String::new);
    let start_input = use_state(|| "09:00".to_string());
    let end_input = use_state(|| "17:00".to_string());
    let rename_input = {
        let name = props.group.name.clone();
        use_state(move || name)
    };

    let name = props.group.name.clone();

    let on_back = {
        let on_back = props.on_back.clone();
        Callback::from(move |_| on_back.emit(()))
    };

    let on_rename_input = {
        let rename_input = rename_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                rename_input.set(input.value());
            }
        })
    };

    let on_rename_click = {
        let on_rename = props.on_rename.clone();
        let rename_input = rename_input.clone();
        let name = name.clone();
        Callback::from(move |_| {
            on_rename.emit((name.clone(), rename_input.trim().to_string()));
        })
    };

    let on_url_input = {
        let url_input = url_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                url_input.set(input.value());
            }
        })
    };

    let on_add_url_click = {
        let on_add_url = props.on_add_url.clone();
        let url_input = url_input.clone();
        let name = name.clone();
        Callback::from(move |_| {
            on_add_url.emit((name.clone(), (*url_input).clone()));
            url_input.set(String::new());
        })
    };

    let on_add_current = {
        let on_add_url = props.on_add_url.clone();
        let current_url = props.current_url.clone();
        let name = name.clone();
        Callback::from(move |_| {
            if let Some(url) = current_url.clone() {
                on_add_url.emit((name.clone(), url));
            }
        })
    };

    let on_remove_url = {
        let on_remove_url = props.on_remove_url.clone();
        let name = name.clone();
        Callback::from(move |url: String| on_remove_url.emit((name.clone(), url)))
    };

    let on_start_input = {
        let start_input = start_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                start_input.set(input.value());
            }
        })
    };

    let on_end_input = {
        let end_input = end_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                end_input.set(input.value());
            }
        })
    };

    let on_add_block_click = {
        let on_add_time_block = props.on_add_time_block.clone();
        let start_input = start_input.clone();
        let end_input = end_input.clone();
        let name = name.clone();
        Callback::from(move |_| {
            on_add_time_block.emit((name.clone(), (*start_input).clone(), (*end_input).clone()));
        })
    };

    let on_toggle_block = {
        let on_toggle_time_block = props.on_toggle_time_block.clone();
        let name = name.clone();
        Callback::from(move |index: usize| on_toggle_time_block.emit((name.clone(), index)))
    };

    let on_remove_block = {
        let on_remove_time_block = props.on_remove_time_block.clone();
        let name = name.clone();
        Callback::from(move |index: usize| on_remove_time_block.emit((name.clone(), index)))
    };

    html! {
        <div>
            <a onclick={on_back} style="cursor: pointer; font-size: 13px;">{"← Back"}</a>
            <h2 style="font-size: 16px; margin: 8px 0;">
                {&props.group.name}
                {" "}
                <StatusBadge enabled={props.group.enabled} />
            </h2>

            <div style="display: flex; gap: 6px; margin-top: 4px;">
                <input
                    type="text"
                    value={(*rename_input).clone()}
                    oninput={on_rename_input}
                    style="flex: 1; padding: 4px;"
                />
                <Button
                    onclick={on_rename_click}
                    disabled={rename_input.trim().is_empty() || rename_input.trim() == props.group.name}
                    variant={ButtonVariant::Secondary}
                >
                    {"Rename"}
                </Button>
            </div>

            <h3 style="font-size: 13px; margin: 12px 0 4px 0;">{"Blocked URLs"}</h3>
            {for props.group.urls.iter().map(|url| html! {
                <UrlListItem url={url.clone()} on_remove={on_remove_url.clone()} />
            })}
            <div style="display: flex; gap: 6px; margin-top: 6px;">
                <input
                    type="text"
                    placeholder="URL fragment, e.g. twitter.com"
                    value={(*url_input).clone()}
                    oninput={on_url_input}
                    style="flex: 1; padding: 4px;"
                />
                <Button
                    onclick={on_add_url_click}
                    disabled={url_input.trim().is_empty()}
                    variant={ButtonVariant::Secondary}
                >
                    {"Add"}
                </Button>
            </div>
            <Button
                onclick={on_add_current}
                disabled={props.current_url.is_none()}
                variant={ButtonVariant::Link}
            >
                {"+ Add current tab"}
            </Button>

            <h3 style="font-size: 13px; margin: 12px 0 4px 0;">{"Time blocks"}</h3>
            {for props.group.time_blocks.iter().enumerate().map(|(index, block)| html! {
                <TimeBlockRow
                    {index}
                    block={block.clone()}
                    on_toggle={on_toggle_block.clone()}
                    on_remove={on_remove_block.clone()}
                />
            })}
            <div style="display: flex; gap: 6px; align-items: center; margin-top: 6px;">
                <input
                    type="time"
                    value={(*start_input).clone()}
                    oninput={on_start_input}
                    style="padding: 4px;"
                />
                <span>{"–"}</span>
                <input
                    type="time"
                    value={(*end_input).clone()}
                    oninput={on_end_input}
                    style="padding: 4px;"
                />
                <Button onclick={on_add_block_click} variant={ButtonVariant::Secondary}>
                    {"Add"}
                </Button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ImportFormProps {
    on_import: Callback<String>,
}

#[function_component(ImportForm)]
fn import_form(props: &ImportFormProps) -> Html {
    let content = use_state(String::new);

    let on_input = {
        let content = content.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
                content.set(area.value());
            }
        })
    };

    let on_import_click = {
        let on_import = props.on_import.clone();
        let content = content.clone();
        Callback::from(move |_| on_import.emit((*content).clone()))
    };

    html! {
        <div style="margin-top: 8px;">
            <textarea
                placeholder="Paste exported settings JSON here"
                value={(*content).clone()}
                oninput={on_input}
                style="width: 100%; height: 100px; font-family: monospace; font-size: 11px;"
            />
            <Button
                onclick={on_import_click}
                disabled={content.trim().is_empty()}
                variant={ButtonVariant::Primary}
            >
                {"Import"}
            </Button>
        </div>
    }
}

// Helper functions

async fn load_storage() -> Result<StorageData, String> {
    let blob = getStorage(STORAGE_KEY)
        .await
        .map_err(|e| format!("Failed to get storage: {:?}", e))?;

    if blob.is_null() || blob.is_undefined() {
        return Ok(StorageData::new());
    }

    // The stored value is the raw group mapping, same shape as an export
    let section_groups = serde_wasm_bindgen::from_value(blob)
        .map_err(|e| format!("Failed to parse storage: {:?}", e))?;
    Ok(StorageData { section_groups })
}

async fn save_storage(data: &StorageData) -> Result<(), String> {
    let blob = serde_wasm_bindgen::to_value(&data.section_groups)
        .map_err(|e| format!("Failed to serialize storage: {:?}", e))?;

    setStorage(STORAGE_KEY, blob)
        .await
        .map_err(|e| format!("Failed to save storage: {:?}", e))
}

async fn fetch_current_url() -> Option<String> {
    let message = serde_wasm_bindgen::to_value(&ExtensionMessage::GetCurrentUrl).ok()?;
    let response = sendMessage(message).await.ok()?;

    match serde_wasm_bindgen::from_value::<MessageResponse>(response) {
        Ok(MessageResponse::CurrentUrl { url }) => url,
        _ => None,
    }
}

fn today_string() -> String {
    let now = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}",
        now.get_full_year(),
        now.get_month() + 1,
        now.get_date()
    )
}
