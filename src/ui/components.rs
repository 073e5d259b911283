/// Reusable UI components

use yew::prelude::*;

use crate::group_data::TimeBlock;
use crate::time_utils::format_time_block;

#[derive(Properties, PartialEq)]
pub struct StatusBadgeProps {
    pub enabled: bool,
}

/// Small pill showing a group's enabled state
#[function_component(StatusBadge)]
pub fn status_badge(props: &StatusBadgeProps) -> Html {
    let (label, color) = if props.enabled {
        ("Active", "#4caf50")
    } else {
        ("Paused", "#9e9e9e")
    };

    html! {
        <span style={format!("display: inline-block; padding: 2px 8px; border-radius: 10px; background-color: {}; color: white; font-size: 11px; font-weight: 600;", color)}>
            {label}
        </span>
    }
}

#[derive(Properties, PartialEq)]
pub struct TimeBlockRowProps {
    pub index: usize,
    pub block: TimeBlock,
    pub on_toggle: Callback<usize>,
    pub on_remove: Callback<usize>,
}

/// One row of the time block list: window text plus toggle/remove actions
#[function_component(TimeBlockRow)]
pub fn time_block_row(props: &TimeBlockRowProps) -> Html {
    let index = props.index;

    let on_toggle = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |_| on_toggle.emit(index))
    };
    let on_remove = {
        let on_remove = props.on_remove.clone();
        Callback::from(move |_| on_remove.emit(index))
    };

    let text_style = if props.block.is_enabled() {
        "font-size: 13px;"
    } else {
        "font-size: 13px; color: #9e9e9e; text-decoration: line-through;"
    };

    html! {
        <div style="display: flex; align-items: center; justify-content: space-between; padding: 4px 0;">
            <span style={text_style}>{format_time_block(&props.block)}</span>
            <span>
                <button onclick={on_toggle} style="margin-right: 4px; border: none; background: none; cursor: pointer;">
                    {if props.block.is_enabled() { "⏸" } else { "▶" }}
                </button>
                <button onclick={on_remove} style="border: none; background: none; cursor: pointer;">
                    {"✕"}
                </button>
            </span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct UrlListItemProps {
    pub url: String,
    pub on_remove: Callback<String>,
}

/// One registered URL with its remove action
#[function_component(UrlListItem)]
pub fn url_list_item(props: &UrlListItemProps) -> Html {
    let on_remove = {
        let on_remove = props.on_remove.clone();
        let url = props.url.clone();
        Callback::from(move |_| on_remove.emit(url.clone()))
    };

    html! {
        <div style="display: flex; align-items: center; justify-content: space-between; padding: 2px 0;">
            <span style="font-size: 13px; font-family: monospace; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; max-width: 240px;">
                {&props.url}
            </span>
            <button onclick={on_remove} style="border: none; background: none; cursor: pointer;">
                {"✕"}
            </button>
        </div>
    }
}
