//! Four-channel mixer view.
//!
//! Each strip addresses exactly one channel; nothing here can touch another
//! channel's state or audio graph. Channels loop until stopped or removed —
//! there is no timer in this mode.

use dioxus::prelude::*;

use crate::services::AudioService;
use crate::state::{AppState, ChannelStatus};
use lull_core::{catalog, ChannelId, MAX_VOLUME_DB, MIN_VOLUME_DB};

/// Mixer view: four independent channel strips.
#[component]
pub fn MixerView() -> Element {
    rsx! {
        div { class: "mixer",
            for id in ChannelId::all() {
                ChannelStrip { key: "{id}", channel_index: id.index() }
            }
        }
    }
}

/// One mixer strip: sound select, play/stop, fader, mute, remove.
#[component]
fn ChannelStrip(channel_index: usize) -> Element {
    let app_state = use_context::<AppState>();
    let audio = use_context::<Signal<AudioService>>();
    let Ok(id) = ChannelId::new(channel_index) else {
        return rsx! {};
    };
    let channel = app_state.channel(id);
    let status = *channel.status.read();
    let selected = *channel.selected.read();
    let volume_db = *channel.volume_db.read();
    let muted = *channel.muted.read();

    let play_label = match status {
        ChannelStatus::Playing => "⏸",
        ChannelStatus::Loading => "…",
        ChannelStatus::Stopped => "▶",
    };

    rsx! {
        div { class: "mixer__strip",
            select {
                class: "mixer__select",
                disabled: status == ChannelStatus::Loading,
                onchange: move |evt| {
                    let value = evt.value();
                    let mut ch = app_state.channel(id);
                    if value.is_empty() {
                        ch.selected.set(None);
                        audio.read().remove(id);
                    } else if let Some(entry) =
                        catalog::all().iter().find(|e| e.label == value)
                    {
                        ch.selected.set(Some(entry.label));
                        // A strip that is already audible switches sounds
                        // immediately; a stopped one waits for play.
                        if status == ChannelStatus::Playing {
                            audio.read().play(id, entry.definition.clone());
                        }
                    }
                },
                option { value: "", selected: selected.is_none(), "—" }
                for entry in catalog::all() {
                    option {
                        key: "{entry.label}",
                        value: "{entry.label}",
                        selected: selected == Some(entry.label),
                        "{entry.label}"
                    }
                }
            }

            button {
                class: "mixer__play",
                disabled: status == ChannelStatus::Loading || selected.is_none(),
                onclick: move |_| {
                    let service = audio.read();
                    match status {
                        ChannelStatus::Playing => service.stop(id),
                        ChannelStatus::Stopped => {
                            if let Some(definition) =
                                selected.and_then(catalog::find).cloned()
                            {
                                service.play(id, definition);
                            }
                        }
                        ChannelStatus::Loading => {}
                    }
                },
                "{play_label}"
            }

            // Vertical fader: drag position maps linearly onto the decibel range.
            input {
                class: "mixer__fader",
                r#type: "range",
                min: "{MIN_VOLUME_DB}",
                max: "{MAX_VOLUME_DB}",
                step: "0.5",
                value: "{volume_db}",
                oninput: move |evt| {
                    if let Ok(db) = evt.value().parse::<f32>() {
                        let mut ch = app_state.channel(id);
                        ch.volume_db.set(db);
                        ch.muted.set(false);
                        audio.read().set_volume(id, db);
                    }
                },
            }

            div { class: "mixer__buttons",
                button {
                    class: if muted { "mixer__mute mixer__mute--on" } else { "mixer__mute" },
                    onclick: move |_| {
                        let mut ch = app_state.channel(id);
                        let next = !*ch.muted.read();
                        ch.muted.set(next);
                        audio.read().set_mute(id, next);
                    },
                    "M"
                }
                button {
                    class: "mixer__remove",
                    disabled: selected.is_none(),
                    onclick: move |_| {
                        let mut ch = app_state.channel(id);
                        ch.reset();
                        audio.read().remove(id);
                    },
                    "✕"
                }
            }
        }
    }
}
