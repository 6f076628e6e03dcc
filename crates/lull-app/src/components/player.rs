//! Single-channel player view with the auto-stop timer.

use dioxus::prelude::*;

use crate::services::AudioService;
use crate::state::{AppState, ChannelStatus};
use lull_core::{
    catalog, format_clock, ChannelId, TimerPreset, MAX_VOLUME_DB, MIN_VOLUME_DB,
};

/// Player view: pick one sound, play it, optionally with a countdown.
#[component]
pub fn PlayerView() -> Element {
    let app_state = use_context::<AppState>();
    let channel = app_state.channel(ChannelId::PLAYER);
    let status = *channel.status.read();

    rsx! {
        div { class: "player",
            SoundList {}
            TimerPanel {}
            div { class: "player__controls",
                PlayButton {}
                VolumeRow {}
            }
            if status == ChannelStatus::Loading {
                p { class: "player__hint", "Loading…" }
            }
        }
    }
}

/// Catalog list; clicking an entry selects it (and switches the sound if
/// already playing).
#[component]
fn SoundList() -> Element {
    let app_state = use_context::<AppState>();
    let audio = use_context::<Signal<AudioService>>();
    let channel = app_state.channel(ChannelId::PLAYER);
    let selected = *channel.selected.read();

    rsx! {
        div { class: "player__sounds",
            for entry in catalog::all() {
                button {
                    key: "{entry.label}",
                    class: if selected == Some(entry.label) {
                        "player__sound player__sound--selected"
                    } else {
                        "player__sound"
                    },
                    disabled: channel.is_loading(),
                    onclick: {
                        let definition = entry.definition.clone();
                        let label = entry.label;
                        move |_| {
                            let mut ch = app_state.channel(ChannelId::PLAYER);
                            ch.selected.set(Some(label));
                            // Switching while audible swaps the source in place.
                            if ch.is_playing() {
                                audio.read().play(ChannelId::PLAYER, definition.clone());
                            }
                        }
                    },
                    "{entry.label}"
                }
            }
        }
    }
}

/// Play/stop toggle for the selected sound.
#[component]
fn PlayButton() -> Element {
    let app_state = use_context::<AppState>();
    let audio = use_context::<Signal<AudioService>>();
    let channel = app_state.channel(ChannelId::PLAYER);
    let status = *channel.status.read();
    let selected = *channel.selected.read();

    let label = match status {
        ChannelStatus::Playing => "Stop",
        ChannelStatus::Loading => "Loading…",
        ChannelStatus::Stopped => "Play",
    };

    rsx! {
        button {
            class: "player__play",
            disabled: status == ChannelStatus::Loading || selected.is_none(),
            onclick: move |_| {
                let service = audio.read();
                match status {
                    ChannelStatus::Playing => service.stop(ChannelId::PLAYER),
                    ChannelStatus::Stopped => {
                        if let Some(definition) =
                            selected.and_then(catalog::find).cloned()
                        {
                            service.play(ChannelId::PLAYER, definition);
                        }
                    }
                    ChannelStatus::Loading => {}
                }
            },
            "{label}"
        }
    }
}

/// Volume slider plus mute toggle.
#[component]
fn VolumeRow() -> Element {
    let app_state = use_context::<AppState>();
    let audio = use_context::<Signal<AudioService>>();
    let channel = app_state.channel(ChannelId::PLAYER);
    let volume_db = *channel.volume_db.read();
    let muted = *channel.muted.read();

    rsx! {
        div { class: "player__volume",
            input {
                r#type: "range",
                min: "{MIN_VOLUME_DB}",
                max: "{MAX_VOLUME_DB}",
                step: "0.5",
                value: "{volume_db}",
                oninput: move |evt| {
                    if let Ok(db) = evt.value().parse::<f32>() {
                        let mut ch = app_state.channel(ChannelId::PLAYER);
                        ch.volume_db.set(db);
                        // An explicit volume change always un-mutes.
                        ch.muted.set(false);
                        audio.read().set_volume(ChannelId::PLAYER, db);
                    }
                },
            }
            button {
                class: if muted { "player__mute player__mute--on" } else { "player__mute" },
                onclick: move |_| {
                    let mut ch = app_state.channel(ChannelId::PLAYER);
                    let next = !*ch.muted.read();
                    ch.muted.set(next);
                    audio.read().set_mute(ChannelId::PLAYER, next);
                },
                if muted { "Unmute" } else { "Mute" }
            }
        }
    }
}

/// Timer readout and preset selector.
///
/// The selector is disabled while a sound is playing; the duration is fixed
/// for the session once playback starts.
#[component]
fn TimerPanel() -> Element {
    let app_state = use_context::<AppState>();
    let channel = app_state.channel(ChannelId::PLAYER);
    let timer = app_state.timer;
    let playing = channel.is_playing() || channel.is_loading();
    let selected_preset = *timer.preset.read();
    let readout = format_clock(timer.display_seconds());

    rsx! {
        div { class: "player__timer",
            span { class: "player__timer-readout", "{readout}" }
            div { class: "player__timer-presets",
                button {
                    class: if selected_preset.is_none() {
                        "player__preset player__preset--selected"
                    } else {
                        "player__preset"
                    },
                    disabled: playing,
                    onclick: move |_| {
                        let mut timer = app_state.timer;
                        timer.preset.set(None);
                    },
                    "∞"
                }
                for preset in TimerPreset::all() {
                    button {
                        key: "{preset}",
                        class: if selected_preset == Some(preset) {
                            "player__preset player__preset--selected"
                        } else {
                            "player__preset"
                        },
                        disabled: playing,
                        onclick: move |_| {
                            let mut timer = app_state.timer;
                            timer.preset.set(Some(preset));
                        },
                        "{preset}"
                    }
                }
            }
        }
    }
}
