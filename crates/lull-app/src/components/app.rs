//! Root component: view switching and error notices.

use dioxus::prelude::*;

use crate::components::mixer::MixerView;
use crate::components::player::PlayerView;
use crate::services::audio::{use_audio_event_sync, use_audio_service, use_timer_loop};
use crate::services::WakeLockService;
use crate::state::{AppState, View};

/// Main application component.
#[component]
pub fn App() -> Element {
    // Initialize global state
    let app_state = use_context_provider(AppState::new);

    // Initialize audio service
    let audio_service = use_audio_service();
    use_context_provider(|| audio_service);

    // Set up engine event synchronization and the timer loop
    use_audio_event_sync(audio_service, app_state, WakeLockService::new());
    use_timer_loop(audio_service, app_state);

    let view = *app_state.view.read();

    rsx! {
        // Inject CSS
        style { {include_str!("../../assets/styles.css")} }

        div { class: "app",
            NoticeBanner {}
            nav { class: "app__tabs",
                ViewTab { target: View::Player, label: "Player" }
                ViewTab { target: View::Mixer, label: "Mixer" }
            }
            match view {
                View::Player => rsx! { PlayerView {} },
                View::Mixer => rsx! { MixerView {} },
            }
        }
    }
}

/// One tab in the view switcher. Switching views tears the old one down:
/// every channel is cleared before the new view takes over.
#[component]
fn ViewTab(target: View, label: &'static str) -> Element {
    let mut app_state = use_context::<AppState>();
    let audio = use_context::<Signal<crate::services::AudioService>>();
    let active = *app_state.view.read() == target;

    rsx! {
        button {
            class: if active { "app__tab app__tab--active" } else { "app__tab" },
            onclick: move |_| {
                if *app_state.view.read() != target {
                    audio.read().stop_all();
                    app_state.reset_channels();
                    app_state.view.set(target);
                }
            },
            "{label}"
        }
    }
}

/// Dismissible banner showing the latest error.
#[component]
fn NoticeBanner() -> Element {
    let app_state = use_context::<AppState>();
    let mut notice = app_state.notice;
    let message = notice.read().clone();

    rsx! {
        if let Some(message) = message {
            div { class: "app__notice",
                span { class: "app__notice-text", "{message}" }
                button {
                    class: "app__notice-dismiss",
                    onclick: move |_| notice.set(None),
                    "✕"
                }
            }
        }
    }
}
