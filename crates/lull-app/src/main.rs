//! # Lull
//!
//! Tones, colored noise, and looping ambience for winding down, built with
//! Rust and Dioxus.

// RSX macros generate code that triggers these warnings incorrectly
#![allow(unused_qualifications)]
#![allow(clippy::use_self)]

mod components;
mod services;
mod state;

use anyhow::Result;
use components::App;
use dioxus::desktop::{Config, WindowBuilder};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Window dimensions for the mixer layout.
const WINDOW_WIDTH: f64 = 420.0;
const WINDOW_HEIGHT: f64 = 640.0;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lull=debug,lull_app=debug,lull_audio=info".into()),
        )
        .init();

    info!("Starting Lull v{}", env!("CARGO_PKG_VERSION"));

    let window_builder = WindowBuilder::new()
        .with_title("Lull")
        .with_inner_size(dioxus::desktop::LogicalSize::new(
            WINDOW_WIDTH,
            WINDOW_HEIGHT,
        ))
        .with_resizable(false);

    let config = Config::new()
        .with_window(window_builder)
        .with_disable_context_menu(true)
        .with_menu(None);

    dioxus::LaunchBuilder::desktop()
        .with_cfg(config)
        .launch(App);

    Ok(())
}
