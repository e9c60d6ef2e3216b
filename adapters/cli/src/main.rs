#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Scroller viewer.

mod config;
mod viewer;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use scroller_network::{AssetHandoff, AssetLoader, HttpClient, SelectionNotifier};
use scroller_rendering::{Color, Presentation, RenderingBackend};
use scroller_rendering_macroquad::MacroquadBackend;
use scroller_system_selection::SelectionController;
use scroller_world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

use self::{
    config::{Args, Settings},
    viewer::Viewer,
};

/// Entry point for the Scroller command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;
    let settings = Settings::resolve(&args)?;

    info!(
        offline = settings.offline,
        map_url = %settings.endpoints.map_url,
        "starting scroller"
    );

    let (handoff, notifier) = if settings.offline {
        (AssetHandoff::offline(), None)
    } else {
        let client =
            HttpClient::new(settings.endpoints.clone()).context("failed to build HTTP client")?;
        let handoff =
            AssetLoader::spawn(client.clone()).context("failed to start asset downloads")?;
        let notifier =
            SelectionNotifier::spawn(client).context("failed to start selection notifier")?;
        (handoff, Some(notifier))
    };

    let mut viewer = Viewer::new(
        World::new(settings.camera),
        SelectionController::new(settings.marker),
        handoff,
        notifier,
    );

    MacroquadBackend::new()
        .with_vsync(settings.vsync)
        .with_show_fps(settings.show_fps)
        .with_window_size(settings.window_size.0, settings.window_size.1)
        .with_mouse_emulation(settings.mouse_emulation)
        .run(
            Presentation::new("Scroller", Color::BLACK),
            move |input, surface| viewer.frame(input, surface),
        )
}

/// Installs the global subscriber; `RUST_LOG` takes precedence over `level`.
fn init_tracing(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level `{level}`"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("failed to install log subscriber: {error}"))
}
