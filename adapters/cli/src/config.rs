use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use scroller_core::DEFAULT_SELECTION_MARKER;
use scroller_network::Endpoints;
use scroller_rendering_macroquad::MacroquadBackend;
use scroller_world::camera::CameraConfig;
use serde::Deserialize;

/// Command-line arguments accepted by the viewer.
#[derive(Debug, Parser)]
#[command(name = "scroller", version, about = "Touch-driven viewer for remote tile maps")]
pub(crate) struct Args {
    /// TOML file providing endpoint, camera and selection settings.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Location of the comma-separated map.
    #[arg(long, value_name = "URL")]
    pub(crate) map_url: Option<String>,

    /// Location of the PNG sprite drawn for tanks.
    #[arg(long, value_name = "URL")]
    pub(crate) sprite_url: Option<String>,

    /// Location that receives selection reports.
    #[arg(long, value_name = "URL")]
    pub(crate) report_url: Option<String>,

    /// Skip all network access and show the built-in map.
    #[arg(long)]
    pub(crate) offline: bool,

    /// Synchronise presentation with the display refresh rate (default).
    #[arg(long, overrides_with = "no_vsync")]
    pub(crate) vsync: bool,

    /// Render as fast as possible.
    #[arg(long, overrides_with = "vsync")]
    pub(crate) no_vsync: bool,

    /// Log frame timing once per second.
    #[arg(long)]
    pub(crate) show_fps: bool,

    /// Ignore the mouse instead of treating the left button as a touch.
    #[arg(long)]
    pub(crate) no_mouse_emulation: bool,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub(crate) log_level: String,
}

impl Args {
    fn vsync_enabled(&self) -> bool {
        self.vsync || !self.no_vsync
    }
}

/// Optional settings file; every key may be omitted.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConfigFile {
    endpoints: EndpointsSection,
    camera: CameraSection,
    selection: SelectionSection,
    window: WindowSection,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct EndpointsSection {
    map_url: Option<String>,
    sprite_url: Option<String>,
    report_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct CameraSection {
    initial_zoom: Option<f32>,
    min_zoom: Option<f32>,
    max_zoom: Option<f32>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct SelectionSection {
    marker: Option<String>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct WindowSection {
    width: Option<u32>,
    height: Option<u32>,
    mouse_emulation: Option<bool>,
}

impl ConfigFile {
    fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Effective settings after merging flags, the config file and defaults.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub(crate) endpoints: Endpoints,
    pub(crate) camera: CameraConfig,
    pub(crate) marker: String,
    pub(crate) offline: bool,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
    pub(crate) window_size: (i32, i32),
    pub(crate) mouse_emulation: bool,
}

impl Settings {
    /// Loads the config file named by `args`, if any, and merges it.
    pub(crate) fn resolve(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        Self::merge(args, file)
    }

    /// Flags win over file values, which win over built-in defaults.
    fn merge(args: &Args, file: ConfigFile) -> Result<Self> {
        let ConfigFile {
            endpoints,
            camera,
            selection,
            window,
        } = file;

        let endpoints = Endpoints {
            map_url: pick(&args.map_url, endpoints.map_url, Endpoints::DEFAULT_MAP_URL),
            sprite_url: pick(
                &args.sprite_url,
                endpoints.sprite_url,
                Endpoints::DEFAULT_SPRITE_URL,
            ),
            report_url: pick(
                &args.report_url,
                endpoints.report_url,
                Endpoints::DEFAULT_REPORT_URL,
            ),
        };

        let camera = CameraConfig::new(
            camera
                .initial_zoom
                .unwrap_or(CameraConfig::DEFAULT_INITIAL_ZOOM),
            camera.min_zoom.unwrap_or(CameraConfig::DEFAULT_MIN_ZOOM),
            camera.max_zoom.unwrap_or(CameraConfig::DEFAULT_MAX_ZOOM),
        )
        .context("invalid [camera] settings")?;

        let marker = selection
            .marker
            .unwrap_or_else(|| DEFAULT_SELECTION_MARKER.to_owned());
        ensure!(!marker.trim().is_empty(), "selection marker must not be empty");

        let window_size = (
            window_dimension(window.width, MacroquadBackend::DEFAULT_WINDOW_WIDTH, "width")?,
            window_dimension(window.height, MacroquadBackend::DEFAULT_WINDOW_HEIGHT, "height")?,
        );
        let mouse_emulation = !args.no_mouse_emulation && window.mouse_emulation.unwrap_or(true);

        Ok(Self {
            endpoints,
            camera,
            marker,
            offline: args.offline,
            vsync: args.vsync_enabled(),
            show_fps: args.show_fps,
            window_size,
            mouse_emulation,
        })
    }
}

fn pick(flag: &Option<String>, file: Option<String>, default: &str) -> String {
    flag.clone()
        .or(file)
        .unwrap_or_else(|| default.to_owned())
}

fn window_dimension(value: Option<u32>, default: i32, axis: &str) -> Result<i32> {
    let Some(value) = value else {
        return Ok(default);
    };
    let value = i32::try_from(value)
        .ok()
        .filter(|value| *value > 0)
        .with_context(|| format!("window {axis} {value} is out of range"))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("scroller").chain(extra.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn defaults_apply_without_flags_or_file() {
        let settings = Settings::merge(&args(&[]), ConfigFile::default()).expect("defaults valid");

        assert_eq!(settings.endpoints, Endpoints::default());
        assert_eq!(settings.camera, CameraConfig::default());
        assert_eq!(settings.marker, DEFAULT_SELECTION_MARKER);
        assert!(settings.vsync);
        assert!(!settings.offline);
    }

    #[test]
    fn file_values_override_defaults() {
        let file = ConfigFile::parse(
            r#"
            [endpoints]
            map_url = "http://maps.local/grid.csv"

            [camera]
            initial_zoom = 2.0
            max_zoom = 8.0

            [selection]
            marker = "TK"
            "#,
        )
        .expect("valid config");

        let settings = Settings::merge(&args(&[]), file).expect("valid settings");

        assert_eq!(settings.endpoints.map_url, "http://maps.local/grid.csv");
        assert_eq!(settings.endpoints.sprite_url, Endpoints::DEFAULT_SPRITE_URL);
        assert_eq!(settings.camera.initial_zoom(), 2.0);
        assert_eq!(settings.camera.min_zoom(), CameraConfig::DEFAULT_MIN_ZOOM);
        assert_eq!(settings.camera.max_zoom(), 8.0);
        assert_eq!(settings.marker, "TK");
    }

    #[test]
    fn flags_override_file_values() {
        let file = ConfigFile::parse(
            r#"
            [endpoints]
            map_url = "http://file/map.csv"
            report_url = "http://file/selection"
            "#,
        )
        .expect("valid config");

        let settings = Settings::merge(
            &args(&["--map-url", "http://flag/map.csv", "--no-vsync", "--offline"]),
            file,
        )
        .expect("valid settings");

        assert_eq!(settings.endpoints.map_url, "http://flag/map.csv");
        assert_eq!(settings.endpoints.report_url, "http://file/selection");
        assert!(!settings.vsync);
        assert!(settings.offline);
    }

    #[test]
    fn last_vsync_flag_wins() {
        assert!(args(&["--no-vsync", "--vsync"]).vsync_enabled());
        assert!(!args(&["--vsync", "--no-vsync"]).vsync_enabled());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ConfigFile::parse("[camera]\nzoom = 2.0\n").is_err());
        assert!(ConfigFile::parse("[network]\n").is_err());
    }

    #[test]
    fn inverted_zoom_bounds_are_rejected() {
        let file = ConfigFile::parse("[camera]\nmin_zoom = 3.0\nmax_zoom = 2.0\n")
            .expect("syntactically valid");

        assert!(Settings::merge(&args(&[]), file).is_err());
    }

    #[test]
    fn initial_zoom_outside_bounds_is_rejected() {
        let file = ConfigFile::parse("[camera]\ninitial_zoom = 0.1\n").expect("syntactically valid");

        assert!(Settings::merge(&args(&[]), file).is_err());
    }

    #[test]
    fn blank_marker_is_rejected() {
        let file = ConfigFile::parse("[selection]\nmarker = \"  \"\n").expect("syntactically valid");

        assert!(Settings::merge(&args(&[]), file).is_err());
    }

    #[test]
    fn window_settings_come_from_file_and_flags() {
        let defaults = Settings::merge(&args(&[]), ConfigFile::default()).expect("defaults valid");
        assert_eq!(
            defaults.window_size,
            (
                MacroquadBackend::DEFAULT_WINDOW_WIDTH,
                MacroquadBackend::DEFAULT_WINDOW_HEIGHT
            )
        );
        assert!(defaults.mouse_emulation);

        let file = ConfigFile::parse("[window]\nwidth = 1080\nheight = 1920\n").expect("valid config");
        let settings =
            Settings::merge(&args(&["--no-mouse-emulation"]), file).expect("valid settings");
        assert_eq!(settings.window_size, (1080, 1920));
        assert!(!settings.mouse_emulation);
    }

    #[test]
    fn zero_sized_window_is_rejected() {
        let file = ConfigFile::parse("[window]\nwidth = 0\n").expect("syntactically valid");

        assert!(Settings::merge(&args(&[]), file).is_err());
    }
}
