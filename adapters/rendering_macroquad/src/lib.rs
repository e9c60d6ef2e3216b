#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Scroller.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! macroquad is used without its default `audio` feature.
//!
//! Touch input is forwarded as-is; on desktop platforms the left mouse button
//! can stand in for a single touch contact.

mod input;
mod surface;
mod texture;

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_down, mouse_position, simulate_mouse_with_touch, touches,
    KeyCode, MouseButton,
};
use scroller_core::Viewport;
use scroller_rendering::{Color, DrawBackend, FrameInput, Presentation, RenderingBackend};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};
use tracing::{debug, info};

use self::{input::InputTranslator, surface::MacroquadSurface};

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    mouse_emulation: bool,
    window_size: (i32, i32),
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            mouse_emulation: true,
            window_size: (Self::DEFAULT_WINDOW_WIDTH, Self::DEFAULT_WINDOW_HEIGHT),
        }
    }
}

impl MacroquadBackend {
    /// Initial window width in logical pixels.
    pub const DEFAULT_WINDOW_WIDTH: i32 = 540;

    /// Initial window height in logical pixels.
    pub const DEFAULT_WINDOW_HEIGHT: i32 = 960;

    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the left mouse button emulates a touch contact.
    #[must_use]
    pub fn with_mouse_emulation(mut self, enabled: bool) -> Self {
        self.mouse_emulation = enabled;
        self
    }

    /// Sets the initial window size in logical pixels.
    #[must_use]
    pub fn with_window_size(mut self, width: i32, height: i32) -> Self {
        self.window_size = (width, height);
        self
    }
}

/// Durations measured for a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    update: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    update_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_update: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += breakdown.update;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let update_accum = self.update_accum;
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.update_accum = Duration::ZERO;
        if seconds <= f32::EPSILON || frames == 0 {
            return None;
        }

        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_update: update_accum / frames,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_frame: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut dyn DrawBackend) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            mouse_emulation,
            window_size,
        } = self;

        let Presentation {
            window_title,
            clear_color,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_size.0,
            window_height: window_size.1,
            high_dpi: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        info!(?swap_interval, mouse_emulation, "starting macroquad render loop");
        macroquad::Window::from_config(config, async move {
            let background = to_macroquad_color(clear_color);
            let mut surface = MacroquadSurface::default();
            let mut translator = InputTranslator::new(mouse_emulation);
            simulate_mouse_with_touch(false);
            let mut fps_counter = FpsCounter::default();

            loop {
                if is_key_pressed(KeyCode::Escape) {
                    debug!("quit requested");
                    break;
                }

                macroquad::window::clear_background(background);

                let viewport = Viewport::new(
                    macroquad::window::screen_width().max(0.0) as u32,
                    macroquad::window::screen_height().max(0.0) as u32,
                );
                let (mouse_x, mouse_y) = mouse_position();
                let touch_events = translator.translate(
                    &touches(),
                    is_mouse_button_down(MouseButton::Left),
                    Vec2::new(mouse_x, mouse_y),
                );

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = FrameInput {
                    dt: frame_dt,
                    viewport,
                    touches: touch_events,
                };

                let update_start = Instant::now();
                update_frame(frame_input, &mut surface);
                let update = update_start.elapsed();
                macroquad::camera::set_default_camera();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    update,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_update,
                    }) = fps_metrics
                    {
                        info!(
                            fps = per_second,
                            fps_10s = trailing_ten_seconds,
                            update_ms = avg_update.as_secs_f64() * 1_000.0,
                            "frame timing"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        info!("render loop finished");
        Ok(())
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
