#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Network adapter for Scroller.
//!
//! Downloads run on worker threads and never block the render loop. The map
//! and sprite are fetched once by [`AssetLoader`] and handed over through a
//! one-shot channel; selection reports are posted by [`SelectionNotifier`].

mod http;
mod loader;
mod notifier;

use scroller_core::{MapError, MapModel, SelectionReport};
use thiserror::Error;

pub use http::HttpClient;
pub use loader::{AssetHandoff, AssetLoader, LoadedAssets, MapOrigin};
pub use notifier::SelectionNotifier;

/// URLs of the remote resources used by the viewer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    /// Location of the comma-separated map payload.
    pub map_url: String,
    /// Location of the PNG sprite used for tanks.
    pub sprite_url: String,
    /// Location that receives selection reports.
    pub report_url: String,
}

impl Endpoints {
    /// Default map location.
    pub const DEFAULT_MAP_URL: &'static str = "http://127.0.0.1:8080/map.csv";

    /// Default sprite location.
    pub const DEFAULT_SPRITE_URL: &'static str = "http://127.0.0.1:8080/tank.png";

    /// Default selection report location.
    pub const DEFAULT_REPORT_URL: &'static str = "http://127.0.0.1:8080/selection";
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            map_url: Self::DEFAULT_MAP_URL.to_owned(),
            sprite_url: Self::DEFAULT_SPRITE_URL.to_owned(),
            report_url: Self::DEFAULT_REPORT_URL.to_owned(),
        }
    }
}

/// Errors raised while talking to the remote endpoints.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The request could not be performed or its body could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("{url} answered with status {status}")]
    Status {
        /// Requested location.
        url: String,
        /// HTTP status code returned by the server.
        status: u16,
    },
    /// The map payload was downloaded but could not be ingested.
    #[error("malformed map payload: {0}")]
    Malformed(#[from] MapError),
    /// The selection report could not be encoded.
    #[error("failed to encode selection report: {0}")]
    Encode(#[from] serde_json::Error),
    /// A worker thread could not be started.
    #[error("failed to start network worker: {0}")]
    Worker(#[from] std::io::Error),
}

/// Source of the map and sprite shown by the viewer.
pub trait DataSource: Send + 'static {
    /// Downloads and parses the map.
    fn fetch_map(&self) -> Result<MapModel, NetworkError>;

    /// Downloads the encoded sprite image.
    fn fetch_sprite(&self) -> Result<Vec<u8>, NetworkError>;
}

/// Receiver of selection reports.
pub trait SelectionSink: Send + 'static {
    /// Delivers a single report.
    fn notify(&self, report: &SelectionReport) -> Result<(), NetworkError>;
}
