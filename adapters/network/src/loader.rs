use std::{
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
};

use scroller_core::MapModel;
use tracing::{info, warn};

use crate::{DataSource, NetworkError};

/// Where the delivered map came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapOrigin {
    /// The map was downloaded and parsed successfully.
    Downloaded,
    /// The built-in map replaced unavailable or malformed data.
    Fallback,
}

/// Complete payload produced by the loader.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedAssets {
    /// Map to display.
    pub map: MapModel,
    /// Where `map` came from.
    pub origin: MapOrigin,
    /// Encoded sprite image, when it could be downloaded.
    pub sprite: Option<Vec<u8>>,
}

impl LoadedAssets {
    /// Built-in map without a sprite.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            map: MapModel::fallback(),
            origin: MapOrigin::Fallback,
            sprite: None,
        }
    }
}

/// Starts background downloads.
#[derive(Debug)]
pub struct AssetLoader;

impl AssetLoader {
    /// Downloads the map and sprite from `source` on a worker thread.
    pub fn spawn<S: DataSource>(source: S) -> Result<AssetHandoff, NetworkError> {
        let (sender, receiver) = mpsc::sync_channel(1);
        let _worker = thread::Builder::new()
            .name("asset-loader".to_owned())
            .spawn(move || {
                let _ = sender.send(load(&source));
            })?;
        Ok(AssetHandoff {
            receiver: Some(receiver),
        })
    }
}

/// Fetches everything the viewer needs, substituting the fallback map on failure.
///
/// The sprite is requested even when the map is not, so the fallback map can
/// still show textured tanks.
pub(crate) fn load<S: DataSource + ?Sized>(source: &S) -> LoadedAssets {
    let (map, origin) = match source.fetch_map() {
        Ok(map) => {
            info!(width = map.width(), height = map.height(), "map downloaded");
            (map, MapOrigin::Downloaded)
        }
        Err(error) => {
            warn!(%error, "map unavailable, showing built-in map");
            (MapModel::fallback(), MapOrigin::Fallback)
        }
    };

    let sprite = match source.fetch_sprite() {
        Ok(bytes) => {
            info!(bytes = bytes.len(), "sprite downloaded");
            Some(bytes)
        }
        Err(error) => {
            warn!(%error, "sprite unavailable, tanks drawn as outlines only");
            None
        }
    };

    LoadedAssets {
        map,
        origin,
        sprite,
    }
}

/// Receiving end of a one-shot asset delivery.
#[derive(Debug)]
pub struct AssetHandoff {
    receiver: Option<Receiver<LoadedAssets>>,
}

impl AssetHandoff {
    /// Handoff that delivers the built-in map on the first poll.
    #[must_use]
    pub fn offline() -> Self {
        let (sender, receiver) = mpsc::sync_channel(1);
        let _ = sender.send(LoadedAssets::fallback());
        Self {
            receiver: Some(receiver),
        }
    }

    /// Reports whether the payload has yet to be delivered.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }

    /// Returns the payload once it is available; never blocks.
    ///
    /// Yields at most one payload. A worker that exits without delivering
    /// produces the fallback payload.
    pub fn poll(&mut self) -> Option<LoadedAssets> {
        let receiver = self.receiver.as_ref()?;
        let assets = match receiver.try_recv() {
            Ok(assets) => assets,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                warn!("asset loader stopped without delivering, showing built-in map");
                LoadedAssets::fallback()
            }
        };
        self.receiver = None;
        Some(assets)
    }
}
