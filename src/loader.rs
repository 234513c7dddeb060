//! Background asset loading.
//!
//! The three startup assets (model, environment, LUT) are read and decoded
//! concurrently on plain threads; results come back over an mpsc channel and
//! are applied on the event-loop thread between frames, so GPU state is only
//! ever touched from one thread. There is no cancellation or retry: a failed
//! load is delivered as an error and ends the load sequence.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use crate::config::AssetPaths;
use crate::environment::EnvironmentData;
use crate::error::LoadError;
use crate::lut::Lut3d;
use crate::model::ModelData;

/// One decoded asset delivered by a loader thread.
pub enum LoadedAsset {
    Model(ModelData),
    Environment(EnvironmentData),
    Lut(Lut3d),
}

impl LoadedAsset {
    pub fn kind(&self) -> &'static str {
        match self {
            LoadedAsset::Model(_) => "model",
            LoadedAsset::Environment(_) => "environment",
            LoadedAsset::Lut(_) => "lut",
        }
    }
}

/// Handle to the in-flight load sequence.
pub struct AssetLoader {
    rx: Receiver<Result<LoadedAsset, LoadError>>,
    outstanding: u32,
}

impl AssetLoader {
    /// Number of assets a full load sequence delivers.
    pub const EXPECTED: u32 = 3;

    /// Spawn the loader threads for all three assets.
    pub fn spawn(paths: &AssetPaths) -> Self {
        let (tx, rx) = mpsc::channel();

        spawn_load(tx.clone(), paths.model.clone(), |bytes| {
            ModelData::decode(&bytes).map(LoadedAsset::Model)
        });
        spawn_load(tx.clone(), paths.environment.clone(), |bytes| {
            EnvironmentData::decode(&bytes).map(LoadedAsset::Environment)
        });
        spawn_load(tx, paths.lut.clone(), |bytes| {
            let text = String::from_utf8(bytes)
                .map_err(|e| LoadError::decode("3dl LUT", e))?;
            Lut3d::parse_3dl(&text).map(LoadedAsset::Lut)
        });

        Self {
            rx,
            outstanding: Self::EXPECTED,
        }
    }

    /// Poll for the next completed load without blocking.
    ///
    /// Returns `None` while loads are still running (or after all have been
    /// drained); a hung-up channel with deliveries still outstanding is
    /// surfaced as [`LoadError::ChannelClosed`].
    pub fn poll(&mut self) -> Option<Result<LoadedAsset, LoadError>> {
        if self.outstanding == 0 {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.outstanding -= 1;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.outstanding = 0;
                Some(Err(LoadError::ChannelClosed))
            }
        }
    }
}

fn spawn_load<F>(tx: Sender<Result<LoadedAsset, LoadError>>, path: String, decode: F)
where
    F: FnOnce(Vec<u8>) -> Result<LoadedAsset, LoadError> + Send + 'static,
{
    thread::spawn(move || {
        log::debug!("loading {path}");
        let result = std::fs::read(&path)
            .map_err(LoadError::from)
            .and_then(decode);
        if let Err(e) = &result {
            log::error!("failed to load {path}: {e}");
        }
        // The receiver may already be gone if the window closed mid-load.
        let _ = tx.send(result);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_surface_io_errors() {
        let paths = AssetPaths {
            model: "/nonexistent/pot.glb".into(),
            environment: "/nonexistent/env.hdr".into(),
            lut: "/nonexistent/lut.3dl".into(),
        };
        let mut loader = AssetLoader::spawn(&paths);

        let mut errors = 0;
        while errors < AssetLoader::EXPECTED {
            if let Some(result) = loader.poll() {
                assert!(matches!(result, Err(LoadError::Io(_))));
                errors += 1;
            } else {
                thread::yield_now();
            }
        }
        // Drained: further polls stay quiet.
        assert!(loader.poll().is_none());
    }
}
