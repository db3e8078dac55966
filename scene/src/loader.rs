use std::sync::mpsc::{channel, Receiver, Sender};

use crate::models::{load_gltf, load_image, ImageData, ModelData};

/// The assets the viewer loads in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Ger,
    DoorClosed,
    DoorOpen,
    Background,
}

impl AssetKind {
    fn is_image(&self) -> bool {
        matches!(self, AssetKind::Background)
    }
}

#[derive(Debug)]
pub enum AssetData {
    Model(ModelData),
    Image(ImageData),
}

/// The outcome of one load request. Errors are kept as text so they can cross threads.
#[derive(Debug)]
pub struct LoadedAsset {
    pub kind: AssetKind,
    pub path: String,
    pub result: Result<AssetData, String>,
}

/// Loads models and images without blocking the render loop.
///
/// Each request runs on its own thread and reports back through a channel
/// that is drained once per frame with [`AssetLoader::poll`]. Requests finish
/// in any order.
///
/// Loading from files is not supported on wasm32: there is no file system in
/// the browser, so every request there fails at once with an error and the
/// viewer keeps the empty slot.
pub struct AssetLoader {
    sender: Sender<LoadedAsset>,
    receiver: Receiver<LoadedAsset>,
    pending: usize,
}

impl AssetLoader {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver, pending: 0 }
    }

    pub fn request(&mut self, kind: AssetKind, path: &str) {
        log::info!("Loading {:?} from {}", kind, path);
        self.pending += 1;
        let sender = self.sender.clone();
        let path = path.to_string();

        cfg_if::cfg_if! {
            if #[cfg(target_arch = "wasm32")] {
                let _ = sender.send(unsupported_on_web(kind, path));
            } else {
                std::thread::spawn(move || {
                    // The receiver is gone only when the viewer shut down
                    let _ = sender.send(load_asset(kind, path));
                });
            }
        }
    }

    /// Returns every asset that finished since the last call.
    pub fn poll(&mut self) -> Vec<LoadedAsset> {
        let finished: Vec<LoadedAsset> = self.receiver.try_iter().collect();
        self.pending = self.pending.saturating_sub(finished.len());
        finished
    }

    /// Number of requests that have not been delivered by [`AssetLoader::poll`] yet.
    pub fn pending(&self) -> usize {
        self.pending
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn load_asset(kind: AssetKind, path: String) -> LoadedAsset {
    let result = if kind.is_image() {
        load_image(&path).map(AssetData::Image)
    } else {
        load_gltf(&path).map(AssetData::Model)
    };
    LoadedAsset {
        kind,
        path,
        result: result.map_err(|e| format!("{:#}", e)),
    }
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn unsupported_on_web(kind: AssetKind, path: String) -> LoadedAsset {
    LoadedAsset {
        kind,
        result: Err(format!("Cannot read {} on wasm32, loading from files is not supported", path)),
        path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for(loader: &mut AssetLoader, count: usize) -> Vec<LoadedAsset> {
        let start = Instant::now();
        let mut finished = Vec::new();
        while finished.len() < count && start.elapsed() < Duration::from_secs(10) {
            finished.extend(loader.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        finished
    }

    #[test]
    fn test_missing_files_report_errors() {
        let mut loader = AssetLoader::new();
        assert_eq!(loader.pending(), 0);
        loader.request(AssetKind::DoorOpen, "path/to/missing.glb");
        loader.request(AssetKind::Background, "path/to/missing.jpg");
        assert_eq!(loader.pending(), 2);

        let finished = wait_for(&mut loader, 2);
        assert_eq!(finished.len(), 2);
        assert_eq!(loader.pending(), 0);
        for asset in &finished {
            assert!(asset.result.is_err());
            assert!(asset.result.as_ref().err().is_some_and(|e| e.contains("missing")));
        }
        assert!(finished.iter().any(|a| a.kind == AssetKind::DoorOpen));
        assert!(finished.iter().any(|a| a.kind == AssetKind::Background));
    }

    #[test]
    fn test_poll_without_requests() {
        let mut loader = AssetLoader::default();
        assert!(loader.poll().is_empty());
    }

    #[test]
    fn test_web_requests_fail_with_reason() {
        let asset = unsupported_on_web(AssetKind::Ger, "res/models/ger_.glb".to_string());
        assert_eq!(asset.kind, AssetKind::Ger);
        let err = asset.result.err().unwrap_or_default();
        assert!(err.contains("res/models/ger_.glb"));
        assert!(err.contains("not supported"));
    }
}
