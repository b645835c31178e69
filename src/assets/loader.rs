//! Background asset loading
//!
//! File reads, image decodes and OBJ parsing run on worker threads and
//! report back over channels polled once per frame. On WASM there are no
//! threads; loads run as macroquad coroutines over the fetch-backed file
//! API and land in a shared slot, which keeps the polling call sites
//! identical on both targets.

use super::mesh::{parse_obj, MeshData};
use super::AssetError;

#[cfg(not(target_arch = "wasm32"))]
use std::sync::mpsc::{channel, Receiver, TryRecvError};
#[cfg(not(target_arch = "wasm32"))]
use std::thread;

#[cfg(target_arch = "wasm32")]
use macroquad::experimental::coroutines::start_coroutine;
#[cfg(target_arch = "wasm32")]
use macroquad::file::{load_file, load_string};
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

/// Result type for background loads
pub type AssetResult<T> = Result<T, AssetError>;

/// A decoded image ready to become a GPU texture on the main thread.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u16,
    pub height: u16,
    pub rgba: Vec<u8>,
}

/// A handle to a pending background load that can be polled
#[cfg(not(target_arch = "wasm32"))]
pub struct AsyncOp<T> {
    receiver: Receiver<AssetResult<T>>,
    result: Option<AssetResult<T>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl<T> AsyncOp<T> {
    fn from_receiver(receiver: Receiver<AssetResult<T>>) -> Self {
        Self {
            receiver,
            result: None,
        }
    }

    /// Poll the channel and take the result if the load has finished.
    pub fn try_take(&mut self) -> Option<AssetResult<T>> {
        if self.result.is_none() {
            match self.receiver.try_recv() {
                Ok(result) => self.result = Some(result),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    // Worker panicked or dropped the sender
                    self.result = Some(Err(AssetError::Other("load worker died".into())));
                }
            }
        }
        self.result.take()
    }
}

/// Pending image load
pub struct PendingImage {
    pub op: AsyncOp<DecodedImage>,
    pub path: String,
}

/// Pending mesh load
pub struct PendingMesh {
    pub op: AsyncOp<MeshData>,
    pub path: String,
}

fn decode_image(bytes: &[u8]) -> AssetResult<DecodedImage> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| AssetError::Decode(e.to_string()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(DecodedImage {
        width: width as u16,
        height: height as u16,
        rgba: decoded.into_raw(),
    })
}

/// Start an async image load (read + decode off the main thread).
#[cfg(not(target_arch = "wasm32"))]
pub fn load_image_async(path: String) -> PendingImage {
    let (sender, receiver) = channel();
    let worker_path = path.clone();

    thread::spawn(move || {
        let result = std::fs::read(&worker_path)
            .map_err(AssetError::from)
            .and_then(|bytes| decode_image(&bytes));
        let _ = sender.send(result);
    });

    PendingImage {
        op: AsyncOp::from_receiver(receiver),
        path,
    }
}

/// Start an async mesh load (read + OBJ parse off the main thread).
#[cfg(not(target_arch = "wasm32"))]
pub fn load_mesh_async(path: String) -> PendingMesh {
    let (sender, receiver) = channel();
    let worker_path = path.clone();

    thread::spawn(move || {
        let result = std::fs::read_to_string(&worker_path)
            .map_err(AssetError::from)
            .and_then(|contents| parse_obj(&contents));
        let _ = sender.send(result);
    });

    PendingMesh {
        op: AsyncOp::from_receiver(receiver),
        path,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WASM variants (no threads; coroutines over the fetch-backed file API)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
pub struct AsyncOp<T> {
    slot: Rc<RefCell<Option<AssetResult<T>>>>,
}

#[cfg(target_arch = "wasm32")]
impl<T> AsyncOp<T> {
    pub fn try_take(&mut self) -> Option<AssetResult<T>> {
        self.slot.borrow_mut().take()
    }
}

#[cfg(target_arch = "wasm32")]
pub fn load_image_async(path: String) -> PendingImage {
    let slot = Rc::new(RefCell::new(None));
    let writer = Rc::clone(&slot);
    let worker_path = path.clone();

    start_coroutine(async move {
        let result = load_file(&worker_path)
            .await
            .map_err(|e| AssetError::Io(e.to_string()))
            .and_then(|bytes| decode_image(&bytes));
        *writer.borrow_mut() = Some(result);
    });

    PendingImage {
        op: AsyncOp { slot },
        path,
    }
}

#[cfg(target_arch = "wasm32")]
pub fn load_mesh_async(path: String) -> PendingMesh {
    let slot = Rc::new(RefCell::new(None));
    let writer = Rc::clone(&slot);
    let worker_path = path.clone();

    start_coroutine(async move {
        let result = load_string(&worker_path)
            .await
            .map_err(|e| AssetError::Io(e.to_string()))
            .and_then(|contents| parse_obj(&contents));
        *writer.borrow_mut() = Some(result);
    });

    PendingMesh {
        op: AsyncOp { slot },
        path,
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn wait_for<T>(op: &mut AsyncOp<T>) -> AssetResult<T> {
        for _ in 0..200 {
            if let Some(result) = op.try_take() {
                return result;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("load did not complete in time");
    }

    #[test]
    fn test_load_image_async_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let mut pending = load_image_async(path.to_string_lossy().to_string());
        let img = wait_for(&mut pending.op).unwrap();
        assert_eq!((img.width, img.height), (4, 2));
        assert_eq!(img.rgba.len(), 4 * 2 * 4);
        assert_eq!(&img.rgba[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_load_image_async_missing_file() {
        let mut pending = load_image_async("definitely/not/here.png".to_string());
        assert!(matches!(wait_for(&mut pending.op), Err(AssetError::Io(_))));
    }

    #[test]
    fn test_load_image_async_bad_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"not an image at all").unwrap();
        drop(file);

        let mut pending = load_image_async(path.to_string_lossy().to_string());
        assert!(matches!(
            wait_for(&mut pending.op),
            Err(AssetError::Decode(_))
        ));
    }

    #[test]
    fn test_load_mesh_async_parses_obj() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n"
        )
        .unwrap();
        drop(file);

        let mut pending = load_mesh_async(path.to_string_lossy().to_string());
        let mesh = wait_for(&mut pending.op).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices.len(), 3);
    }
}
