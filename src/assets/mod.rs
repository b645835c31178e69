//! Asset loading
//!
//! Meshes and textures load in the background and are polled once per frame
//! (fire-and-poll; the composer tolerates anything still pending by drawing
//! a placeholder). A load failure is logged and the slot stays failed - no
//! retry, no crash, the item simply never resolves.

pub mod loader;
pub mod mesh;

use loader::{load_image_async, load_mesh_async, PendingImage, PendingMesh};
use macroquad::texture::{FilterMode, Texture2D};
use mesh::MeshData;
use std::collections::HashMap;
use std::fmt;

/// Asset error types
#[derive(Debug, Clone, PartialEq)]
pub enum AssetError {
    /// File could not be read
    Io(String),
    /// Image bytes could not be decoded
    Decode(String),
    /// Mesh file could not be parsed
    Parse(String),
    /// Worker disappeared without reporting
    Other(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(msg) => write!(f, "I/O error: {}", msg),
            AssetError::Decode(msg) => write!(f, "decode error: {}", msg),
            AssetError::Parse(msg) => write!(f, "parse error: {}", msg),
            AssetError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AssetError {}

impl From<std::io::Error> for AssetError {
    fn from(e: std::io::Error) -> Self {
        AssetError::Io(e.to_string())
    }
}

enum TextureSlot {
    Loading(PendingImage),
    Ready(Texture2D),
    Failed(AssetError),
}

enum MeshSlot {
    Loading(PendingMesh),
    Ready(MeshData),
    Failed(AssetError),
}

/// Owns every requested texture and mesh, keyed by path. Requests are
/// idempotent; `poll` advances pending loads once per frame on the main
/// thread (GPU textures must be created there).
#[derive(Default)]
pub struct AssetStore {
    textures: HashMap<String, TextureSlot>,
    meshes: HashMap<String, MeshSlot>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kick off a texture load. Already-known paths are left alone.
    pub fn request_texture(&mut self, path: &str) {
        if !self.textures.contains_key(path) {
            self.textures.insert(
                path.to_string(),
                TextureSlot::Loading(load_image_async(path.to_string())),
            );
        }
    }

    /// Kick off a mesh load. Already-known paths are left alone.
    pub fn request_mesh(&mut self, path: &str) {
        if !self.meshes.contains_key(path) {
            self.meshes.insert(
                path.to_string(),
                MeshSlot::Loading(load_mesh_async(path.to_string())),
            );
        }
    }

    /// Advance all pending loads. Completions and failures are logged;
    /// progress beyond that is advisory only.
    pub fn poll(&mut self) {
        for (path, slot) in self.textures.iter_mut() {
            if let TextureSlot::Loading(pending) = slot {
                if let Some(result) = pending.op.try_take() {
                    *slot = match result {
                        Ok(img) => {
                            let texture = Texture2D::from_rgba8(img.width, img.height, &img.rgba);
                            texture.set_filter(FilterMode::Linear);
                            println!("Loaded texture {} ({}x{})", path, img.width, img.height);
                            TextureSlot::Ready(texture)
                        }
                        Err(e) => {
                            eprintln!("Failed to load texture {}: {}", path, e);
                            TextureSlot::Failed(e)
                        }
                    };
                }
            }
        }

        for (path, slot) in self.meshes.iter_mut() {
            if let MeshSlot::Loading(pending) = slot {
                if let Some(result) = pending.op.try_take() {
                    *slot = match result {
                        Ok(data) => {
                            println!(
                                "Loaded mesh {} ({} vertices, {} triangles)",
                                path,
                                data.vertices.len(),
                                data.indices.len() / 3
                            );
                            MeshSlot::Ready(data)
                        }
                        Err(e) => {
                            eprintln!("Failed to load mesh {}: {}", path, e);
                            MeshSlot::Failed(e)
                        }
                    };
                }
            }
        }
    }

    /// The resolved texture for a path, if it has loaded.
    pub fn texture(&self, path: &str) -> Option<&Texture2D> {
        match self.textures.get(path) {
            Some(TextureSlot::Ready(texture)) => Some(texture),
            _ => None,
        }
    }

    /// The resolved mesh for a path, if it has loaded.
    pub fn mesh(&self, path: &str) -> Option<&MeshData> {
        match self.meshes.get(path) {
            Some(MeshSlot::Ready(data)) => Some(data),
            _ => None,
        }
    }

    /// (settled, requested) counts across both kinds. Failures count as
    /// settled - this only feeds the loading overlay and logs.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.textures.len() + self.meshes.len();
        let pending = self
            .textures
            .values()
            .filter(|s| matches!(s, TextureSlot::Loading(_)))
            .count()
            + self
                .meshes
                .values()
                .filter(|s| matches!(s, MeshSlot::Loading(_)))
                .count();
        (total - pending, total)
    }

    pub fn is_idle(&self) -> bool {
        let (settled, total) = self.progress();
        settled == total
    }
}
