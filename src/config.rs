//! Shelf configuration
//!
//! The whole presentation is data-driven from a RON file: ring radius, book
//! list with texture maps, transition tuning, display policy and the decor
//! model. Loading validates the file with explicit limits so a malformed
//! shelf degrades to an error (and the caller to a default shelf) instead of
//! a broken scene.

use crate::carousel::selection::TransitionStyle;
use crate::carousel::tween::Easing;
use crate::carousel::Pose;
use macroquad::math::vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::fs;
use std::path::Path;

/// Validation limits to keep a hand-edited shelf file from exploding the scene
pub mod limits {
    /// Maximum number of books on the ring
    pub const MAX_BOOKS: usize = 64;
    /// Maximum length for asset path strings
    pub const MAX_PATH_LEN: usize = 256;
    /// Maximum coordinate/radius magnitude
    pub const MAX_COORD: f32 = 1_000_000.0;
    /// Maximum transition duration in seconds
    pub const MAX_DURATION: f32 = 60.0;
}

/// Error type for shelf loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    ValidationError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Texture maps for one book. Only the base colour map is required; the
/// PBR-style extras are optional per book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureSet {
    pub base_color: String,
    #[serde(default)]
    pub normal: Option<String>,
    #[serde(default)]
    pub occlusion: Option<String>,
    #[serde(default)]
    pub metallic_roughness: Option<String>,
}

impl TextureSet {
    pub fn base_only(base_color: impl Into<String>) -> Self {
        Self {
            base_color: base_color.into(),
            normal: None,
            occlusion: None,
            metallic_roughness: None,
        }
    }

    /// All configured map paths, required first.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.base_color.as_str())
            .chain(self.normal.as_deref())
            .chain(self.occlusion.as_deref())
            .chain(self.metallic_roughness.as_deref())
    }
}

/// One book entry in the shelf file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSpec {
    pub title: String,
    #[serde(default = "default_book_mesh")]
    pub mesh: String,
    pub textures: TextureSet,
}

fn default_book_mesh() -> String {
    "assets/models/book.obj".to_string()
}

/// What happens to non-selected books while one is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayPolicy {
    /// Keep the others visible, tinted down.
    #[default]
    DimOthers,
    /// Hide everything except the selected book.
    HideOthers,
}

/// A serializable pose ([x, y, z] + yaw).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseSpec {
    pub position: [f32; 3],
    pub yaw: f32,
}

impl PoseSpec {
    pub fn to_pose(self) -> Pose {
        Pose {
            position: vec3(self.position[0], self.position[1], self.position[2]),
            yaw: self.yaw,
        }
    }
}

/// Transition tuning as stored in the shelf file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSpec {
    pub duration: f32,
    pub easing: Easing,
    pub presentation: PoseSpec,
    pub dismiss_scale: f32,
    pub dismiss_lift: f32,
}

impl Default for TransitionSpec {
    fn default() -> Self {
        let style = TransitionStyle::default();
        Self {
            duration: style.duration,
            easing: style.easing,
            presentation: PoseSpec {
                position: [0.0, 0.0, 5.0],
                yaw: FRAC_PI_2,
            },
            dismiss_scale: style.dismiss_scale,
            dismiss_lift: style.dismiss_lift,
        }
    }
}

impl TransitionSpec {
    pub fn style(&self) -> TransitionStyle {
        TransitionStyle {
            presentation: self.presentation.to_pose(),
            dismiss_scale: self.dismiss_scale,
            dismiss_lift: self.dismiss_lift,
            duration: self.duration,
            easing: self.easing,
        }
    }
}

/// The secondary decorative model shown while a book is presented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorSpec {
    pub mesh: String,
    pub position: [f32; 3],
    #[serde(default)]
    pub yaw: f32,
    #[serde(default = "default_decor_scale")]
    pub scale: f32,
}

fn default_decor_scale() -> f32 {
    1.0
}

/// The whole shelf file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    /// Heading drawn over the scene.
    pub title: String,
    pub radius: f32,
    /// Global rotation applied to the whole ring.
    pub rotation_offset: f32,
    pub transition: TransitionSpec,
    pub display: DisplayPolicy,
    pub books: Vec<BookSpec>,
    pub decor: Option<DecorSpec>,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        let covers = [
            "assets/textures/book_albedo2.png",
            "assets/textures/book_albedo.png",
            "assets/textures/book_albedo3.png",
            "assets/textures/book_albedo4.png",
            "assets/textures/book_albedo5.png",
            "assets/textures/book_albedo3.png",
            "assets/textures/book_albedo4.png",
            "assets/textures/book_albedo5.png",
        ];

        Self {
            title: "Welcome to My Portfolio".to_string(),
            radius: 12.0,
            rotation_offset: 0.0,
            transition: TransitionSpec::default(),
            display: DisplayPolicy::default(),
            books: covers
                .iter()
                .enumerate()
                .map(|(i, cover)| BookSpec {
                    title: format!("Book {}", i + 1),
                    mesh: default_book_mesh(),
                    textures: TextureSet::base_only(*cover),
                })
                .collect(),
            decor: Some(DecorSpec {
                mesh: "assets/models/vivi.obj".to_string(),
                position: [12.0, -10.0, -10.0],
                yaw: -1.0,
                scale: 4.0,
            }),
        }
    }
}

fn is_valid_float(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_COORD
}

fn validate_path(path: &str, context: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err(format!("{}: empty asset path", context));
    }
    if path.len() > limits::MAX_PATH_LEN {
        return Err(format!(
            "{}: asset path too long ({} > {})",
            context,
            path.len(),
            limits::MAX_PATH_LEN
        ));
    }
    Ok(())
}

fn validate_book(book: &BookSpec, idx: usize) -> Result<(), String> {
    let context = format!("book[{}]", idx);
    validate_path(&book.mesh, &context)?;
    for path in book.textures.paths() {
        validate_path(path, &context)?;
    }
    Ok(())
}

/// Validate an entire shelf
pub fn validate_shelf(config: &ShelfConfig) -> Result<(), ConfigError> {
    if config.books.len() > limits::MAX_BOOKS {
        return Err(ConfigError::ValidationError(format!(
            "too many books ({} > {})",
            config.books.len(),
            limits::MAX_BOOKS
        )));
    }

    if !is_valid_float(config.radius) || config.radius <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "invalid radius {}",
            config.radius
        )));
    }

    if !config.rotation_offset.is_finite() {
        return Err(ConfigError::ValidationError(
            "rotation_offset is not finite".to_string(),
        ));
    }

    let t = &config.transition;
    if !t.duration.is_finite() || t.duration < 0.0 || t.duration > limits::MAX_DURATION {
        return Err(ConfigError::ValidationError(format!(
            "invalid transition duration {}",
            t.duration
        )));
    }
    if !is_valid_float(t.dismiss_scale) || t.dismiss_scale <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "invalid dismiss_scale {}",
            t.dismiss_scale
        )));
    }
    if !is_valid_float(t.dismiss_lift) {
        return Err(ConfigError::ValidationError(format!(
            "invalid dismiss_lift {}",
            t.dismiss_lift
        )));
    }
    for (i, c) in t.presentation.position.iter().enumerate() {
        if !is_valid_float(*c) {
            return Err(ConfigError::ValidationError(format!(
                "invalid presentation position[{}] = {}",
                i, c
            )));
        }
    }

    for (i, book) in config.books.iter().enumerate() {
        validate_book(book, i).map_err(ConfigError::ValidationError)?;
    }

    if let Some(decor) = &config.decor {
        validate_path(&decor.mesh, "decor").map_err(ConfigError::ValidationError)?;
        if !is_valid_float(decor.scale) || decor.scale <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "decor: invalid scale {}",
                decor.scale
            )));
        }
        for (i, c) in decor.position.iter().enumerate() {
            if !is_valid_float(*c) {
                return Err(ConfigError::ValidationError(format!(
                    "decor: invalid position[{}] = {}",
                    i, c
                )));
            }
        }
    }

    Ok(())
}

/// Load a shelf from a RON file.
pub fn load_shelf<P: AsRef<Path>>(path: P) -> Result<ShelfConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_shelf_from_str(&contents)
}

/// Parse a shelf from a RON string (for embedded configs or testing).
pub fn load_shelf_from_str(s: &str) -> Result<ShelfConfig, ConfigError> {
    let config: ShelfConfig = ron::from_str(s)?;
    validate_shelf(&config)?;
    Ok(config)
}

/// Load a shelf, falling back to the built-in default on any failure. The
/// failure is logged, not surfaced: a missing shelf file still gets a scene.
pub fn load_shelf_or_default<P: AsRef<Path>>(path: P) -> ShelfConfig {
    let path = path.as_ref();
    match load_shelf(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Failed to load shelf {}: {}, using built-in shelf",
                path.display(),
                e
            );
            ShelfConfig::default()
        }
    }
}

/// Serialize a shelf to pretty RON (used by the sample asset and tests).
pub fn shelf_to_ron(config: &ShelfConfig) -> Result<String, ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());
    ron::ser::to_string_pretty(config, pretty)
        .map_err(|e| ConfigError::ValidationError(e.to_string()))
}
