//! Annotator configuration, persisted as JSON.

use crate::render::{Rgba8, ShapeStyle, Stroke};
use crate::shapes::FINISH_RADIUS;
use crate::storage::{StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default pick radius around a shape's location.
pub const SELECT_RADIUS: f64 = 8.0;

/// Colors and widths used when building render primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Committed shapes.
    pub outline: Stroke,
    /// The selected shape and its drag preview.
    pub selected: Stroke,
    /// Shape under the pointer that a click would select.
    pub hover: Stroke,
    /// Shape under construction.
    pub construction: Stroke,
    pub closing_ring: Stroke,
    /// Ring drawn at the pointer while dragging.
    pub drag_ring: Stroke,
    /// Full-canvas lines through the pointer.
    pub crosshair: Stroke,
    pub label_color: Rgba8,
    pub min_font_size: f64,
    pub max_font_size: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            outline: Stroke::new(Rgba8::BLACK, 2.0),
            selected: Stroke::new(Rgba8::BLUE, 2.0),
            hover: Stroke::new(Rgba8::ORANGE, 2.0),
            construction: Stroke::new(Rgba8::BLACK, 4.0),
            closing_ring: Stroke::new(Rgba8::RED, 2.0),
            drag_ring: Stroke::new(Rgba8::BLUE, 2.0),
            crosshair: Stroke::new(Rgba8::BLACK, 2.0),
            label_color: Rgba8::BLACK,
            min_font_size: 8.0,
            max_font_size: 24.0,
        }
    }
}

impl StyleConfig {
    /// Font size for a shape's index label.
    pub fn label_font_size(&self, diameter: f64) -> f64 {
        (diameter / 4.0).clamp(self.min_font_size, self.max_font_size)
    }

    pub(crate) fn shape_style(&self, stroke: Stroke, finish_radius: f64) -> ShapeStyle {
        ShapeStyle {
            stroke,
            closing_ring: self.closing_ring,
            finish_radius,
        }
    }
}

/// Top-level annotator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Distance from a polygon's first vertex that closes it.
    pub finish_radius: f64,
    /// Maximum distance from a shape's location for a click to select it.
    pub select_radius: f64,
    /// File extensions (without dot, case-insensitive) treated as images.
    pub image_extensions: Vec<String>,
    pub style: StyleConfig,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            finish_radius: FINISH_RADIUS,
            select_radius: SELECT_RADIUS,
            image_extensions: vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()],
            style: StyleConfig::default(),
        }
    }
}

impl AnnotatorConfig {
    /// Default config location.
    ///
    /// On Unix: `~/.config/shapelabel/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shapelabel").join("config.json"))
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> StorageResult<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
            .map_err(|e| StorageError::Other(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Write pretty JSON to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let json = self
            .to_json()
            .map_err(|e| StorageError::Other(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
