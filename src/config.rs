//! Converter configuration - optional JSON file, every field defaulted

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConvertError;

pub const CANVAS_WIDTH: f64 = 1024.0;
pub const CANVAS_HEIGHT: f64 = 613.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConverterConfig {
    #[serde(default)]
    pub canvas: CanvasSize,
}

/// Size every input document must have, in user units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CanvasSize {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
}

fn default_width() -> f64 { CANVAS_WIDTH }
fn default_height() -> f64 { CANVAS_HEIGHT }

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

impl ConverterConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, ConvertError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
            .map_err(|e| ConvertError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ConverterConfig::from_json("{}").unwrap();
        assert_eq!(config, ConverterConfig::default());
        assert_eq!(config.canvas.width, 1024.0);
        assert_eq!(config.canvas.height, 613.0);
    }

    #[test]
    fn test_partial_canvas_override() {
        let config = ConverterConfig::from_json(r#"{"canvas": {"width": 800}}"#).unwrap();
        assert_eq!(config.canvas.width, 800.0);
        assert_eq!(config.canvas.height, 613.0);
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = ConverterConfig::load_from_path(Path::new("/nonexistent/config.json"));
        assert!(matches!(result, Err(ConvertError::Io(_))));
    }
}
