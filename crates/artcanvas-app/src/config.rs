//! Host configuration.

use crate::error::AppResult;
use artcanvas_core::canvas::CanvasConfig;
use artcanvas_core::color::SerializableColor;
use artcanvas_core::history::DEFAULT_HISTORY_CAPACITY;
use artcanvas_core::tools::DEFAULT_WIDTH;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    /// Surface width in logical pixels.
    pub width: u32,
    /// Surface height in logical pixels.
    pub height: u32,
    pub scale_factor: f64,
    #[serde(with = "hex_color")]
    pub background_color: SerializableColor,
    #[serde(with = "hex_color")]
    pub brush_color: SerializableColor,
    pub brush_width: f64,
    pub history_capacity: usize,
    /// Where the final frame is written. Defaults to a timestamped name.
    pub output_png: Option<PathBuf>,
    /// Where the stats summary is written, if anywhere.
    pub output_stats: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Art Canvas".to_string(),
            width: 1280,
            height: 800,
            scale_factor: 1.0,
            background_color: SerializableColor::white(),
            brush_color: SerializableColor::default(),
            brush_width: DEFAULT_WIDTH,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            output_png: None,
            output_stats: None,
        }
    }
}

impl AppConfig {
    /// Load a configuration file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&text)?;
        log::debug!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }

    /// PNG destination: the configured path, or a snapshot name stamped with `now`.
    pub fn png_path(&self, now: DateTime<Utc>) -> PathBuf {
        self.output_png
            .clone()
            .unwrap_or_else(|| PathBuf::from(snapshot_file_name(now)))
    }

    /// Engine settings derived from this configuration.
    pub fn canvas_config(&self) -> CanvasConfig {
        CanvasConfig {
            history_capacity: self.history_capacity,
            color: self.brush_color,
            width: self.brush_width,
        }
    }
}

/// `art-canvas-<timestamp>.png`, with dashes in the time so the name is valid everywhere.
pub fn snapshot_file_name(now: DateTime<Utc>) -> String {
    format!("art-canvas-{}.png", now.format("%Y-%m-%dT%H-%M-%S%.3fZ"))
}

/// `#rrggbb[aa]` strings for colors in host JSON files.
pub(crate) mod hex_color {
    use artcanvas_core::color::SerializableColor;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        color: &SerializableColor,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&color.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<SerializableColor, D::Error> {
        let hex = String::deserialize(deserializer)?;
        hex.parse::<SerializableColor>().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r##"{"width": 320, "background_color": "#000000"}"##).unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 800);
        assert_eq!(config.background_color, SerializableColor::black());
        assert_eq!(config.history_capacity, DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let result: Result<AppConfig, _> = serde_json::from_str(r#"{"brush_color": "red"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{"brush_width": 8.0, "brush_color": "#ff000080", "history_capacity": 5}}"##
        )
        .unwrap();

        let config = AppConfig::from_json_file(file.path()).unwrap();
        let canvas = config.canvas_config();
        assert_eq!(canvas.history_capacity, 5);
        assert_eq!(canvas.color, SerializableColor::new(255, 0, 0, 128));
        assert!((canvas.width - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_png_path_defaults_to_timestamped_snapshot() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).single().unwrap();
        let config = AppConfig::default();
        assert_eq!(
            config.png_path(now),
            PathBuf::from("art-canvas-2026-01-02T03-04-05.000Z.png")
        );

        let config = AppConfig {
            output_png: Some(PathBuf::from("out.png")),
            ..AppConfig::default()
        };
        assert_eq!(config.png_path(now), PathBuf::from("out.png"));
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"#ffffff\""));
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
