use std::fs;
use std::io;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chart::heatmap::ColorMode;
use crate::data_path;

const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_MAX_Y: u32 = 100;
pub const DEFAULT_Y_BUCKET_SIZES: [u32; 9] = [1, 2, 4, 5, 10, 20, 25, 50, 100];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Upper bound of the sample value domain.
    pub max_y: u32,
    /// Candidate Y bucket sizes, ascending.
    pub y_bucket_sizes: Vec<u32>,
    pub initial_y_bucket_size: u32,
    pub initial_x_bucket_ms: u64,
    pub x_bucket_step_ms: u64,
    pub min_x_bucket_ms: u64,
    pub color_mode: ColorMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_y: DEFAULT_MAX_Y,
            y_bucket_sizes: DEFAULT_Y_BUCKET_SIZES.to_vec(),
            initial_y_bucket_size: 1,
            initial_x_bucket_ms: 100,
            x_bucket_step_ms: 10,
            min_x_bucket_ms: 10,
            color_mode: ColorMode::default(),
        }
    }
}

impl Config {
    pub fn initial_x_bucket_size(&self) -> Duration {
        Duration::from_millis(self.initial_x_bucket_ms)
    }

    pub fn x_bucket_step(&self) -> Duration {
        Duration::from_millis(self.x_bucket_step_ms)
    }

    pub fn min_x_bucket_size(&self) -> Duration {
        Duration::from_millis(self.min_x_bucket_ms)
    }

    /// Drops zero and duplicate sizes and sorts the ladder, falling back to the
    /// default ladder when nothing usable is left.
    pub fn sanitized(mut self) -> Self {
        self.y_bucket_sizes.retain(|size| *size > 0);
        self.y_bucket_sizes.sort_unstable();
        self.y_bucket_sizes.dedup();

        if self.y_bucket_sizes.is_empty() {
            log::warn!("Empty Y bucket ladder in config, using defaults");
            self.y_bucket_sizes = DEFAULT_Y_BUCKET_SIZES.to_vec();
        }
        if self.max_y == 0 {
            log::warn!("max_y must be positive, using {DEFAULT_MAX_Y}");
            self.max_y = DEFAULT_MAX_Y;
        }
        self.min_x_bucket_ms = self.min_x_bucket_ms.max(1);
        self.initial_x_bucket_ms = self.initial_x_bucket_ms.max(self.min_x_bucket_ms);

        self
    }
}

pub fn load() -> Result<Config, Error> {
    let path = data_path(Some(CONFIG_FILE));

    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Err(err) => return Err(err.into()),
    };

    from_str(&contents)
}

pub fn from_str(contents: &str) -> Result<Config, Error> {
    let config: Config = serde_json::from_str(contents)?;
    Ok(config.sanitized())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = from_str(r#"{ "initial_x_bucket_ms": 250 }"#).unwrap();

        assert_eq!(config.initial_x_bucket_size(), Duration::from_millis(250));
        assert_eq!(config.y_bucket_sizes, DEFAULT_Y_BUCKET_SIZES.to_vec());
        assert_eq!(config.max_y, DEFAULT_MAX_Y);
        assert_eq!(config.color_mode, ColorMode::Ranked);
    }

    #[test]
    fn ladder_is_sorted_and_deduplicated() {
        let config = from_str(r#"{ "y_bucket_sizes": [10, 0, 5, 10, 1] }"#).unwrap();
        assert_eq!(config.y_bucket_sizes, vec![1, 5, 10]);

        let config = from_str(r#"{ "y_bucket_sizes": [0] }"#).unwrap();
        assert_eq!(config.y_bucket_sizes, DEFAULT_Y_BUCKET_SIZES.to_vec());
    }

    #[test]
    fn color_mode_is_lowercase() {
        let config = from_str(r#"{ "color_mode": "linear" }"#).unwrap();
        assert_eq!(config.color_mode, ColorMode::Linear);

        assert!(from_str(r#"{ "color_mode": "rainbow" }"#).is_err());
    }
}
