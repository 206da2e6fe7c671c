pub mod chart;
pub mod config;
pub mod log;
pub mod trace;

use std::path::PathBuf;

pub use chart::heatmap::{self, ColorMode, Heatmap};
pub use config::Config;
pub use trace::{SampleProvider, Trace};

const DATA_PATH_ENV: &str = "BUSYMAP_DATA_PATH";

pub fn data_path(path_name: Option<&str>) -> PathBuf {
    let base = std::env::var_os(DATA_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs_next::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("busymap")
        });

    match path_name {
        Some(name) => base.join(name),
        None => base,
    }
}
