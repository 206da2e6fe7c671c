use std::sync::Arc;
use std::time::Duration;

use iced_core::{Point, Size};
use serde::{Deserialize, Serialize};

pub mod control;
pub mod geometry;
pub mod grid;
pub mod hover;
pub mod saturation;

pub use control::{Command, Controller, Outcome};
pub use geometry::{CacheKey, FillBatch, Geometry, RenderCache};
pub use grid::{Grid, RawSeries};
pub use hover::{HoverCapture, HoveredBucket};
pub use saturation::Saturations;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Linear,
    /// Saturation follows the ordinal position among distinct counts.
    #[default]
    Ranked,
}

impl ColorMode {
    pub const ALL: [ColorMode; 2] = [ColorMode::Linear, ColorMode::Ranked];

    pub fn toggled(self) -> Self {
        match self {
            ColorMode::Linear => ColorMode::Ranked,
            ColorMode::Ranked => ColorMode::Linear,
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorMode::Linear => write!(f, "Linear"),
            ColorMode::Ranked => write!(f, "Ranked"),
        }
    }
}

/// Integer pixel size of the plot area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(self, position: Point) -> bool {
        (0.0..=self.width as f32).contains(&position.x)
            && (0.0..=self.height as f32).contains(&position.y)
    }
}

impl From<Size> for Viewport {
    fn from(size: Size) -> Self {
        let px = |v: f32| if v.is_finite() { v.max(0.0).round() as u32 } else { 0 };

        Viewport {
            width: px(size.width),
            height: px(size.height),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("No sources to aggregate")]
    NoSources,
    #[error("Source {source_idx} has no samples")]
    EmptySeries { source_idx: usize },
    #[error("Source {source_idx} has {len} samples, expected {expected}")]
    RaggedSeries {
        source_idx: usize,
        len: usize,
        expected: usize,
    },
    #[error("Y bucket size must be positive")]
    ZeroBucketSize,
    #[error("X bucket size must be positive")]
    ZeroXBucketSize,
    #[error("Maximum Y value must be positive")]
    ZeroMaxY,
}

/// A per-source busy heatmap: raw samples bucketed into a count grid, with both
/// saturation tables and the last drawn geometry kept alongside.
#[derive(Debug)]
pub struct Heatmap {
    max_y: u32,
    color_mode: ColorMode,
    x_bucket_size: Duration,
    y_bucket_size: u32,

    // Kept so a new Y bucket size can re-bucket without resampling.
    raw: RawSeries,
    grid: Grid,
    saturations: Saturations,

    cache: RenderCache,
    pointer: Option<HoverCapture>,
    hovered: Option<HoveredBucket>,
}

impl Heatmap {
    pub fn new(
        raw: RawSeries,
        max_y: u32,
        x_bucket_size: Duration,
        y_bucket_size: u32,
        color_mode: ColorMode,
    ) -> Result<Self, Error> {
        if x_bucket_size.is_zero() {
            return Err(Error::ZeroXBucketSize);
        }

        let grid = Grid::aggregate(&raw, max_y, y_bucket_size)?;
        let saturations = Saturations::compute(grid.counts());

        Ok(Self {
            max_y,
            color_mode,
            x_bucket_size,
            y_bucket_size,
            raw,
            grid,
            saturations,
            cache: RenderCache::default(),
            pointer: None,
            hovered: None,
        })
    }

    pub fn max_y(&self) -> u32 {
        self.max_y
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn x_bucket_size(&self) -> Duration {
        self.x_bucket_size
    }

    pub fn y_bucket_size(&self) -> u32 {
        self.y_bucket_size
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn saturations(&self) -> &Saturations {
        &self.saturations
    }

    pub fn render_cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Bucket under the pointer as of the last [`Heatmap::layout`].
    pub fn hovered(&self) -> Option<&HoveredBucket> {
        self.hovered.as_ref()
    }

    /// Replaces the raw samples, e.g. after resampling with a new X bucket size.
    pub fn set_data(&mut self, raw: RawSeries, x_bucket_size: Duration) -> Result<(), Error> {
        if x_bucket_size.is_zero() {
            return Err(Error::ZeroXBucketSize);
        }

        let grid = Grid::aggregate(&raw, self.max_y, self.y_bucket_size)?;
        log::debug!(
            "Resampled heatmap: {} sources x {} buckets of {:?}",
            raw.num_sources(),
            raw.num_x_buckets(),
            x_bucket_size
        );

        self.raw = raw;
        self.x_bucket_size = x_bucket_size;
        self.commit(grid);
        Ok(())
    }

    pub fn set_y_bucket_size(&mut self, y_bucket_size: u32) -> Result<(), Error> {
        if y_bucket_size == self.y_bucket_size {
            return Ok(());
        }

        let grid = Grid::aggregate(&self.raw, self.max_y, y_bucket_size)?;
        log::debug!(
            "Re-bucketed heatmap: Y bucket {} -> {} ({} rows)",
            self.y_bucket_size,
            y_bucket_size,
            grid.num_y_buckets()
        );

        self.y_bucket_size = y_bucket_size;
        self.commit(grid);
        Ok(())
    }

    /// Only affects which saturation table the next rebuild reads.
    pub fn set_color_mode(&mut self, color_mode: ColorMode) {
        self.color_mode = color_mode;
    }

    pub fn capture_pointer(&mut self, position: Point, viewport: Viewport) {
        self.pointer = Some(HoverCapture { position, viewport });
    }

    pub fn release_pointer(&mut self) {
        self.pointer = None;
    }

    pub fn cache_key(&self, viewport: Viewport) -> CacheKey {
        CacheKey {
            viewport,
            color_mode: self.color_mode,
            y_bucket_size: self.y_bucket_size,
            x_bucket_size: self.x_bucket_size,
        }
    }

    /// Runs once per frame: returns the batched geometry for `viewport`,
    /// rebuilding it only when the cache key changed, and refreshes the hover.
    pub fn layout(&mut self, viewport: Viewport) -> Arc<Geometry> {
        let key = self.cache_key(viewport);
        let geometry = self.cache.layout(key, &self.grid, &self.saturations);

        self.hovered = hover::hit_test(
            self.pointer,
            viewport,
            &self.grid,
            self.x_bucket_size,
            self.y_bucket_size,
            self.max_y,
        );

        geometry
    }

    fn commit(&mut self, grid: Grid) {
        self.saturations = Saturations::compute(grid.counts());
        self.grid = grid;
        self.cache.invalidate();
    }
}
