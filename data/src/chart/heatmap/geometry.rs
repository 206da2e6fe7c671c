use std::sync::Arc;
use std::time::Duration;

use iced_core::{Color, Rectangle};

use super::grid::Grid;
use super::saturation::Saturations;
use super::{ColorMode, Viewport};

pub const SATURATION_LEVELS: usize = 256;

/// Everything the cached geometry depends on besides the grid itself. New
/// samples at an unchanged bucket size go through [`RenderCache::invalidate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub viewport: Viewport,
    pub color_mode: ColorMode,
    pub y_bucket_size: u32,
    pub x_bucket_size: Duration,
}

/// All cells sharing one saturation, filled with a single call.
#[derive(Debug, Clone, PartialEq)]
pub struct FillBatch {
    pub saturation: u8,
    pub color: Color,
    pub rects: Vec<Rectangle>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    viewport: Viewport,
    batches: Vec<FillBatch>,
}

impl Geometry {
    pub fn build(grid: &Grid, saturations: &[u8], viewport: Viewport) -> Self {
        let steps = CellSteps::new(viewport, grid);

        let mut rects: [Vec<Rectangle>; SATURATION_LEVELS] = std::array::from_fn(|_| Vec::new());
        for (x, y, idx) in grid.occupied() {
            rects[usize::from(saturations[idx])].push(steps.cell_rect(x, y));
        }

        let batches = rects
            .into_iter()
            .enumerate()
            .filter(|(_, rects)| !rects.is_empty())
            .map(|(saturation, rects)| {
                let saturation = saturation as u8;
                FillBatch {
                    saturation,
                    color: saturation_color(saturation),
                    rects,
                }
            })
            .collect();

        Self { viewport, batches }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn batches(&self) -> &[FillBatch] {
        &self.batches
    }

    pub fn num_rects(&self) -> usize {
        self.batches.iter().map(|batch| batch.rects.len()).sum()
    }
}

/// White at 0, pure red at 255.
pub fn saturation_color(saturation: u8) -> Color {
    let fade = 255 - saturation;
    Color::from_rgb8(255, fade, fade)
}

/// Pixel size of one cell; row 0 sits at the bottom of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSteps {
    pub x_px: f32,
    pub y_px: f32,
    height: f32,
}

impl CellSteps {
    pub fn new(viewport: Viewport, grid: &Grid) -> Self {
        Self {
            x_px: viewport.width as f32 / grid.num_x_buckets() as f32,
            y_px: viewport.height as f32 / grid.num_y_buckets() as f32,
            height: viewport.height as f32,
        }
    }

    /// Every edge is rounded on its own so neighbouring cells share edges
    /// exactly, without gaps or overlaps.
    pub fn cell_rect(&self, x: usize, y: usize) -> Rectangle {
        let x_start = (x as f32 * self.x_px).round();
        let x_end = ((x + 1) as f32 * self.x_px).round();
        let y_start = (self.height - (y + 1) as f32 * self.y_px).round();
        let y_end = (self.height - y as f32 * self.y_px).round();

        Rectangle {
            x: x_start,
            y: y_start,
            width: x_end - x_start,
            height: y_end - y_start,
        }
    }
}

/// Geometry memoized on a [`CacheKey`]. Any key mismatch replaces the
/// geometry wholesale.
#[derive(Debug, Default)]
pub struct RenderCache {
    key: Option<CacheKey>,
    geometry: Arc<Geometry>,
    rebuilds: u64,
}

impl RenderCache {
    pub fn layout(
        &mut self,
        key: CacheKey,
        grid: &Grid,
        saturations: &Saturations,
    ) -> Arc<Geometry> {
        if self.key == Some(key) {
            return Arc::clone(&self.geometry);
        }

        let geometry = Geometry::build(grid, saturations.table(key.color_mode), key.viewport);
        log::debug!(
            "Rebuilt heatmap geometry for {}x{}: {} cells in {} batches",
            key.viewport.width,
            key.viewport.height,
            geometry.num_rects(),
            geometry.batches().len()
        );

        self.key = Some(key);
        self.geometry = Arc::new(geometry);
        self.rebuilds += 1;

        Arc::clone(&self.geometry)
    }

    /// Forces the next layout to rebuild, for when the grid changed under an
    /// unchanged key.
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    pub fn key(&self) -> Option<CacheKey> {
        self.key
    }

    pub fn geometry(&self) -> &Arc<Geometry> {
        &self.geometry
    }

    /// Number of times geometry was rebuilt so far.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}
