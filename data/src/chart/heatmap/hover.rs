use std::fmt;
use std::time::Duration;

use iced_core::{Point, Rectangle};

use super::Viewport;
use super::geometry::CellSteps;
use super::grid::Grid;

/// Last pointer position, along with the viewport it was observed in. A resize
/// without a following pointer move leaves the position meaningless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverCapture {
    pub position: Point,
    pub viewport: Viewport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoveredBucket {
    pub x_start: Duration,
    pub x_end: Duration,
    pub y_start: u32,
    pub y_end: u32,
    pub count: u32,
    /// Whether this is the right-closed topmost value range.
    pub closed: bool,
    /// Pixel bounds of the cell, for highlighting.
    pub cell: Rectangle,
}

impl HoveredBucket {
    pub fn closing_bracket(&self) -> char {
        if self.closed { ']' } else { ')' }
    }
}

impl fmt::Display for HoveredBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time [{:?}, {:?}), range [{}, {}{}, count: {}",
            self.x_start,
            self.x_end,
            self.y_start,
            self.y_end,
            self.closing_bracket(),
            self.count
        )
    }
}

/// Maps a captured pointer back onto the grid. Reads only the grid, so the
/// answer stays correct regardless of cached geometry.
pub fn hit_test(
    capture: Option<HoverCapture>,
    viewport: Viewport,
    grid: &Grid,
    x_bucket_size: Duration,
    y_bucket_size: u32,
    max_y: u32,
) -> Option<HoveredBucket> {
    let capture = capture?;

    if capture.viewport != viewport || viewport.is_empty() {
        return None;
    }
    if !viewport.contains(capture.position) {
        return None;
    }

    let steps = CellSteps::new(viewport, grid);
    let position = capture.position;

    // Pointer on the right or top edge still belongs to the outermost cell.
    let x = ((position.x / steps.x_px) as usize).min(grid.num_x_buckets() - 1);
    let y = (((viewport.height as f32 - position.y) / steps.y_px) as usize)
        .min(grid.num_y_buckets() - 1);

    let closed = y == grid.num_y_buckets() - 1;
    let y_start = y as u32 * y_bucket_size;
    let y_end = if closed {
        max_y
    } else {
        y_start + y_bucket_size
    };
    let x_start = x_bucket_size.saturating_mul(x as u32);

    Some(HoveredBucket {
        x_start,
        x_end: x_start.saturating_add(x_bucket_size),
        y_start,
        y_end,
        count: grid.count(x, y),
        closed,
        cell: steps.cell_rect(x, y),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::heatmap::grid::RawSeries;

    const X_BUCKET: Duration = Duration::from_millis(100);

    fn grid() -> Grid {
        // 4 columns, 10 rows of width 10
        let raw = RawSeries::new(vec![vec![5, 15, 95, 100], vec![5, 45, 55, 65]]).unwrap();
        Grid::aggregate(&raw, 100, 10).unwrap()
    }

    fn hover_at(position: Point, captured: Viewport, current: Viewport) -> Option<HoveredBucket> {
        let capture = HoverCapture {
            position,
            viewport: captured,
        };
        hit_test(Some(capture), current, &grid(), X_BUCKET, 10, 100)
    }

    #[test]
    fn resolves_bucket_under_pointer() {
        let viewport = Viewport::new(400, 200);
        let hovered = hover_at(Point::new(10.0, 195.0), viewport, viewport).unwrap();

        assert_eq!(hovered.x_start, Duration::ZERO);
        assert_eq!(hovered.x_end, X_BUCKET);
        assert_eq!((hovered.y_start, hovered.y_end), (0, 10));
        assert_eq!(hovered.count, 2);
        assert_eq!(hovered.closing_bracket(), ')');
        assert_eq!(
            hovered.cell,
            Rectangle {
                x: 0.0,
                y: 180.0,
                width: 100.0,
                height: 20.0
            }
        );
    }

    #[test]
    fn top_row_is_closed() {
        let viewport = Viewport::new(400, 200);
        let hovered = hover_at(Point::new(250.0, 5.0), viewport, viewport).unwrap();

        assert_eq!(hovered.x_start, Duration::from_millis(200));
        assert_eq!((hovered.y_start, hovered.y_end), (90, 100));
        assert_eq!(hovered.count, 1);
        assert!(hovered.closed);
        assert_eq!(
            hovered.to_string(),
            "time [200ms, 300ms), range [90, 100], count: 1"
        );
    }

    #[test]
    fn uneven_top_row_ends_at_max_y() {
        // 100 / 30 leaves a top row of width 10: rows [0, 30), ..., [90, 100]
        let raw = RawSeries::new(vec![vec![95, 30]]).unwrap();
        let grid = Grid::aggregate(&raw, 100, 30).unwrap();
        assert_eq!(grid.num_y_buckets(), 4);

        let viewport = Viewport::new(200, 40);
        let capture = HoverCapture {
            position: Point::new(50.0, 5.0),
            viewport,
        };
        let hovered = hit_test(Some(capture), viewport, &grid, X_BUCKET, 30, 100).unwrap();

        assert_eq!((hovered.y_start, hovered.y_end), (90, 100));
        assert!(hovered.closed);
        assert_eq!(hovered.count, 1);
        assert!(hovered.to_string().contains("range [90, 100], count: 1"));

        let capture = HoverCapture {
            position: Point::new(150.0, 25.0),
            viewport,
        };
        let hovered = hit_test(Some(capture), viewport, &grid, X_BUCKET, 30, 100).unwrap();
        assert_eq!((hovered.y_start, hovered.y_end), (30, 60));
        assert_eq!(hovered.closing_bracket(), ')');
    }

    #[test]
    fn stale_viewport_is_ignored() {
        let hovered = hover_at(
            Point::new(10.0, 10.0),
            Viewport::new(400, 200),
            Viewport::new(400, 201),
        );
        assert!(hovered.is_none());
    }

    #[test]
    fn outside_viewport_is_ignored() {
        let viewport = Viewport::new(400, 200);

        for position in [
            Point::new(-1.0, 10.0),
            Point::new(10.0, -0.5),
            Point::new(400.5, 10.0),
            Point::new(10.0, 201.0),
            Point::new(f32::NAN, 10.0),
        ] {
            assert!(hover_at(position, viewport, viewport).is_none(), "{position:?}");
        }
        assert!(hit_test(None, viewport, &grid(), X_BUCKET, 10, 100).is_none());
    }

    #[test]
    fn edges_map_to_outer_cells() {
        let viewport = Viewport::new(400, 200);

        let corner = hover_at(Point::new(400.0, 0.0), viewport, viewport).unwrap();
        assert_eq!(corner.x_start, Duration::from_millis(300));
        assert!(corner.closed);
        assert_eq!(corner.count, 1);

        let origin = hover_at(Point::new(0.0, 200.0), viewport, viewport).unwrap();
        assert_eq!(origin.x_start, Duration::ZERO);
        assert_eq!(origin.y_start, 0);
    }

    #[test]
    fn empty_viewport_has_no_hover() {
        let viewport = Viewport::new(0, 200);
        assert!(hover_at(Point::new(0.0, 10.0), viewport, viewport).is_none());
    }
}
