use super::ColorMode;

/// Fill intensities parallel to the grid's flattened counts. Both tables are
/// built together so switching [`ColorMode`] never recomputes anything.
///
/// Saturation 0 only ever belongs to empty cells, in both tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Saturations {
    linear: Vec<u8>,
    ranked: Vec<u8>,
}

impl Saturations {
    pub fn compute(counts: &[u32]) -> Self {
        let mut distinct = counts.to_vec();
        distinct.sort_unstable();
        distinct.dedup();

        let Some(&max) = distinct.last() else {
            return Self::default();
        };

        let mut linear = Vec::with_capacity(counts.len());
        let mut ranked = Vec::with_capacity(counts.len());

        for &count in counts {
            let rank = match distinct.binary_search(&count) {
                Ok(rank) => rank,
                Err(_) => panic!("count {count} missing from its own distinct values"),
            };

            linear.push(linear_saturation(count, max));
            ranked.push(if count == 0 {
                0
            } else {
                ranked_saturation(rank, distinct.len())
            });
        }

        Self { linear, ranked }
    }

    pub fn linear(&self) -> &[u8] {
        &self.linear
    }

    pub fn ranked(&self) -> &[u8] {
        &self.ranked
    }

    pub fn table(&self, mode: ColorMode) -> &[u8] {
        match mode {
            ColorMode::Linear => &self.linear,
            ColorMode::Ranked => &self.ranked,
        }
    }

    pub fn len(&self) -> usize {
        self.linear.len()
    }

    pub fn is_empty(&self) -> bool {
        self.linear.is_empty()
    }
}

/// `round(255 * count / max)`, never 0 for a non-empty cell.
pub fn linear_saturation(count: u32, max: u32) -> u8 {
    if count == 0 || max == 0 {
        return 0;
    }
    let s = (255.0 * f64::from(count) / f64::from(max)).round() as u8;
    s.max(1)
}

/// `round(255 * (rank + 1) / distinct)`, clamped to at least 1.
pub fn ranked_saturation(rank: usize, distinct: usize) -> u8 {
    let s = (255.0 * (rank + 1) as f64 / distinct as f64).round() as u8;
    s.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 4 columns x 3 rows, column-major.
    const EXAMPLE: [u32; 12] = [0, 0, 0, 1, 0, 0, 0, 5, 0, 0, 0, 9];

    #[test]
    fn linear_scales_against_max() {
        let sats = Saturations::compute(&EXAMPLE);

        assert_eq!(sats.linear()[11], 255);
        assert_eq!(sats.linear()[3], 28);
        assert_eq!(sats.linear()[7], 142);
        assert_eq!(sats.linear()[0], 0);
    }

    #[test]
    fn ranked_follows_distinct_order() {
        let sats = Saturations::compute(&EXAMPLE);

        // distinct values: 0, 1, 5, 9
        assert_eq!(sats.ranked()[3], 128);
        assert_eq!(sats.ranked()[7], 191);
        assert_eq!(sats.ranked()[11], 255);
        assert_eq!(sats.ranked()[0], 0);
    }

    #[test]
    fn ranked_ignores_magnitude() {
        let heavy_tail = Saturations::compute(&[1, 2, 1_000_000]);
        let flat = Saturations::compute(&[1, 2, 3]);

        assert_eq!(heavy_tail.ranked(), flat.ranked());
        assert_eq!(heavy_tail.linear()[0], 1);
    }

    #[test]
    fn tiny_counts_stay_visible() {
        let mut counts = vec![10_000; 8];
        counts.push(1);
        let sats = Saturations::compute(&counts);

        assert_eq!(sats.linear()[8], 1);
        assert!(sats.ranked()[8] >= 1);
    }

    #[test]
    fn empty_and_all_zero_grids() {
        let sats = Saturations::compute(&[]);
        assert!(sats.is_empty());

        let sats = Saturations::compute(&[0, 0, 0]);
        assert_eq!(sats.linear(), &[0, 0, 0]);
        assert_eq!(sats.ranked(), &[0, 0, 0]);
    }

    #[test]
    fn single_distinct_value_is_fully_saturated() {
        let sats = Saturations::compute(&[4, 4, 4]);
        assert_eq!(sats.linear(), &[255, 255, 255]);
        assert_eq!(sats.ranked(), &[255, 255, 255]);
    }

    #[test]
    fn table_selects_by_mode() {
        let sats = Saturations::compute(&EXAMPLE);
        assert_eq!(sats.table(ColorMode::Linear), sats.linear());
        assert_eq!(sats.table(ColorMode::Ranked), sats.ranked());
    }
}
