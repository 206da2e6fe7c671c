use super::Error;

/// Per-source sample sequences, one value per X bucket. Every source has the
/// same, non-zero number of buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSeries {
    sources: Vec<Vec<u32>>,
    num_x_buckets: usize,
}

impl RawSeries {
    pub fn new(sources: Vec<Vec<u32>>) -> Result<Self, Error> {
        let expected = sources.first().ok_or(Error::NoSources)?.len();

        for (source_idx, samples) in sources.iter().enumerate() {
            if samples.is_empty() {
                return Err(Error::EmptySeries { source_idx });
            }
            if samples.len() != expected {
                return Err(Error::RaggedSeries {
                    source_idx,
                    len: samples.len(),
                    expected,
                });
            }
        }

        Ok(Self {
            sources,
            num_x_buckets: expected,
        })
    }

    pub fn num_sources(&self) -> usize {
        self.sources.len()
    }

    pub fn num_x_buckets(&self) -> usize {
        self.num_x_buckets
    }

    pub fn num_samples(&self) -> usize {
        self.num_sources() * self.num_x_buckets
    }

    pub fn sources(&self) -> impl Iterator<Item = &[u32]> {
        self.sources.iter().map(Vec::as_slice)
    }
}

/// Sample counts per (X bucket, Y bucket) cell, stored column-major: all Y
/// buckets of column 0 first, row 0 being the lowest value range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    num_x_buckets: usize,
    num_y_buckets: usize,
    counts: Vec<u32>,
}

/// `ceil(max_y / y_bucket_size)`.
pub fn num_y_buckets(max_y: u32, y_bucket_size: u32) -> Result<usize, Error> {
    if y_bucket_size == 0 {
        return Err(Error::ZeroBucketSize);
    }
    if max_y == 0 {
        return Err(Error::ZeroMaxY);
    }
    Ok(max_y.div_ceil(y_bucket_size) as usize)
}

/// The last bucket is right-closed and also absorbs anything above `max_y`,
/// so `[90, 100]` rather than `[90, 100)` plus a lone `[100, 100]`.
#[inline]
pub fn y_bin(value: u32, y_bucket_size: u32, num_y_buckets: usize) -> usize {
    ((value / y_bucket_size) as usize).min(num_y_buckets - 1)
}

impl Grid {
    pub fn aggregate(raw: &RawSeries, max_y: u32, y_bucket_size: u32) -> Result<Self, Error> {
        let num_y_buckets = num_y_buckets(max_y, y_bucket_size)?;
        let num_x_buckets = raw.num_x_buckets();

        let mut counts = vec![0u32; num_x_buckets * num_y_buckets];
        for samples in raw.sources() {
            for (x, &value) in samples.iter().enumerate() {
                let bin = y_bin(value, y_bucket_size, num_y_buckets);
                counts[x * num_y_buckets + bin] += 1;
            }
        }

        log::trace!(
            "Aggregated {} samples into {num_x_buckets}x{num_y_buckets} grid",
            raw.num_samples()
        );

        Ok(Self {
            num_x_buckets,
            num_y_buckets,
            counts,
        })
    }

    pub fn num_x_buckets(&self) -> usize {
        self.num_x_buckets
    }

    pub fn num_y_buckets(&self) -> usize {
        self.num_y_buckets
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.num_x_buckets && y < self.num_y_buckets);
        x * self.num_y_buckets + y
    }

    #[inline]
    pub fn count(&self, x: usize, y: usize) -> u32 {
        self.counts[self.index(x, y)]
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// Non-empty cells as `(x, y, flat index)`, column by column.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        let num_y = self.num_y_buckets;
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(move |(idx, _)| (idx / num_y, idx % num_y, idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_buckets_round_up() {
        assert_eq!(num_y_buckets(100, 10), Ok(10));
        assert_eq!(num_y_buckets(100, 30), Ok(4));
        assert_eq!(num_y_buckets(100, 100), Ok(1));
        assert_eq!(num_y_buckets(100, 250), Ok(1));
        assert_eq!(num_y_buckets(100, 0), Err(Error::ZeroBucketSize));
        assert_eq!(num_y_buckets(0, 10), Err(Error::ZeroMaxY));
    }

    #[test]
    fn last_bucket_is_closed() {
        let raw = RawSeries::new(vec![vec![100], vec![95], vec![90], vec![89], vec![0]]).unwrap();
        let grid = Grid::aggregate(&raw, 100, 10).unwrap();

        assert_eq!(grid.num_y_buckets(), 10);
        assert_eq!(grid.count(0, 9), 3);
        assert_eq!(grid.count(0, 8), 1);
        assert_eq!(grid.count(0, 0), 1);
    }

    #[test]
    fn overflow_clamps_into_last_bucket() {
        let raw = RawSeries::new(vec![vec![250, 101, u32::MAX]]).unwrap();
        let grid = Grid::aggregate(&raw, 100, 10).unwrap();

        for x in 0..3 {
            assert_eq!(grid.count(x, 9), 1);
        }
        assert_eq!(grid.total(), 3);
    }

    #[test]
    fn grid_is_column_major() {
        let raw = RawSeries::new(vec![vec![0, 15, 29], vec![5, 25, 10]]).unwrap();
        let grid = Grid::aggregate(&raw, 30, 10).unwrap();

        assert_eq!(grid.counts(), &[2, 0, 0, 0, 1, 1, 0, 1, 1]);
        assert_eq!(grid.max(), 2);
        assert_eq!(
            grid.occupied().collect::<Vec<_>>(),
            vec![(0, 0, 0), (1, 1, 4), (1, 2, 5), (2, 1, 7), (2, 2, 8)]
        );
    }

    #[test]
    fn malformed_series_are_rejected() {
        assert_eq!(RawSeries::new(vec![]), Err(Error::NoSources));
        assert_eq!(
            RawSeries::new(vec![vec![], vec![]]),
            Err(Error::EmptySeries { source_idx: 0 })
        );
        assert_eq!(
            RawSeries::new(vec![vec![1, 2, 3], vec![1, 2]]),
            Err(Error::RaggedSeries {
                source_idx: 1,
                len: 2,
                expected: 3
            })
        );
    }
}
