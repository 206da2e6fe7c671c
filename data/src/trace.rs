use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Anything that can turn its sources into equally long per-bucket samples.
pub trait SampleProvider {
    /// One sequence per source, one value per `x_bucket_size` wide bucket.
    fn sample(&self, x_bucket_size: Duration) -> Vec<Vec<u32>>;
}

/// Interval during which a processor was running something, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Processor {
    pub id: u32,
    #[serde(default)]
    pub spans: Vec<Span>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Trace {
    pub processors: Vec<Processor>,
}

impl Trace {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        let trace: Trace = serde_json::from_str(&contents)?;

        log::info!(
            "Loaded trace with {} processors spanning {:?} from {}",
            trace.processors.len(),
            trace.duration(),
            path.display()
        );

        Ok(trace)
    }

    /// End of the latest span.
    pub fn end(&self) -> u64 {
        self.processors
            .iter()
            .flat_map(|p| p.spans.iter())
            .map(|span| span.end)
            .max()
            .unwrap_or(0)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_nanos(self.end())
    }
}

impl SampleProvider for Trace {
    fn sample(&self, x_bucket_size: Duration) -> Vec<Vec<u32>> {
        let end = self.end();
        self.processors
            .iter()
            .map(|p| busy_percentages(&p.spans, x_bucket_size, end))
            .collect()
    }
}

/// Share of each `bucket` wide interval in `[0, end)` covered by `spans`, in
/// whole percent. Overlapping spans are capped at 100.
pub fn busy_percentages(spans: &[Span], bucket: Duration, end: u64) -> Vec<u32> {
    let bucket_ns = u64::try_from(bucket.as_nanos()).unwrap_or(u64::MAX).max(1);
    let num_buckets = end.div_ceil(bucket_ns).max(1) as usize;

    let mut busy = vec![0u64; num_buckets];
    for span in spans {
        let start = span.start.min(end);
        let stop = span.end.min(end);
        if stop <= start {
            continue;
        }

        let first = (start / bucket_ns) as usize;
        let last = ((stop - 1) / bucket_ns) as usize;
        for (idx, slot) in busy.iter_mut().enumerate().take(last + 1).skip(first) {
            let bucket_start = idx as u64 * bucket_ns;
            let bucket_end = bucket_start.saturating_add(bucket_ns);
            *slot += stop.min(bucket_end) - start.max(bucket_start);
        }
    }

    busy.into_iter()
        .map(|ns| {
            let pct = (ns as f64 * 100.0 / bucket_ns as f64).round();
            pct.min(100.0) as u32
        })
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read trace: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse trace: {0}")]
    Json(#[from] serde_json::Error),
}
