use data::trace::{Processor, Span, Trace};
use rand::prelude::*;

const PROCESSORS: u32 = 8;
const DURATION_NS: u64 = 10_000_000_000;

/// A reproducible trace whose per-processor load drifts in slow waves.
pub fn trace(seed: u64) -> Trace {
    let mut rng = StdRng::seed_from_u64(seed);

    let processors = (0..PROCESSORS)
        .map(|id| Processor {
            id,
            spans: spans(&mut rng, f64::from(id)),
        })
        .collect();

    let trace = Trace { processors };
    log::info!(
        "Generated demo trace: {PROCESSORS} processors over {:?}",
        trace.duration()
    );
    trace
}

fn spans(rng: &mut StdRng, phase_offset: f64) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut t = rng.random_range(0..1_000_000u64);

    while t < DURATION_NS {
        let phase = t as f64 / DURATION_NS as f64 * std::f64::consts::TAU * 3.0 + phase_offset;
        let load = (0.5 + 0.45 * phase.sin()).clamp(0.05, 0.95);

        let busy: u64 = rng.random_range(20_000..2_000_000);
        let idle = (busy as f64 * (1.0 - load) / load) as u64 + rng.random_range(0..50_000);

        let end = (t + busy).min(DURATION_NS);
        spans.push(Span { start: t, end });
        t = end + idle;
    }

    spans
}
