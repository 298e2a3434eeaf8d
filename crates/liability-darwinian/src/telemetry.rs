//! Prometheus metrics for sweeps

use prometheus::{Histogram, HistogramOpts, IntCounter, Registry};

/// Counters updated by the sweep driver
pub struct SweepMetrics {
    pub runs_total: IntCounter,
    pub degenerate_runs_total: IntCounter,
    pub generations_total: IntCounter,
    pub generations_per_run: Histogram,
}

impl SweepMetrics {
    pub fn new() -> prometheus::Result<Self> {
        Ok(Self {
            runs_total: IntCounter::new(
                "liability_sweep_runs_total",
                "Evolutionary runs executed",
            )?,
            degenerate_runs_total: IntCounter::new(
                "liability_sweep_degenerate_runs_total",
                "Runs recorded as degenerate sentinels",
            )?,
            generations_total: IntCounter::new(
                "liability_sweep_generations_total",
                "Generations simulated across all runs",
            )?,
            generations_per_run: Histogram::with_opts(
                HistogramOpts::new(
                    "liability_sweep_generations_per_run",
                    "Generations executed per run",
                )
                .buckets(prometheus::exponential_buckets(10.0, 2.0, 10)?),
            )?,
        })
    }

    pub fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.runs_total.clone()))?;
        registry.register(Box::new(self.degenerate_runs_total.clone()))?;
        registry.register(Box::new(self.generations_total.clone()))?;
        registry.register(Box::new(self.generations_per_run.clone()))?;
        Ok(())
    }

    pub(crate) fn record_run(&self, generations: u64) {
        self.runs_total.inc();
        self.generations_total.inc_by(generations);
        self.generations_per_run.observe(generations as f64);
    }

    /// A run that failed after `generations` completed steps
    pub(crate) fn record_degenerate(&self, generations: u64) {
        self.record_run(generations);
        self.degenerate_runs_total.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_record() {
        let metrics = SweepMetrics::new().unwrap();
        let registry = Registry::new();
        metrics.register(&registry).unwrap();

        metrics.record_run(800);
        metrics.record_degenerate(3);

        assert_eq!(metrics.runs_total.get(), 2);
        assert_eq!(metrics.degenerate_runs_total.get(), 1);
        assert_eq!(metrics.generations_total.get(), 803);
        assert_eq!(metrics.generations_per_run.get_sample_count(), 2);
        assert_eq!(registry.gather().len(), 4);
    }
}
