//! Sweep driver
//!
//! For each regime, for each audit probability: fresh population, one run,
//! one recorded safe share. A degenerate run becomes a NaN sentinel and the
//! sweep carries on; configuration errors and invariant violations abort.

use std::sync::Arc;

use liability_common::{LiabilityError, LiabilityRegime, Result, SAFETY_TARGET};
use tracing::{debug, info, instrument, warn};

use crate::evolution::{EvolutionRun, RunOutcome};
use crate::population::Population;
use crate::telemetry::SweepMetrics;

use super::config::SweepConfig;
use super::result::{SweepPoint, SweepResult};

/// Runs the full (regime × grid) sweep
#[derive(Clone)]
pub struct SweepDriver {
    config: Arc<SweepConfig>,
    metrics: Option<Arc<SweepMetrics>>,
}

impl SweepDriver {
    /// Validate `config` and build a driver
    pub fn new(config: SweepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<SweepMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Evolve a fresh population at one grid point
    pub fn run_point(&self, regime: LiabilityRegime, audit_probability: f64) -> Result<RunOutcome> {
        self.execute(regime, audit_probability, false)
    }

    /// Like [`run_point`](Self::run_point), keeping every generation's shares
    pub fn trace_point(&self, regime: LiabilityRegime, audit_probability: f64) -> Result<RunOutcome> {
        self.execute(regime, audit_probability, true)
    }

    fn execute(
        &self,
        regime: LiabilityRegime,
        audit_probability: f64,
        record_trajectory: bool,
    ) -> Result<RunOutcome> {
        if !(0.0..=1.0).contains(&audit_probability) {
            return Err(LiabilityError::config(format!(
                "audit probability must lie in [0, 1], got {audit_probability}"
            )));
        }
        let round = self.config.round();
        let mut run = EvolutionRun::new(&round, self.config.replicator(), self.config.convergence);
        if record_trajectory {
            run = run.with_trajectory();
        }
        let mut population =
            Population::initialize(self.config.population_size, self.config.initial.shares())?;
        run.execute(&mut population, regime, audit_probability)
    }

    /// Sweep the grid for one regime
    #[instrument(skip(self))]
    pub fn run_regime(&self, regime: LiabilityRegime) -> Result<Vec<SweepPoint>> {
        self.collect_points(regime, |p| self.run_point(regime, p))
    }

    /// Apply the sentinel policy to each grid point's run
    ///
    /// Degenerate runs become NaN rows; any other error aborts the regime.
    fn collect_points<F>(&self, regime: LiabilityRegime, mut run: F) -> Result<Vec<SweepPoint>>
    where
        F: FnMut(f64) -> Result<RunOutcome>,
    {
        let grid = self.config.grid;
        let mut points = Vec::with_capacity(grid.points);

        for audit_probability in grid.values() {
            let point = match run(audit_probability) {
                Ok(outcome) => {
                    if let Some(metrics) = &self.metrics {
                        metrics.record_run(outcome.generations);
                    }
                    SweepPoint {
                        regime,
                        audit_probability,
                        safe_share: outcome.safe_share(),
                        generations: outcome.generations,
                    }
                }
                Err(err) if err.is_recoverable() => {
                    warn!(%regime, audit_probability, error = %err, "degenerate run, recording sentinel");
                    let generations = match err {
                        LiabilityError::DegenerateFitness { generation, .. } => generation,
                        _ => 0,
                    };
                    if let Some(metrics) = &self.metrics {
                        metrics.record_degenerate(generations);
                    }
                    SweepPoint {
                        regime,
                        audit_probability,
                        safe_share: f64::NAN,
                        generations,
                    }
                }
                Err(err) => return Err(err),
            };
            debug!(%regime, audit_probability, safe_share = point.safe_share, "grid point done");
            points.push(point);
        }

        Ok(points)
    }

    /// Sequential sweep over every configured regime
    #[instrument(skip(self))]
    pub fn run(&self) -> Result<SweepResult> {
        self.log_start();
        let mut result = SweepResult::new();
        for regime in &self.config.regimes {
            result.extend(self.run_regime(*regime)?);
        }
        self.log_finish(&result);
        Ok(result)
    }

    /// Sweep with one blocking task per regime
    ///
    /// Every task owns its populations; only the immutable configuration is
    /// shared. Output order matches [`run`](Self::run).
    #[instrument(skip(self))]
    pub async fn run_concurrent(&self) -> Result<SweepResult> {
        self.log_start();
        let handles: Vec<_> = self
            .config
            .regimes
            .iter()
            .map(|regime| {
                let driver = self.clone();
                let regime = *regime;
                tokio::task::spawn_blocking(move || driver.run_regime(regime))
            })
            .collect();

        let mut result = SweepResult::new();
        for handle in handles {
            let points = handle
                .await
                .map_err(|e| LiabilityError::Join(e.to_string()))??;
            result.extend(points);
        }
        self.log_finish(&result);
        Ok(result)
    }

    fn log_start(&self) {
        let model = self.config.payoff_model();
        info!(
            regimes = self.config.regimes.len(),
            grid_points = self.config.grid.points,
            population = self.config.population_size,
            generations = self.config.convergence.max_generations,
            "starting sweep"
        );
        for regime in &self.config.regimes {
            debug!(
                %regime,
                deterrence_threshold = model.deterrence_threshold(*regime),
                "analytic deterrence threshold"
            );
        }
    }

    fn log_finish(&self, result: &SweepResult) {
        for regime in &self.config.regimes {
            match result.threshold_crossing(*regime, SAFETY_TARGET) {
                Some(p) => info!(%regime, audit_probability = p, "safety target reached"),
                None => info!(%regime, "safety target never reached"),
            }
        }
        if result.degenerate_count() > 0 {
            warn!(degenerate = result.degenerate_count(), "sweep contains sentinel points");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liability_common::{AuditGrid, Strategy};

    fn small_config() -> SweepConfig {
        SweepConfig {
            grid: AuditGrid::new(0.0, 1.0, 5).unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SweepConfig {
            population_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            SweepDriver::new(config),
            Err(LiabilityError::Configuration(_))
        ));
    }

    #[test]
    fn test_run_covers_every_grid_point() {
        let driver = SweepDriver::new(small_config()).unwrap();
        let result = driver.run().unwrap();
        assert_eq!(result.len(), 10);
        assert_eq!(result.points()[0].regime, LiabilityRegime::Limited);
        assert_eq!(result.points()[5].regime, LiabilityRegime::Joint);
        assert_eq!(result.degenerate_count(), 0);
    }

    #[test]
    fn test_run_point_rejects_out_of_range_probability() {
        let driver = SweepDriver::new(small_config()).unwrap();
        assert!(matches!(
            driver.run_point(LiabilityRegime::Joint, 1.5),
            Err(LiabilityError::Configuration(_))
        ));
    }

    #[test]
    fn test_trace_point_starts_from_initial_distribution() {
        let driver = SweepDriver::new(small_config()).unwrap();
        let outcome = driver.trace_point(LiabilityRegime::Joint, 0.5).unwrap();
        assert_eq!(outcome.trajectory.len(), 801);
        assert_eq!(outcome.trajectory[0].shares[Strategy::Lazy], 1.0);
    }

    #[test]
    fn test_metrics_count_runs() {
        let metrics = Arc::new(SweepMetrics::new().unwrap());
        let driver = SweepDriver::new(small_config())
            .unwrap()
            .with_metrics(metrics.clone());
        driver.run_regime(LiabilityRegime::Joint).unwrap();
        assert_eq!(metrics.runs_total.get(), 5);
        assert_eq!(metrics.generations_total.get(), 5 * 800);
        assert_eq!(metrics.degenerate_runs_total.get(), 0);
    }

    #[test]
    fn test_invariant_violation_aborts_regime() {
        let driver = SweepDriver::new(small_config()).unwrap();
        let mut calls = 0;
        let result = driver.collect_points(LiabilityRegime::Limited, |p| {
            calls += 1;
            if p > 0.3 {
                Err(LiabilityError::invariant("shares sum to 1.2"))
            } else {
                driver.run_point(LiabilityRegime::Limited, p)
            }
        });
        assert!(matches!(result, Err(LiabilityError::InvariantViolation(_))));
        // Grid 0, 0.25, 0.5: stops at the first failing point
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_degenerate_run_becomes_sentinel() {
        let metrics = Arc::new(SweepMetrics::new().unwrap());
        let driver = SweepDriver::new(small_config())
            .unwrap()
            .with_metrics(metrics.clone());
        let points = driver
            .collect_points(LiabilityRegime::Joint, |p| {
                if p == 1.0 {
                    Err(LiabilityError::DegenerateFitness {
                        mean_fitness: -3.0,
                        generation: 12,
                    })
                } else {
                    driver.run_point(LiabilityRegime::Joint, p)
                }
            })
            .unwrap();

        assert_eq!(points.len(), 5);
        let last = points.last().unwrap();
        assert!(last.is_degenerate());
        assert_eq!(last.generations, 12);
        assert_eq!(metrics.runs_total.get(), 5);
        assert_eq!(metrics.degenerate_runs_total.get(), 1);
        assert_eq!(metrics.generations_total.get(), 4 * 800 + 12);
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let driver = SweepDriver::new(small_config()).unwrap();
        let sequential = driver.run().unwrap();
        let concurrent = driver.run_concurrent().await.unwrap();
        assert_eq!(sequential, concurrent);
    }
}
