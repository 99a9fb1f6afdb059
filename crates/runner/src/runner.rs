//! Scenario execution, single and batched.

use crate::result::{RunRecord, RunReport};
use crate::scenario::{Scenario, ScenarioError};
use rayon::prelude::*;
use roomfit_core::{LayoutResult, Planner};
use roomfit_placement::LayoutEngine;

/// Configuration for scenario runs.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Overrides every scenario's time limit (milliseconds, 0 = unlimited).
    pub time_limit_ms: Option<u64>,
    /// Keep full layouts in run records.
    pub keep_layouts: bool,
    /// Run batches in parallel.
    pub parallel: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: None,
            keep_layouts: true,
            parallel: true,
        }
    }
}

impl RunnerConfig {
    /// Creates a new runner configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-run time limit.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets whether full layouts are kept.
    pub fn with_layouts(mut self, keep: bool) -> Self {
        self.keep_layouts = keep;
        self
    }

    /// Sets whether batches run in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Runs scenarios through a fresh [`LayoutEngine`] each.
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: RunnerConfig,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Builds and runs one scenario, returning the layout.
    pub fn plan(&self, scenario: &Scenario) -> Result<LayoutResult, ScenarioError> {
        let setup = scenario.build()?;
        let mut config = setup.config;
        if let Some(ms) = self.config.time_limit_ms {
            config = config.with_time_limit(ms);
        }

        log::info!(
            "running scenario '{}' ({} archetypes, {} zones)",
            scenario.name,
            setup.catalog.len(),
            setup.room.zones.len()
        );
        let engine = LayoutEngine::new(config);
        Ok(engine.plan(&setup.room, &setup.catalog)?)
    }

    /// Runs one scenario, capturing errors in the record.
    pub fn run(&self, scenario: &Scenario) -> RunRecord {
        let record = match self.plan(scenario) {
            Ok(result) => {
                log::info!(
                    "scenario '{}': placed {}/{} in {}ms",
                    scenario.name,
                    result.placed_count,
                    result.total_requested,
                    result.computation_time_ms
                );
                let record = RunRecord::completed(&scenario.name, result);
                if self.config.keep_layouts {
                    record
                } else {
                    record.without_layout()
                }
            }
            Err(e) => {
                log::warn!("scenario '{}' failed: {e}", scenario.name);
                RunRecord::failed(&scenario.name, e)
            }
        };
        record.with_preset(scenario.preset)
    }

    /// Runs every enabled scenario. Records keep the input order.
    pub fn run_all(&self, scenarios: &[Scenario]) -> RunReport {
        let enabled: Vec<&Scenario> = scenarios.iter().filter(|s| s.enabled).collect();
        let skipped = scenarios.len() - enabled.len();
        if skipped > 0 {
            log::info!("skipping {skipped} disabled scenario(s)");
        }

        let records: Vec<RunRecord> = if self.config.parallel {
            enabled.par_iter().map(|s| self.run(s)).collect()
        } else {
            enabled.iter().map(|s| self.run(s)).collect()
        };

        let mut report = RunReport::new();
        for record in records {
            report.add_run(record);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomfit_placement::Preset;

    #[test]
    fn test_run_preset() {
        let runner = ScenarioRunner::default();
        let record = runner.run(&Scenario::from_preset(Preset::Limited));
        assert!(record.is_ok());
        assert_eq!(record.preset.as_deref(), Some("limited"));
        let layout = record.layout.as_ref().unwrap();
        assert_eq!(
            layout.placed_count + layout.failed_count(),
            layout.total_requested
        );
    }

    #[test]
    fn test_invalid_scenario_is_recorded() {
        let scenario = Scenario::from_preset(Preset::Scored).with_override("wall_margin", -1.0);
        let record = ScenarioRunner::default().run(&scenario);
        assert!(record.summary.is_none());
        assert!(record.error.as_deref().unwrap().contains("wall_margin"));
    }

    #[test]
    fn test_run_all_keeps_order_and_skips_disabled() {
        let mut disabled = Scenario::from_preset(Preset::Scored);
        disabled.enabled = false;
        let scenarios = vec![
            Scenario::from_preset(Preset::Deterministic),
            disabled,
            Scenario::from_preset(Preset::Limited),
        ];

        let runner = ScenarioRunner::new(RunnerConfig::new().with_layouts(false));
        let report = runner.run_all(&scenarios);
        let names: Vec<&str> = report.runs.iter().map(|r| r.scenario.as_str()).collect();
        assert_eq!(names, ["deterministic", "limited"]);
        assert!(report.runs.iter().all(|r| r.layout.is_none()));
        assert_eq!(report.failure_count(), 0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let scenarios: Vec<Scenario> = Preset::all()
            .iter()
            .map(|&p| Scenario::from_preset(p))
            .collect();
        let parallel = ScenarioRunner::default().run_all(&scenarios);
        let sequential =
            ScenarioRunner::new(RunnerConfig::new().with_parallel(false)).run_all(&scenarios);

        for (a, b) in parallel.runs.iter().zip(&sequential.runs) {
            let (a, b) = (a.layout.as_ref().unwrap(), b.layout.as_ref().unwrap());
            assert_eq!(a.placed_items, b.placed_items);
            assert_eq!(a.failed_items, b.failed_items);
        }
    }
}
