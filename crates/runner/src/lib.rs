//! Scenario runner for roomfit
//!
//! This crate provides:
//! - Scenario files (TOML or JSON) built on presets with field-level overrides
//! - Single and parallel batch runs
//! - Synthetic catalog generation for stress runs
//! - Run records, summary tables, and JSON/CSV reports
//! - Layout loading for audits of saved or hand-edited layouts

mod result;
mod runner;
mod scenario;
mod synthetic;

pub use result::{load_layout, print_layout, RunRecord, RunReport};
pub use runner::{RunnerConfig, ScenarioRunner};
pub use scenario::{apply_overrides, load_dir, Scenario, ScenarioError, ScenarioSetup};
pub use synthetic::{SyntheticGenerator, SyntheticScenarios};
