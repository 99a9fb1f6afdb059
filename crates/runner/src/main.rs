//! roomfit command-line runner

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use roomfit_core::total_quantity;
use roomfit_placement::{audit, Preset};
use roomfit_runner::{
    load_dir, load_layout, print_layout, RunRecord, RunReport, RunnerConfig, Scenario,
    ScenarioRunner, SyntheticScenarios,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roomfit")]
#[command(about = "Automatic furniture placement runner")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in presets
    Presets,

    /// Place one preset or scenario file
    Run {
        /// Built-in preset to run
        #[arg(short, long, value_enum, default_value = "scored")]
        preset: PresetArg,

        /// Scenario file (TOML or JSON); takes precedence over --preset
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Time limit in milliseconds (0 = unlimited)
        #[arg(short, long)]
        time_limit: Option<u64>,

        /// Output file for the full run record (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run every scenario in a directory, or every preset
    RunAll {
        /// Directory of scenario files; all presets when omitted
        dir: Option<PathBuf>,

        /// Time limit per run in milliseconds (0 = unlimited)
        #[arg(short, long)]
        time_limit: Option<u64>,

        /// Run scenarios one after another
        #[arg(long)]
        sequential: bool,

        /// Output file for results (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for CSV results
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Audit a saved layout against a preset or scenario room
    Validate {
        /// Layout file (run record, layout result, or item list; JSON)
        layout: PathBuf,

        /// Preset supplying the room and margins
        #[arg(short, long, value_enum, default_value = "scored")]
        preset: PresetArg,

        /// Scenario file supplying the room and margins; takes precedence over --preset
        #[arg(short, long)]
        scenario: Option<PathBuf>,
    },

    /// Generate synthetic scenario files
    GenerateSynthetic {
        /// Output directory
        #[arg(short, long, default_value = "scenarios/synthetic")]
        output: PathBuf,

        /// Random seed for reproducibility
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Archetypes per scenario
        #[arg(short, long, default_value = "12")]
        count: usize,

        /// File format
        #[arg(short, long, value_enum, default_value = "toml")]
        format: FormatArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    /// Bounded 5-item layout with size and coverage caps
    Limited,
    /// Full catalog, best-scoring position per item
    Scored,
    /// Reduced catalog, first-fit with strategic positions
    Deterministic,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Limited => Preset::Limited,
            PresetArg::Scored => Preset::Scored,
            PresetArg::Deterministic => Preset::Deterministic,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Toml,
    Json,
}

impl FormatArg {
    fn extension(self) -> &'static str {
        match self {
            FormatArg::Toml => "toml",
            FormatArg::Json => "json",
        }
    }
}

fn load_scenario(scenario: Option<PathBuf>, preset: PresetArg) -> anyhow::Result<Scenario> {
    match scenario {
        Some(path) => Scenario::load(&path)
            .with_context(|| format!("loading scenario {}", path.display())),
        None => Ok(Scenario::from_preset(preset.into())),
    }
}

fn runner_config(time_limit: Option<u64>) -> RunnerConfig {
    match time_limit {
        Some(ms) => RunnerConfig::new().with_time_limit(ms),
        None => RunnerConfig::new(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Presets => {
            println!("Available presets:");
            println!("==================");
            for preset in Preset::all() {
                println!(
                    "  {:<14} {:>3} items  {}",
                    preset.name(),
                    total_quantity(&preset.catalog()),
                    preset.description()
                );
            }
            println!("\nUse 'roomfit run -p <PRESET>' to place a preset");
        }

        Commands::Run {
            preset,
            scenario,
            time_limit,
            output,
        } => {
            let scenario = load_scenario(scenario, preset)?;
            let runner = ScenarioRunner::new(runner_config(time_limit));
            let result = runner
                .plan(&scenario)
                .with_context(|| format!("running scenario '{}'", scenario.name))?;

            print_layout(&result);

            let record = RunRecord::completed(&scenario.name, result).with_preset(scenario.preset);
            let mut report = RunReport::new();
            report.add_run(record);
            report.print_summary();

            if let Some(path) = output {
                report.save_json(&path)?;
                println!("Results saved to: {}", path.display());
            }
        }

        Commands::RunAll {
            dir,
            time_limit,
            sequential,
            output,
            csv,
        } => {
            let scenarios: Vec<Scenario> = match &dir {
                Some(dir) => load_dir(dir)
                    .with_context(|| format!("loading scenarios from {}", dir.display()))?
                    .into_iter()
                    .map(|(_, scenario)| scenario)
                    .collect(),
                None => Preset::all().iter().map(|&p| Scenario::from_preset(p)).collect(),
            };
            if scenarios.is_empty() {
                bail!("no scenarios to run");
            }
            println!("Running {} scenario(s)...", scenarios.len());

            let config = runner_config(time_limit)
                .with_parallel(!sequential)
                .with_layouts(output.is_some());
            let report = ScenarioRunner::new(config).run_all(&scenarios);
            report.print_summary();

            if let Some(path) = output {
                report.save_json(&path)?;
                println!("Results saved to: {}", path.display());
            }
            if let Some(path) = csv {
                report.save_csv(&path)?;
                println!("CSV saved to: {}", path.display());
            }

            let failures = report.failure_count();
            if failures > 0 {
                bail!("{failures} scenario(s) failed or produced overlaps");
            }
        }

        Commands::Validate {
            layout,
            preset,
            scenario,
        } => {
            let scenario = load_scenario(scenario, preset)?;
            let setup = scenario.build()?;
            let placed = load_layout(&layout)
                .with_context(|| format!("loading layout {}", layout.display()))?;

            let report = audit(&setup.room, &setup.config, &placed);
            println!(
                "Audited {} items against '{}': {} ({} overlaps, {} spacing warnings, {} boundary violations)",
                placed.len(),
                scenario.name,
                report.validation.status,
                report.validation.overlap_count,
                report.validation.warning_count,
                report.violations.len()
            );
            for collision in &report.validation.collisions {
                println!(
                    "  overlap: {} at ({:.2}, {:.2}) and {} at ({:.2}, {:.2})",
                    collision.first,
                    collision.first_position.0,
                    collision.first_position.1,
                    collision.second,
                    collision.second_position.0,
                    collision.second_position.1
                );
            }
            for violation in &report.violations {
                println!("  violation: {violation}");
            }

            if !report.is_compliant() {
                bail!("layout is not compliant");
            }
        }

        Commands::GenerateSynthetic {
            output,
            seed,
            count,
            format,
        } => {
            std::fs::create_dir_all(&output)?;
            println!(
                "Generating synthetic scenarios (seed={}) to {}...",
                seed,
                output.display()
            );

            let scenarios = SyntheticScenarios::all(seed, count);
            for scenario in &scenarios {
                let path = output.join(format!("{}.{}", scenario.name, format.extension()));
                scenario.save(&path)?;
                let pieces = scenario.catalog.as_deref().map_or(0, total_quantity);
                println!("  {} ... OK ({} pieces)", scenario.name, pieces);
            }

            println!("\nGenerated {} synthetic scenarios", scenarios.len());
        }
    }

    Ok(())
}
