//! Run records and batch reports.

use crate::scenario::ScenarioError;
use roomfit_core::{LayoutResult, LayoutSummary, PlacedItem};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Outcome of running one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Scenario name
    pub scenario: String,
    /// Base preset, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    /// Scorer that ranked candidates
    #[serde(default)]
    pub scorer: String,
    /// Headline numbers (absent when the run failed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<LayoutSummary>,
    /// Whether the run was cut short
    #[serde(default)]
    pub cancelled: bool,
    /// Fatal error, if the run could not start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Full layout (optional, for inspection and later audits)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutResult>,
}

impl RunRecord {
    /// Record of a completed run.
    pub fn completed(scenario: impl Into<String>, result: LayoutResult) -> Self {
        Self {
            scenario: scenario.into(),
            preset: None,
            scorer: result.scorer.clone(),
            summary: Some(result.summary()),
            cancelled: result.cancelled,
            error: None,
            layout: Some(result),
        }
    }

    /// Record of a run that failed before placement.
    pub fn failed(scenario: impl Into<String>, error: impl ToString) -> Self {
        Self {
            scenario: scenario.into(),
            preset: None,
            scorer: String::new(),
            summary: None,
            cancelled: false,
            error: Some(error.to_string()),
            layout: None,
        }
    }

    /// Sets the base preset name.
    pub fn with_preset(mut self, preset: Option<impl ToString>) -> Self {
        self.preset = preset.map(|p| p.to_string());
        self
    }

    /// Drops the full layout, keeping only the summary.
    pub fn without_layout(mut self) -> Self {
        self.layout = None;
        self
    }

    /// True if the run completed without overlaps.
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.summary.as_ref().is_some_and(|s| s.overlaps == 0)
    }
}

/// Collection of run records.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Individual run records
    pub runs: Vec<RunRecord>,
    /// When the report was created
    pub timestamp: String,
    /// Crate version that produced the report
    pub version: String,
}

impl RunReport {
    /// Creates an empty report stamped with the current time.
    pub fn new() -> Self {
        Self {
            runs: Vec::new(),
            timestamp: timestamp::Datetime::now().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Adds a run record.
    pub fn add_run(&mut self, record: RunRecord) {
        self.runs.push(record);
    }

    /// Number of runs that could not start or produced overlaps.
    pub fn failure_count(&self) -> usize {
        self.runs.iter().filter(|r| !r.is_ok()).count()
    }

    /// Mean success rate over completed runs, as a percentage.
    pub fn mean_success_percent(&self) -> Option<f64> {
        let rates: Vec<f64> = self
            .runs
            .iter()
            .filter_map(|r| r.summary.as_ref().map(|s| s.success_percent))
            .collect();
        if rates.is_empty() {
            None
        } else {
            Some(rates.iter().sum::<f64>() / rates.len() as f64)
        }
    }

    /// Saves the report as pretty JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Saves one summary line per run as CSV.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        writeln!(
            file,
            "scenario,preset,scorer,requested,placed,failed,success_percent,coverage_percent,overlaps,warnings,time_ms,cancelled,error"
        )?;

        for run in &self.runs {
            let numbers = run.summary.as_ref().map_or_else(
                || ",,,,,,,".to_string(),
                |s| {
                    format!(
                        "{},{},{},{:.2},{:.2},{},{},{}",
                        s.total_requested,
                        s.placed,
                        s.failed,
                        s.success_percent,
                        s.coverage_percent,
                        s.overlaps,
                        s.warnings,
                        s.time_ms
                    )
                },
            );
            writeln!(
                file,
                "{},{},{},{},{},{}",
                csv_field(&run.scenario),
                csv_field(run.preset.as_deref().unwrap_or("")),
                csv_field(&run.scorer),
                numbers,
                run.cancelled,
                csv_field(run.error.as_deref().unwrap_or("")),
            )?;
        }
        Ok(())
    }

    /// Prints a summary table to stdout.
    pub fn print_summary(&self) {
        println!("\n{:=<100}", "");
        println!("PLACEMENT RESULTS");
        println!("{:=<100}", "");
        println!(
            "{:<28} {:<14} {:>8} {:>8} {:>9} {:>10} {:>8} {:>9}",
            "Scenario", "Preset", "Placed", "Failed", "Success%", "Coverage%", "Overlap", "Time(ms)"
        );
        println!("{:-<100}", "");

        for run in &self.runs {
            let preset = run.preset.as_deref().unwrap_or("-");
            match (&run.summary, &run.error) {
                (Some(s), _) => println!(
                    "{:<28} {:<14} {:>8} {:>8} {:>9.1} {:>10.1} {:>8} {:>9}{}",
                    run.scenario,
                    preset,
                    format!("{}/{}", s.placed, s.total_requested),
                    s.failed,
                    s.success_percent,
                    s.coverage_percent,
                    s.overlaps,
                    s.time_ms,
                    if run.cancelled { "  (cancelled)" } else { "" }
                ),
                (None, error) => println!(
                    "{:<28} {:<14} ERROR: {}",
                    run.scenario,
                    preset,
                    error.as_deref().unwrap_or("unknown")
                ),
            }
        }

        println!("{:-<100}", "");
        if let Some(mean) = self.mean_success_percent() {
            println!("Mean success: {mean:.1}%");
        }
        println!("{:=<100}\n", "");
    }
}

/// Quotes a CSV text field, doubling embedded quotes.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Prints the placed and failed items of one run.
pub fn print_layout(result: &LayoutResult) {
    println!("\n{:-<72}", "");
    println!(
        "Placed {}/{} items ({}), coverage {:.1}%, scorer {}",
        result.placed_count,
        result.total_requested,
        result.success_percent(),
        result.floor_coverage_ratio * 100.0,
        result.scorer
    );
    println!("{:-<72}", "");
    for item in &result.placed_items {
        println!(
            "  {:<26} {:<11} ({:>6.2}, {:>6.2})  {:.2} x {:.2}  score {:.3}",
            item.label(),
            item.zone,
            item.x,
            item.y,
            item.length,
            item.width,
            item.score
        );
    }
    if !result.failed_items.is_empty() {
        println!("Failed:");
        for failed in &result.failed_items {
            println!("  {}#{}: {}", failed.name, failed.instance, failed.reason);
        }
    }
    println!(
        "Validation: {} ({} overlaps, {} spacing warnings)",
        result.validation.status, result.validation.overlap_count, result.validation.warning_count
    );
}

/// Accepted shapes of a layout file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LayoutFile {
    Record(Box<RunRecord>),
    Result(Box<LayoutResult>),
    Items(Vec<PlacedItem>),
}

/// Reads placed items from a JSON file holding a run record, a layout
/// result, or a bare item list.
pub fn load_layout(path: &Path) -> Result<Vec<PlacedItem>, ScenarioError> {
    let content = fs::read_to_string(path)?;
    let file: LayoutFile =
        serde_json::from_str(&content).map_err(|e| ScenarioError::Parse(e.to_string()))?;
    match file {
        LayoutFile::Record(record) => record.layout.map(|l| l.placed_items).ok_or_else(|| {
            ScenarioError::Parse(format!(
                "run record '{}' in {} carries no layout",
                record.scenario,
                path.display()
            ))
        }),
        LayoutFile::Result(result) => Ok(result.placed_items),
        LayoutFile::Items(items) => Ok(items),
    }
}

/// UTC timestamps without a date-time dependency.
mod timestamp {
    use std::time::{SystemTime, UNIX_EPOCH};

    pub struct Datetime {
        year: i64,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    }

    impl Datetime {
        pub fn now() -> Self {
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_secs());
            Self::from_unix(secs)
        }

        pub fn from_unix(secs: u64) -> Self {
            let days = (secs / 86_400) as i64;
            let time_of_day = secs % 86_400;

            // Civil-from-days over 400-year eras.
            let z = days + 719_468;
            let era = z.div_euclid(146_097);
            let doe = z.rem_euclid(146_097);
            let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
            let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
            let mp = (5 * doy + 2) / 153;
            let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
            let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
            let year = yoe + era * 400 + i64::from(month <= 2);

            Self {
                year,
                month,
                day,
                hour: (time_of_day / 3600) as u32,
                minute: ((time_of_day % 3600) / 60) as u32,
                second: (time_of_day % 60) as u32,
            }
        }
    }

    impl std::fmt::Display for Datetime {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                self.year, self.month, self.day, self.hour, self.minute, self.second
            )
        }
    }
}
