//! Integration tests for scenario files, batch runs and layout audits.

use approx::assert_relative_eq;
use roomfit_placement::{audit, Preset};
use roomfit_runner::{
    load_dir, load_layout, RunReport, RunnerConfig, Scenario, ScenarioRunner, SyntheticScenarios,
};
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("roomfit-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

mod scenario_file_tests {
    use super::*;

    #[test]
    fn test_synthetic_scenarios_survive_toml_and_json() {
        let dir = scratch_dir("formats");
        let scenarios = SyntheticScenarios::all(11, 6);

        for (i, scenario) in scenarios.iter().enumerate() {
            let ext = if i % 2 == 0 { "toml" } else { "json" };
            let path = dir.join(format!("{}.{ext}", scenario.name));
            scenario.save(&path).unwrap();
            assert_eq!(&Scenario::load(&path).unwrap(), scenario);
        }

        let loaded = load_dir(&dir).unwrap();
        assert_eq!(loaded.len(), scenarios.len());
        let mut names: Vec<&str> = loaded.iter().map(|(_, s)| s.name.as_str()).collect();
        names.sort_unstable();
        let mut expected: Vec<&str> = scenarios.iter().map(|s| s.name.as_str()).collect();
        expected.sort_unstable();
        assert_eq!(names, expected);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_dir_ignores_other_files() {
        let dir = scratch_dir("mixed-dir");
        std::fs::write(dir.join("notes.txt"), "not a scenario").unwrap();
        std::fs::write(
            dir.join("a.toml"),
            "name = \"a\"\npreset = \"limited\"\n\n[config]\nmin_spacing = 0.4\n",
        )
        .unwrap();

        let loaded = load_dir(&dir).unwrap();
        assert_eq!(loaded.len(), 1);
        let setup = loaded[0].1.build().unwrap();
        assert_relative_eq!(setup.config.min_spacing, 0.4);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = scratch_dir("malformed");
        let path = dir.join("broken.json");
        std::fs::write(&path, "{ \"name\": ").unwrap();
        assert!(matches!(
            Scenario::load(&path),
            Err(roomfit_runner::ScenarioError::Parse(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}

mod batch_tests {
    use super::*;

    #[test]
    fn test_synthetic_batch_conserves_instances() {
        let scenarios = SyntheticScenarios::all(5, 5);
        let report = ScenarioRunner::default().run_all(&scenarios);
        assert_eq!(report.runs.len(), scenarios.len());

        for record in &report.runs {
            assert!(record.error.is_none(), "{:?}", record.error);
            let layout = record.layout.as_ref().unwrap();
            assert!(layout.validation.is_clean());
            assert_eq!(
                layout.placed_count + layout.failed_count(),
                layout.total_requested
            );
        }
    }

    #[test]
    fn test_report_round_trip() {
        let dir = scratch_dir("report");
        let scenarios = vec![Scenario::from_preset(Preset::Limited)];
        let report = ScenarioRunner::new(RunnerConfig::new()).run_all(&scenarios);

        let json = dir.join("report.json");
        let csv = dir.join("report.csv");
        report.save_json(&json).unwrap();
        report.save_csv(&csv).unwrap();

        let loaded: RunReport =
            serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(loaded.runs.len(), 1);
        assert_eq!(loaded.runs[0].summary, report.runs[0].summary);

        let lines = std::fs::read_to_string(&csv).unwrap();
        assert_eq!(lines.lines().count(), 2);
        assert!(lines
            .lines()
            .nth(1)
            .unwrap()
            .starts_with("\"limited\",\"limited\","));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

mod audit_tests {
    use super::*;

    #[test]
    fn test_saved_layout_passes_audit() {
        let dir = scratch_dir("audit");
        let scenario = Scenario::from_preset(Preset::Deterministic);
        let setup = scenario.build().unwrap();
        let result = ScenarioRunner::default().plan(&scenario).unwrap();

        let covered: f64 = result.placed_items.iter().map(|p| p.length * p.width).sum();
        assert_relative_eq!(
            result.floor_coverage_ratio,
            covered / setup.room.area(),
            epsilon = 1e-12
        );

        let path = dir.join("layout.json");
        std::fs::write(&path, serde_json::to_string(&result).unwrap()).unwrap();
        let placed = load_layout(&path).unwrap();
        assert_eq!(placed, result.placed_items);
        assert!(audit(&setup.room, &setup.config, &placed).is_compliant());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_hand_edited_layout_is_flagged() {
        let dir = scratch_dir("edited");
        let scenario = Scenario::from_preset(Preset::Limited);
        let setup = scenario.build().unwrap();
        let mut placed = ScenarioRunner::default()
            .plan(&scenario)
            .unwrap()
            .placed_items;
        assert!(placed.len() >= 2);

        // Stack the second item on top of the first.
        placed[1].x = placed[0].x;
        placed[1].y = placed[0].y;

        let path = dir.join("edited.json");
        std::fs::write(&path, serde_json::to_string(&placed).unwrap()).unwrap();
        let loaded = load_layout(&path).unwrap();
        let report = audit(&setup.room, &setup.config, &loaded);
        assert!(!report.is_compliant());
        assert!(report.validation.overlap_count >= 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
