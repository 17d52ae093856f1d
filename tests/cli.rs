use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn penguin_forest(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_penguin-forest"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn sample_data() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/penguins_sample.csv")
}

fn write_config(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("config.json");
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn help_prints_usage() {
    let output = penguin_forest(&[Path::new("--help")]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: penguin-forest"));
    assert!(stdout.contains("[CONFIG]"));
}

#[test]
fn missing_data_argument_is_a_usage_error() {
    let output = penguin_forest(&[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn fatal_errors_reach_stderr_with_logging_off() {
    let dir = tempfile::tempdir().unwrap();
    let output = penguin_forest(&[&dir.path().join("missing.csv")]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("load failed:"), "{stderr}");
}

#[test]
fn bad_label_fails_in_the_train_stage() {
    let dir = tempfile::tempdir().unwrap();
    for label in ["body_mass_g", "sex"] {
        let config = write_config(dir.path(), &format!(r#"{{"label_column": "{label}"}}"#));
        let output = penguin_forest(&[&sample_data(), &config]);
        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("train failed:"), "{label}: {stderr}");
    }
}

#[test]
fn sample_run_prints_summary_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), r#"{"model_params": {"n_trees": 25}}"#);
    let output = penguin_forest(&[&sample_data(), &config]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Rows: 32"));
    assert!(stdout.contains("Means by species:"));
    assert!(stdout.contains("Split: 32 rows -> 22 training / 10 testing"));
    assert!(stdout.contains("Confusion matrix:"));
}
