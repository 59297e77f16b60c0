use anyhow::Result;
use std::process::Command;
use tempfile::TempDir;

fn agent() -> Command {
    Command::new(env!("CARGO_BIN_EXE_local-job-agent"))
}

#[test]
fn test_missing_config_exits_with_error() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let output = agent()
        .current_dir(temp_dir.path())
        .args(["--config", "nope.yaml"])
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR:"));
    assert!(stderr.contains("Config file not found"));

    Ok(())
}

#[test]
fn test_dry_run_prints_plan_without_writing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("agent.yaml"),
        "sources:\n  enabled: [mock]\noutput:\n  path: out/jobs.json\n",
    )?;

    let output = agent()
        .current_dir(temp_dir.path())
        .args(["--config", "agent.yaml", "--dry-run", "--sources", "indeed", "monster"])
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(dry run)"));
    assert!(stdout.contains("  - indeed"));
    assert!(stdout.contains("  - monster"));
    assert!(!stdout.contains("  - mock"));
    assert!(!temp_dir.path().join("out/jobs.json").exists());

    Ok(())
}

#[test]
fn test_mock_run_writes_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("agent.yaml"),
        "sources:\n  enabled: [mock]\n",
    )?;

    let output = agent()
        .current_dir(temp_dir.path())
        .args(["--config", "agent.yaml"])
        .output()?;

    assert!(output.status.success());
    let written = std::fs::read(temp_dir.path().join("data/jobs.json"))?;
    let value: serde_json::Value = serde_json::from_slice(&written)?;
    assert_eq!(value["total_results"], 2);
    assert_eq!(value["counts_by_source"]["mock"], 2);
    assert_eq!(std::fs::read_dir(temp_dir.path().join("data/snapshots"))?.count(), 1);

    Ok(())
}

#[test]
fn test_empty_source_name_is_a_warning() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("agent.yaml"),
        "sources:\n  enabled: [mock, \"\"]\n",
    )?;

    let output = agent()
        .current_dir(temp_dir.path())
        .args(["--config", "agent.yaml"])
        .output()?;

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("WARNING: Unknown source ''"));
    let written = std::fs::read(temp_dir.path().join("data/jobs.json"))?;
    let value: serde_json::Value = serde_json::from_slice(&written)?;
    assert_eq!(value["total_results"], 2);

    Ok(())
}

#[test]
fn test_non_mapping_config_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("agent.yaml"), "- mock\n- usajobs\n")?;

    let output = agent()
        .current_dir(temp_dir.path())
        .args(["--config", "agent.yaml"])
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("mapping"));

    Ok(())
}
