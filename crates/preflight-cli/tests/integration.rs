#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn preflight(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("preflight").unwrap();
    cmd.current_dir(dir.path())
        .env("PREFLIGHT_ROOT", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    serde_json::from_slice(&output.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// preflight / preflight verify
// ---------------------------------------------------------------------------

#[cfg(all(feature = "mcp", feature = "analysis", feature = "database"))]
#[test]
fn no_arguments_runs_the_import_check() {
    let dir = TempDir::new().unwrap();
    preflight(&dir)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("🧪 Testing MCP Imports\n==============================\n"))
        .stdout(predicate::str::contains("1. Testing basic MCP imports...\n✅ Basic MCP imports successful"))
        .stdout(predicate::str::contains("2. Testing analyzer import...\n✅ Analyzer import successful"))
        .stdout(predicate::str::contains("3. Testing database import...\n✅ Database import successful"))
        .stdout(predicate::str::ends_with("\n🎉 All imports successful!\n"))
        .stderr(predicate::str::is_empty());
}

#[cfg(all(feature = "mcp", feature = "analysis", feature = "database"))]
#[test]
fn verify_subcommand_matches_default() {
    let dir = TempDir::new().unwrap();
    let default = preflight(&dir).output().unwrap();
    let explicit = preflight(&dir).arg("verify").output().unwrap();
    assert_eq!(default.status.code(), Some(0));
    assert_eq!(default.status.code(), explicit.status.code());
    assert_eq!(default.stdout, explicit.stdout);
}

#[cfg(all(feature = "mcp", feature = "analysis", feature = "database"))]
#[test]
fn verify_json_reports_every_step() {
    let dir = TempDir::new().unwrap();
    let json = stdout_json(preflight(&dir).args(["verify", "--json"]));
    assert_eq!(json["verdict"], "passed");

    let steps = json["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 3);
    for (i, step) in steps.iter().enumerate() {
        assert_eq!(step["number"], i + 1);
        assert_eq!(step["status"], "passed");
    }
    assert_eq!(steps[1]["subject"], "analyzer import");
}

#[cfg(all(feature = "mcp", feature = "analysis", not(feature = "database")))]
#[test]
fn missing_database_exits_one_after_two_steps() {
    let dir = TempDir::new().unwrap();
    let output = preflight(&dir).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stdout.matches("✅").count(), 2);
    assert!(stdout.contains("3. Testing database import..."));
    assert!(stdout.contains(
        "❌ Import failed: module not found: database.clinical_trial_database"
    ));
    assert!(!stdout.contains("🎉"));

    assert!(stderr.starts_with("Trace:
"));
    assert!(stderr.contains("  step 3 (database import)"));
    assert!(stderr.contains("stack backtrace:"));
    assert!(!stderr.contains("capability unavailable"));
}

#[cfg(not(feature = "mcp"))]
#[test]
fn missing_framework_exits_one_before_step_two() {
    let dir = TempDir::new().unwrap();
    let output = preflight(&dir).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stdout.contains("1. Testing basic MCP imports..."));
    assert!(stdout.contains("❌ Import failed: module not found: mcp.server"));
    assert!(!stdout.contains("✅"));
    assert!(!stdout.contains("2. Testing"));
    assert!(!stdout.contains("🎉"));

    assert!(stderr.starts_with("Trace:
"));
    assert!(stderr.contains("stack backtrace:"));
}

#[cfg(not(all(feature = "mcp", feature = "analysis", feature = "database")))]
#[test]
fn failing_verify_json_still_exits_one() {
    let dir = TempDir::new().unwrap();
    let output = preflight(&dir).args(["verify", "--json"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["verdict"], "failed");
    let steps = json["steps"].as_array().unwrap();
    assert_eq!(steps.last().unwrap()["status"], "failed");
}

// ---------------------------------------------------------------------------
// preflight status / setup
// ---------------------------------------------------------------------------

#[test]
fn status_on_empty_project_warns_but_succeeds() {
    let dir = TempDir::new().unwrap();
    preflight(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("MCP Chat Not Available"))
        .stdout(predicate::str::contains("MCP server file not found"))
        .stdout(predicate::str::contains("MCP chat file not found"));
}

#[cfg(feature = "mcp")]
#[test]
fn status_json_sees_entry_files() {
    let dir = TempDir::new().unwrap();
    let mcp = dir.path().join("src/mcp");
    std::fs::create_dir_all(&mcp).unwrap();
    std::fs::write(mcp.join("clinical_trial_mcp_server_fixed.py"), b"").unwrap();
    std::fs::write(mcp.join("clinical_trial_chat_mcp.py"), b"").unwrap();

    let json = stdout_json(preflight(&dir).args(["status", "--json"]));
    assert_eq!(json["status"]["mcp_package"], true);
    assert_eq!(json["status"]["mcp_server_file"], true);
    assert_eq!(json["status"]["mcp_chat_file"], true);
}

#[test]
fn setup_uses_configured_runtime() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".preflight")).unwrap();
    std::fs::write(
        dir.path().join(".preflight/config.yaml"),
        "runtime:\n  command: python3.12\n",
    )
    .unwrap();

    preflight(&dir)
        .arg("setup")
        .assert()
        .success()
        .stdout(predicate::str::contains("🔧 MCP Setup Instructions"))
        .stdout(predicate::str::contains(
            "$ python3.12 src/mcp/clinical_trial_mcp_server_fixed.py",
        ))
        .stdout(predicate::str::contains("MCP is optional"));
}

// ---------------------------------------------------------------------------
// preflight paths
// ---------------------------------------------------------------------------

#[test]
fn paths_fails_on_empty_project() {
    let dir = TempDir::new().unwrap();
    preflight(&dir)
        .arg("paths")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Cache Directory"))
        .stderr(predicate::str::contains("layout check found 8 issue(s)"));
}

#[test]
fn paths_create_then_databases_complete_the_layout() {
    let dir = TempDir::new().unwrap();
    preflight(&dir)
        .args(["paths", "--create"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("created"))
        .stderr(predicate::str::contains("layout check found 2 issue(s)"));
    assert!(dir.path().join("data/cache").is_dir());
    assert!(dir.path().join("tests").is_dir());

    std::fs::write(dir.path().join("data/processed/clinical_trials.db"), b"").unwrap();
    std::fs::write(dir.path().join("data/processed/trial_analysis_results.db"), b"").unwrap();

    preflight(&dir)
        .arg("paths")
        .assert()
        .success()
        .stdout(predicate::str::contains("Layout is complete"));
}

// ---------------------------------------------------------------------------
// preflight config
// ---------------------------------------------------------------------------

#[test]
fn config_init_writes_once() {
    let dir = TempDir::new().unwrap();
    preflight(&dir).args(["config", "init"]).assert().success();
    assert!(dir.path().join(".preflight/config.yaml").exists());

    preflight(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config already exists"));

    preflight(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_validate_rejects_empty_runtime() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".preflight")).unwrap();
    std::fs::write(
        dir.path().join(".preflight/config.yaml"),
        "runtime:\n  command: \"\"\n",
    )
    .unwrap();

    preflight(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] runtime.command is empty"));
}

#[test]
fn config_show_reports_defaults() {
    let dir = TempDir::new().unwrap();
    let json = stdout_json(preflight(&dir).args(["config", "show", "--json"]));
    assert_eq!(json["runtime"]["command"], "python3");
    assert_eq!(json["mcp"]["chat_entry"], "src/mcp/clinical_trial_chat_mcp.py");
}
