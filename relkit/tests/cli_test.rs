use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn create_project(dir: &Path, config: &str) {
    fs::write(
        dir.join("package.json"),
        r#"{ "name": "can", "version": "2.3.0", "repository": { "url": "https://x/y.git" } }"#,
    )
    .unwrap();
    fs::write(dir.join("builder.json"), "{}").unwrap();
    if !config.is_empty() {
        fs::write(dir.join("relkit.toml"), config).unwrap();
    }
}

fn relkit(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_relkit"))
        .arg("--root")
        .arg(dir)
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_list_json() {
    let temp_dir = TempDir::new().unwrap();
    create_project(temp_dir.path(), "");

    let output = relkit(temp_dir.path(), &["list", "--json"]);
    assert!(output.status.success());

    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        listing["pipelines"]["deploy"],
        serde_json::json!(["latest", "shell:bundleLatest", "ghpages"])
    );
    assert_eq!(
        listing["tasks"]["docco"],
        serde_json::json!(["edge", "latest"])
    );
}

#[test]
fn test_plan_deploy_json() {
    let temp_dir = TempDir::new().unwrap();
    create_project(temp_dir.path(), "");

    let output = relkit(temp_dir.path(), &["plan", "deploy", "--json"]);
    assert!(output.status.success());

    let steps: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(steps.len(), 12);
    assert_eq!(steps[0]["task"], "build:latest");
    assert_eq!(steps[6]["description"], "cd dist && zip -r can.js.2.3.0.zip 2.3.0/");
    assert_eq!(steps[11]["task"], "shell:cleanup");
}

#[test]
fn test_run_stops_at_failing_step() {
    let temp_dir = TempDir::new().unwrap();
    create_project(
        temp_dir.path(),
        r#"
[pipelines]
release = ["shell:first", "shell:fail", "shell:last"]

[shell.first]
command = "touch first"

[shell.fail]
command = "exit 4"

[shell.last]
command = "touch last"
"#,
    );

    let output = relkit(temp_dir.path(), &["run", "release"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(temp_dir.path().join("first").exists());
    assert!(!temp_dir.path().join("last").exists());
    assert!(String::from_utf8_lossy(&output.stderr).contains("shell:fail"));
}

#[test]
fn test_run_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    create_project(
        temp_dir.path(),
        "[shell.hello]\ncommand = \"echo hello > greeting\"\n",
    );

    let output = relkit(temp_dir.path(), &["-q", "run", "shell:hello"]);
    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("greeting")).unwrap(),
        "hello\n"
    );
}

#[test]
fn test_unknown_task_fails() {
    let temp_dir = TempDir::new().unwrap();
    create_project(temp_dir.path(), "");

    let output = relkit(temp_dir.path(), &["plan", "publish"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("publish"));
}

#[test]
fn test_missing_metadata_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = relkit(temp_dir.path(), &["list"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("package.json"));
}

#[test]
fn test_check_reports_broken_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    create_project(temp_dir.path(), "[pipelines]\nbroken = [\"shell:gone\"]\n");

    let output = relkit(temp_dir.path(), &["check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("broken"));
}

#[test]
fn test_check_passes_with_defaults() {
    let temp_dir = TempDir::new().unwrap();
    create_project(temp_dir.path(), "");

    let output = relkit(temp_dir.path(), &["check"]);
    assert!(output.status.success());
}

#[test]
fn test_check_warns_about_unsupported_tasks() {
    let temp_dir = TempDir::new().unwrap();
    create_project(temp_dir.path(), "");

    let output = relkit(temp_dir.path(), &["check"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("changelog"));
    assert!(!stdout.contains("'testify'"));
}
