use std::fs;

use relkit_core::{NullReporter, Project};
use relkit_steps::create_step;
use tempfile::TempDir;

fn release_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "can", "version": "2.3.0", "repository": { "url": "https://x/y.git" } }"#,
    )
    .unwrap();
    fs::write(dir.path().join("builder.json"), "{}").unwrap();
    dir
}

fn plan(dir: &TempDir, task: &str) -> Vec<(String, String)> {
    let project = Project::load(dir.path(), None).unwrap();
    let runner = project.into_runner(create_step, NullReporter);
    runner
        .plan(&[task.to_string()])
        .unwrap()
        .steps
        .iter()
        .map(|planned| (planned.task.to_string(), planned.describe()))
        .collect()
}

#[test]
fn test_deploy_plan() {
    let dir = release_project();
    let steps = plan(&dir, "deploy");

    let expected = vec![
        ("build:latest", "node can/build/build.js --out dist/2.3.0 --version 2.3.0"),
        ("build:latestPlugins", "node can/build/plugins.js --out dist/2.3.0 --version 2.3.0"),
        ("string-replace:latest", "apply 5 replacements to dist/2.3.0/**/*.js"),
        ("beautify:dist", "js-beautify --indent-size 1 --indent-char '\t' --replace 'dist/**/*.js'"),
        ("bannerize:latest", "prepend banner to dist/2.3.0/**/*.js"),
        ("docco:latest", "docco --output dist/2.3.0/docs 'dist/2.3.0/**/*.js'"),
        ("shell:bundleLatest", "cd dist && zip -r can.js.2.3.0.zip 2.3.0/"),
        ("shell:cleanup", "rm -rf build/gh-pages"),
        ("shell:getGhPages", "git clone -b gh-pages https://x/y.git build/gh-pages"),
        (
            "shell:copyLatest",
            "rm -rf build/gh-pages/release/2.3.0 \
             && cp -R dist/2.3.0 build/gh-pages/release/2.3.0 \
             && cp dist/can.js.2.3.0.zip build/gh-pages/downloads \
             && rm -rf build/gh-pages/release/latest \
             && cp -R dist/2.3.0 build/gh-pages/release/latest",
        ),
        (
            "shell:updateGhPages",
            r#"cd build/gh-pages && git add . --all && git commit -m "Updating release (latest: 2.3.0)" && git push origin"#,
        ),
        ("shell:cleanup", "rm -rf build/gh-pages"),
    ];

    let expected: Vec<(String, String)> = expected
        .into_iter()
        .map(|(task, description)| (task.to_string(), description.to_string()))
        .collect();
    assert_eq!(steps, expected);
}

#[test]
fn test_edge_plan_targets_edge_channel() {
    let dir = release_project();
    let steps = plan(&dir, "edge");
    assert_eq!(steps[0].1, "node can/build/build.js --out dist/edge");
    assert_eq!(steps[2].1, "apply 5 replacements to dist/edge/**/*.js");
    assert_eq!(steps[5].1, "docco --output dist/edge/docs 'dist/edge/**/*.js'");
}

#[test]
fn test_overridden_output_directory_flows_through() {
    let dir = release_project();
    fs::write(dir.path().join("relkit.toml"), "[meta]\nout = \"public\"\n").unwrap();
    let steps = plan(&dir, "shell:bundleLatest");
    assert_eq!(
        steps,
        vec![(
            "shell:bundleLatest".to_string(),
            "cd public && zip -r can.js.2.3.0.zip 2.3.0/".to_string()
        )]
    );
}

#[test]
fn test_dry_run_touches_nothing() {
    let dir = release_project();
    let project = Project::load(dir.path(), None).unwrap();
    let runner = project
        .into_runner(create_step, NullReporter)
        .with_dry_run(true);
    let summary = runner.run(&["deploy".to_string()]).unwrap();
    assert_eq!(summary.steps.len(), 12);
    assert!(!dir.path().join("dist").exists());
}
