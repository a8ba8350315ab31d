use std::fs;

use relkit_core::{FileSet, NullReporter, Step, StepContext, TaskRef};
use relkit_steps::{create_step, BannerStep};
use serde_json::json;
use tempfile::TempDir;

const BANNER: &str = "/*!\n * can - 2.3.0\n * Licensed MIT\n */";

#[test]
fn test_bannerize_prepends_once() {
    let step = BannerStep::new(FileSet::new(&["dist/*.js"], &[]).unwrap(), BANNER);
    let once = step.bannerize("var a;\n").unwrap();
    assert_eq!(once, format!("{}\nvar a;\n", BANNER));
    assert!(step.bannerize(&once).is_none());
}

#[test]
fn test_step_writes_banner_to_every_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("dist/2.3.0");
    fs::create_dir_all(out.join("amd")).unwrap();
    fs::write(out.join("can.jquery.js"), "var a;\n").unwrap();
    fs::write(out.join("amd/can.js"), "define();\n").unwrap();

    let task = TaskRef::new("bannerize", "latest");
    let step = create_step(
        &task,
        json!({ "files": ["dist/2.3.0/**/*.js"], "banner": BANNER, "options": {} }),
    )
    .unwrap();
    assert_eq!(step.describe(), "prepend banner to dist/2.3.0/**/*.js");

    let reporter = NullReporter;
    let ctx = StepContext::new(dir.path(), &task, &reporter);
    step.run(&ctx).unwrap();
    step.run(&ctx).unwrap();

    assert_eq!(
        fs::read_to_string(out.join("can.jquery.js")).unwrap(),
        format!("{}\nvar a;\n", BANNER)
    );
    assert_eq!(
        fs::read_to_string(out.join("amd/can.js")).unwrap(),
        format!("{}\ndefine();\n", BANNER)
    );
}

#[test]
fn test_empty_banner_is_rejected() {
    let task = TaskRef::new("bannerize", "edge");
    assert!(create_step(&task, json!({ "files": "dist/*.js", "banner": "  " })).is_err());
}

#[test]
fn test_missing_files_fail() {
    let dir = TempDir::new().unwrap();
    let task = TaskRef::new("bannerize", "edge");
    let step = create_step(&task, json!({ "files": "dist/edge/*.js", "banner": BANNER })).unwrap();
    let reporter = NullReporter;
    assert!(step
        .run(&StepContext::new(dir.path(), &task, &reporter))
        .is_err());
}
