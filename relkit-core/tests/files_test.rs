use std::fs;
use std::path::{Path, PathBuf};

use relkit_core::{Error, FileSet};
use tempfile::TempDir;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "x").unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    for file in [
        "dist/edge/can.jquery.js",
        "dist/edge/can.jquery.min.js",
        "dist/edge/amd/can/control.js",
        "dist/edge/readme.md",
        "dist/2.3.0/can.zepto.js",
        "src/control.js",
    ] {
        touch(dir.path(), file);
    }
    dir
}

#[test]
fn test_double_star_crosses_directories() {
    let dir = fixture();
    let files = FileSet::new(&["dist/edge/**/*.js"], &[]).unwrap();
    assert_eq!(
        files.expand(dir.path()).unwrap(),
        vec![
            PathBuf::from("dist/edge/amd/can/control.js"),
            PathBuf::from("dist/edge/can.jquery.js"),
            PathBuf::from("dist/edge/can.jquery.min.js"),
        ]
    );
}

#[test]
fn test_single_star_stays_in_directory() {
    let dir = fixture();
    let files = FileSet::new(&["dist/*/*.js"], &[]).unwrap();
    let matched = files.expand(dir.path()).unwrap();
    assert_eq!(matched.len(), 3);
    assert!(!matched.contains(&PathBuf::from("dist/edge/amd/can/control.js")));
}

#[test]
fn test_exclusions_are_regexes() {
    let dir = fixture();
    let files = FileSet::new(&["dist/edge/**/*.js"], &[r"\.min\.", "amd/"]).unwrap();
    assert_eq!(
        files.expand(dir.path()).unwrap(),
        vec![PathBuf::from("dist/edge/can.jquery.js")]
    );
}

#[test]
fn test_overlapping_patterns_do_not_repeat_files() {
    let dir = fixture();
    let files = FileSet::new(&["dist/**/*.js", "dist/2.3.0/*.js"], &[]).unwrap();
    let matched = files.expand(dir.path()).unwrap();
    let zepto = matched
        .iter()
        .filter(|p| p.ends_with("can.zepto.js"))
        .count();
    assert_eq!(zepto, 1);
}

#[test]
fn test_leading_dot_slash_is_ignored() {
    let dir = fixture();
    let files = FileSet::new(&["./src/*.js"], &[]).unwrap();
    assert_eq!(
        files.expand(dir.path()).unwrap(),
        vec![PathBuf::from("src/control.js")]
    );
}

#[test]
fn test_missing_base_matches_nothing() {
    let dir = fixture();
    let files = FileSet::new(&["dist/9.9.9/**/*.js"], &[]).unwrap();
    assert!(files.expand(dir.path()).unwrap().is_empty());
}

#[test]
fn test_required_inputs_fail_when_empty() {
    let dir = fixture();
    let files = FileSet::new(&["dist/9.9.9/**/*.js"], &[]).unwrap();
    match files.expand_required(dir.path(), "bannerize:latest").unwrap_err() {
        Error::NoInputs { task, patterns } => {
            assert_eq!(task, "bannerize:latest");
            assert_eq!(patterns, "dist/9.9.9/**/*.js");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_invalid_exclusion_is_rejected() {
    assert!(matches!(
        FileSet::new(&["dist/*.js"], &["(unclosed"]).unwrap_err(),
        Error::InvalidPattern { .. }
    ));
}

#[test]
fn test_wildcards_skip_hidden_files() {
    let dir = fixture();
    touch(dir.path(), "dist/edge/.cache.js");
    let files = FileSet::new(&["dist/edge/*.js"], &[]).unwrap();
    let matched = files.expand(dir.path()).unwrap();
    assert!(!matched.contains(&PathBuf::from("dist/edge/.cache.js")));
    assert!(matched.contains(&PathBuf::from("dist/edge/can.jquery.js")));

    let explicit = FileSet::new(&["dist/edge/.cache.js"], &[]).unwrap();
    assert_eq!(
        explicit.expand(dir.path()).unwrap(),
        vec![PathBuf::from("dist/edge/.cache.js")]
    );
}
