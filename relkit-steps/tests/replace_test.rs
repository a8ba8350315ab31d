use std::fs;

use relkit_core::{NullReporter, Step, StepContext, TaskConfig, TaskRef, TemplateContext};
use relkit_steps::{create_step, ReplaceStep, Rule, RuleSet};
use serde_json::json;
use tempfile::TempDir;

const BUILT: &str = "/* header\n * multi\n */\nvar a = 1;;\n//\nfunction f() {\n\treturn a; // note\n\t;\n}\n\n\n\nvar b = 2;\n";
const CLEANED: &str = "\nvar a = 1;\nfunction f() {\n\treturn a; // note\n}\n\nvar b = 2;\n";

#[test]
fn test_cleanup_rules() {
    let rules = RuleSet::cleanup().unwrap();
    assert_eq!(rules.len(), 5);
    assert_eq!(rules.apply(BUILT), CLEANED);
}

#[test]
fn test_cleanup_is_stable_on_cleaned_output() {
    let rules = RuleSet::cleanup().unwrap();
    let once = rules.apply(BUILT);
    assert_eq!(rules.apply(&once), once);
}

#[test]
fn test_each_rule() {
    let rules = RuleSet::cleanup().unwrap();
    assert_eq!(rules.apply("a/* x\ny */b"), "ab");
    assert_eq!(rules.apply("a\n//   \nb"), "a\nb");
    assert_eq!(rules.apply("x; ;y"), "x;y");
    assert_eq!(rules.apply("f() // call\n  ;"), "f() // call");
    assert_eq!(rules.apply("a\n\n\n\n\nb"), "a\n\nb");
}

#[test]
fn test_group_reference_in_replacement() {
    let rule = Rule::new(r"(\w+)@(\w+)", "$2 at $1", "g").unwrap();
    assert_eq!(rule.apply("me@home you@work"), "home at me work at you");
}

#[test]
fn test_configured_rules_match_builtin_cleanup() {
    let config = TaskConfig::defaults().unwrap();
    let ctx = TemplateContext::new(json!({
        "meta": config.data()["meta"].clone(),
        "info": { "version": "2.3.0" }
    }));
    let value = config
        .resolve_target(&TaskRef::new("string-replace", "latest"), &ctx)
        .unwrap();
    let specs: Vec<relkit_steps::RuleSpec> =
        serde_json::from_value(value["options"]["replacements"].clone()).unwrap();
    let configured = RuleSet::from_specs(&specs).unwrap();

    assert_eq!(configured.len(), 5);
    assert_eq!(configured.apply(BUILT), RuleSet::cleanup().unwrap().apply(BUILT));
}

#[test]
fn test_step_rewrites_files_and_skips_minified() {
    let dir = TempDir::new().unwrap();
    let edge = dir.path().join("dist/edge");
    fs::create_dir_all(&edge).unwrap();
    fs::write(edge.join("can.js"), BUILT).unwrap();
    fs::write(edge.join("can.min.js"), BUILT).unwrap();

    let task = TaskRef::new("string-replace", "edge");
    let step = create_step(
        &task,
        json!({ "files": ["dist/edge/**/*.js"], "exclude": ["\\.min"], "options": {} }),
    )
    .unwrap();
    assert_eq!(step.describe(), "apply 5 replacements to dist/edge/**/*.js");

    let reporter = NullReporter;
    step.run(&StepContext::new(dir.path(), &task, &reporter)).unwrap();

    assert_eq!(fs::read_to_string(edge.join("can.js")).unwrap(), CLEANED);
    assert_eq!(fs::read_to_string(edge.join("can.min.js")).unwrap(), BUILT);
}

#[test]
fn test_step_fails_without_inputs() {
    let dir = TempDir::new().unwrap();
    let task = TaskRef::new("string-replace", "latest");
    let step = ReplaceStep::from_target(&task, json!({ "files": "dist/2.3.0/**/*.js" })).unwrap();
    let reporter = NullReporter;
    assert!(step
        .run(&StepContext::new(dir.path(), &task, &reporter))
        .is_err());
}

#[test]
fn test_invalid_rule_is_rejected_at_construction() {
    let task = TaskRef::new("string-replace", "edge");
    let result = create_step(
        &task,
        json!({
            "files": ["dist/**/*.js"],
            "options": { "replacements": [{ "pattern": "(unclosed", "replacement": "" }] }
        }),
    );
    assert!(result.is_err());
}

#[test]
fn test_crlf_comment_line_is_left_alone() {
    let rules = RuleSet::cleanup().unwrap();
    let input = "a(); // c\r\n  ;\r\nb();\r\n";
    assert_eq!(rules.apply(input), input);
}

#[test]
fn test_dot_stops_at_carriage_return() {
    let rule = Rule::new(r"(//.*)", "[$1]", "g").unwrap();
    assert_eq!(rule.apply("x // c\r\ny"), "x [// c]\r\ny");
}
