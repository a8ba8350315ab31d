//! `string-replace` task kind: ordered regex substitutions applied in place.

use std::borrow::Cow;
use std::fs;

use regex::Regex;
use relkit_core::files::compile_regex;
use relkit_core::{parse_target, Error, FileSet, Result, Step, StepContext, TaskRef};
use serde::Deserialize;
use serde_json::Value;

use crate::fields::OneOrMany;

/// A substitution rule as written in the configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSpec {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
    /// JavaScript-style flags: `g` replaces every match, `i`, `m` and `s`
    /// map to the regex flags of the same name.
    #[serde(default = "default_flags")]
    pub flags: String,
}

fn default_flags() -> String {
    "g".to_string()
}

/// A compiled substitution rule.
#[derive(Debug, Clone)]
pub struct Rule {
    regex: Regex,
    replacement: String,
    global: bool,
}

impl Rule {
    pub fn new(pattern: &str, replacement: &str, flags: &str) -> Result<Self> {
        // CRLF mode keeps `.` off `\r` as well as `\n`, like JavaScript.
        let mut inline = String::from("R");
        let mut global = false;
        for flag in flags.chars() {
            match flag {
                'g' => global = true,
                'i' | 'm' | 's' => inline.push(flag),
                other => {
                    return Err(Error::InvalidPattern {
                        pattern: pattern.to_string(),
                        message: format!("unsupported flag '{}'", other),
                    })
                }
            }
        }

        Ok(Self {
            regex: compile_regex(&format!("(?{}){}", inline, pattern))?,
            replacement: translate_replacement(replacement),
            global,
        })
    }

    pub fn from_spec(spec: &RuleSpec) -> Result<Self> {
        Self::new(&spec.pattern, &spec.replacement, &spec.flags)
    }

    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.global {
            self.regex.replace_all(text, self.replacement.as_str())
        } else {
            self.regex.replace(text, self.replacement.as_str())
        }
    }
}

/// Rewrites `$1`, `$&` and friends into the regex crate's `${1}` syntax, so a
/// group reference is never swallowed by the text after it.
fn translate_replacement(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('$') => {
                chars.next();
                out.push_str("$$");
            }
            Some('&') => {
                chars.next();
                out.push_str("${0}");
            }
            Some(d) if d.is_ascii_digit() => {
                let mut group = String::new();
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                    group.push(d);
                    chars.next();
                }
                out.push_str(&format!("${{{}}}", group));
            }
            _ => out.push_str("$$"),
        }
    }
    out
}

/// Rules applied one after another; each rule sees the previous one's output.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn from_specs(specs: &[RuleSpec]) -> Result<Self> {
        specs
            .iter()
            .map(Rule::from_spec)
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// The clean-up rules for built JavaScript:
    /// 1. strip multi-line comments,
    /// 2. strip empty single-line comments,
    /// 3. collapse doubled `;`,
    /// 4. pull a lone `;` up onto the preceding single-line comment,
    /// 5. collapse three or more newlines into two.
    pub fn cleanup() -> Result<Self> {
        Ok(Self::new(vec![
            Rule::new(r"/\*([\s\S]*?)\*/", "", "gim")?,
            Rule::new(r"//(\s*)\n", "", "gim")?,
            Rule::new(r";[\s]*;", ";", "gim")?,
            Rule::new(r"(//.*)\n[\s]*;", "$1", "gi")?,
            Rule::new(r"(\n){3,}", "\n\n", "gim")?,
        ]))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc).into_owned())
    }
}

#[derive(Debug, Deserialize)]
struct ReplaceTarget {
    files: OneOrMany<String>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    options: ReplaceOptions,
}

#[derive(Debug, Default, Deserialize)]
struct ReplaceOptions {
    replacements: Option<Vec<RuleSpec>>,
}

#[derive(Debug, Clone)]
pub struct ReplaceStep {
    files: FileSet,
    rules: RuleSet,
}

impl ReplaceStep {
    pub fn new(files: FileSet, rules: RuleSet) -> Self {
        Self { files, rules }
    }

    /// Without configured replacements the clean-up rules are used.
    pub fn from_target(task: &TaskRef, value: Value) -> Result<Self> {
        let target: ReplaceTarget = parse_target(task, value)?;
        let rules = match target.options.replacements {
            Some(specs) => RuleSet::from_specs(&specs)?,
            None => RuleSet::cleanup()?,
        };
        let files = FileSet::new(&target.files.into_vec(), &target.exclude)?;
        Ok(Self::new(files, rules))
    }
}

impl Step for ReplaceStep {
    fn describe(&self) -> String {
        format!(
            "apply {} replacements to {}",
            self.rules.len(),
            self.files.patterns().join(", ")
        )
    }

    fn run(&self, ctx: &StepContext<'_>) -> Result<()> {
        let files = self
            .files
            .expand_required(ctx.root(), &ctx.task().to_string())?;

        let mut changed = 0;
        for file in &files {
            let path = ctx.path(file);
            let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
            let replaced = self.rules.apply(&content);
            if replaced != content {
                fs::write(&path, replaced).map_err(|e| Error::io(&path, e))?;
                changed += 1;
            }
        }

        tracing::info!("{}: rewrote {} of {} files", ctx.task(), changed, files.len());
        Ok(())
    }
}
