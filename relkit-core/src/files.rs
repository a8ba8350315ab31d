//! Glob-based file sets relative to the project root.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use indexmap::IndexSet;
use regex::Regex;
use walkdir::WalkDir;

use crate::error::{Error, Result};

const GLOB_CHARS: &[char] = &['*', '?', '[', '{'];

/// A list of glob patterns with regex exclusions.
///
/// Patterns are relative to the project root and use `/` separators; `**`
/// matches across directories. Wildcards never match a leading `.`, so
/// hidden files are only picked up when named explicitly. Exclusions are tested against the same
/// root-relative path.
#[derive(Debug, Clone)]
pub struct FileSet {
    patterns: Vec<(String, Pattern)>,
    exclude: Vec<Regex>,
}

impl FileSet {
    pub fn new<S: AsRef<str>>(patterns: &[S], exclude: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let normalized = normalize(p.as_ref());
                Pattern::new(&normalized)
                    .map(|compiled| (normalized.clone(), compiled))
                    .map_err(|e| Error::InvalidPattern {
                        pattern: p.as_ref().to_string(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let exclude = exclude
            .iter()
            .map(|e| compile_regex(e.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns, exclude })
    }

    pub fn patterns(&self) -> Vec<&str> {
        self.patterns.iter().map(|(p, _)| p.as_str()).collect()
    }

    pub fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(relative))
    }

    /// Lists matching files as root-relative paths.
    ///
    /// Results follow pattern order, sorted by name within one pattern, with
    /// duplicates removed.
    pub fn expand(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: true,
        };

        let mut matched = IndexSet::new();
        for (pattern, compiled) in &self.patterns {
            let base = root.join(literal_prefix(pattern));
            if !base.exists() {
                tracing::debug!("pattern base {} does not exist", base.display());
                continue;
            }

            for entry in WalkDir::new(&base).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| base.clone());
                    Error::io(path, e.into())
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let Ok(relative) = entry.path().strip_prefix(root) else {
                    continue;
                };
                let relative = to_slash(relative);
                if compiled.matches_with(&relative, options) && !self.is_excluded(&relative) {
                    matched.insert(PathBuf::from(relative));
                }
            }
        }

        Ok(matched.into_iter().collect())
    }

    /// Like [`FileSet::expand`], but an empty result is an error.
    pub fn expand_required(&self, root: &Path, task: &str) -> Result<Vec<PathBuf>> {
        let files = self.expand(root)?;
        if files.is_empty() {
            return Err(Error::NoInputs {
                task: task.to_string(),
                patterns: self.patterns().join(", "),
            });
        }
        Ok(files)
    }
}

pub fn compile_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn normalize(pattern: &str) -> String {
    let mut normalized = pattern.trim_start_matches("./").to_string();
    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }
    normalized
}

/// Leading path components without glob characters, e.g. `dist/edge` for
/// `dist/edge/**/*.js`.
fn literal_prefix(pattern: &str) -> PathBuf {
    let components: Vec<&str> = pattern.split('/').collect();
    let literal: Vec<&str> = components
        .iter()
        .take(components.len().saturating_sub(1))
        .take_while(|c| !c.contains(GLOB_CHARS))
        .copied()
        .collect();
    literal.iter().collect()
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_prefix_stops_at_wildcards() {
        assert_eq!(literal_prefix("dist/edge/**/*.js"), PathBuf::from("dist/edge"));
        assert_eq!(literal_prefix("*.js"), PathBuf::new());
        assert_eq!(literal_prefix("dist/can.js"), PathBuf::from("dist"));
    }

    #[test]
    fn normalize_collapses_slashes() {
        assert_eq!(normalize("./dist//edge/*.js"), "dist/edge/*.js");
    }
}
