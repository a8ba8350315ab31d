//! `<%= path %>` interpolation against project metadata and configuration.

use chrono::{DateTime, Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::metadata::ProjectMetadata;

/// How many levels of templates-inside-templates are followed before giving up.
pub const MAX_TEMPLATE_DEPTH: usize = 16;

/// Any `<% ... %>` span. Only the `<%=` form with a dotted path is accepted;
/// everything else is rejected rather than passed through.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<%(=?)\s*(.*?)\s*%>").expect("placeholder pattern is valid"));

static DOTTED_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-]+(?:\.[A-Za-z0-9_\-]+)*$").expect("path pattern is valid")
});

/// Values templates can refer to.
///
/// The root is a JSON object with one entry per configuration table plus
/// `info` (`package.json`), `builder` (`builder.json`) and `now`.
#[derive(Debug, Clone)]
pub struct TemplateContext {
    root: Value,
}

impl TemplateContext {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Builds the context used for a run.
    ///
    /// Metadata entries are inserted last so configuration tables can never
    /// shadow `info`, `builder` or `now`.
    pub fn for_project(config: &Value, metadata: &ProjectMetadata, now: DateTime<Utc>) -> Self {
        let mut root = match config {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        root.insert("info".to_string(), metadata.info.raw());
        root.insert("builder".to_string(), metadata.builder.clone());
        root.insert("now".to_string(), now_value(now));
        Self {
            root: Value::Object(root),
        }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Looks up a dotted path such as `info.repository.url`.
    ///
    /// Numeric segments index into arrays.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(&self.root, |value, segment| match value {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Renders a template to text.
    ///
    /// # Errors
    ///
    /// Returns an error if a placeholder does not resolve, resolves to a
    /// table or list, or nests deeper than [`MAX_TEMPLATE_DEPTH`].
    pub fn render(&self, template: &str) -> Result<String> {
        match self.resolve_str(template, 0)? {
            Value::String(s) => Ok(s),
            other => to_text(template, &other),
        }
    }

    /// Resolves every string inside a value.
    ///
    /// A string that consists of exactly one placeholder takes the type of
    /// whatever it points at, so `"<%= meta.beautifier %>"` becomes a table.
    pub fn resolve(&self, value: &Value) -> Result<Value> {
        self.resolve_at(value, 0)
    }

    fn resolve_at(&self, value: &Value, depth: usize) -> Result<Value> {
        match value {
            Value::String(s) => self.resolve_str(s, depth),
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_at(item, depth))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut resolved = Map::with_capacity(map.len());
                for (key, item) in map {
                    resolved.insert(key.clone(), self.resolve_at(item, depth)?);
                }
                Ok(Value::Object(resolved))
            }
            other => Ok(other.clone()),
        }
    }

    fn resolve_str(&self, template: &str, depth: usize) -> Result<Value> {
        if !template.contains("<%") {
            return Ok(Value::String(template.to_string()));
        }
        if depth >= MAX_TEMPLATE_DEPTH {
            return Err(Error::Template {
                template: template.to_string(),
                message: "templates nest too deeply (recursive reference?)".to_string(),
            });
        }

        if let Some(caps) = PLACEHOLDER.captures(template) {
            if caps.get(0).map(|m| m.as_str().len()) == Some(template.len()) {
                let path = placeholder_path(template, &caps)?;
                let target = self.lookup_required(template, path)?;
                return self.resolve_at(target, depth + 1);
            }
        }

        let mut out = String::with_capacity(template.len());
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(template) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push_literal(&mut out, template, &template[last..whole.start()])?;
            let path = placeholder_path(template, &caps)?;
            let target = self.lookup_required(template, path)?;
            let resolved = self.resolve_at(target, depth + 1)?;
            out.push_str(&to_text(template, &resolved)?);
            last = whole.end();
        }
        push_literal(&mut out, template, &template[last..])?;
        Ok(Value::String(out))
    }

    fn lookup_required(&self, template: &str, path: &str) -> Result<&Value> {
        match self.lookup(path) {
            Some(Value::Null) | None => Err(Error::Template {
                template: template.to_string(),
                message: format!("'{}' is not defined", path),
            }),
            Some(value) => Ok(value),
        }
    }
}

fn placeholder_path<'t>(template: &str, caps: &regex::Captures<'t>) -> Result<&'t str> {
    let (Some(marker), Some(path)) = (caps.get(1), caps.get(2)) else {
        return Err(Error::Template {
            template: template.to_string(),
            message: "malformed placeholder".to_string(),
        });
    };
    if marker.as_str().is_empty() {
        return Err(Error::Template {
            template: template.to_string(),
            message: format!("'<% {} %>' is not supported, use '<%= path %>'", path.as_str()),
        });
    }
    if !DOTTED_PATH.is_match(path.as_str()) {
        return Err(Error::Template {
            template: template.to_string(),
            message: format!("'{}' is not a dotted path", path.as_str()),
        });
    }
    Ok(path.as_str())
}

/// Text between placeholders must not open another one.
fn push_literal(out: &mut String, template: &str, literal: &str) -> Result<()> {
    if literal.contains("<%") {
        return Err(Error::Template {
            template: template.to_string(),
            message: "unterminated placeholder".to_string(),
        });
    }
    out.push_str(literal);
    Ok(())
}

fn to_text(template: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(Error::Template {
            template: template.to_string(),
            message: "a table or list cannot be embedded in text".to_string(),
        }),
    }
}

fn now_value(now: DateTime<Utc>) -> Value {
    serde_json::json!({
        "date": now.format("%Y-%m-%d").to_string(),
        "year": now.year(),
        "timestamp": now.to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> TemplateContext {
        TemplateContext::new(json!({
            "meta": { "out": "dist", "depth": 2, "nested": "<%= meta.out %>/x" },
            "list": ["a", "b"]
        }))
    }

    #[test]
    fn looks_up_array_indices() {
        assert_eq!(ctx().lookup("list.1"), Some(&json!("b")));
        assert_eq!(ctx().lookup("list.7"), None);
    }

    #[test]
    fn numbers_render_as_text() {
        assert_eq!(ctx().render("level <%= meta.depth %>").unwrap(), "level 2");
    }

    #[test]
    fn lone_placeholder_keeps_type() {
        assert_eq!(ctx().resolve(&json!("<%= meta.depth %>")).unwrap(), json!(2));
    }

    #[test]
    fn whitespace_inside_placeholder_is_optional() {
        assert_eq!(ctx().render("<%=meta.out%>/edge").unwrap(), "dist/edge");
    }

    #[test]
    fn now_has_date_parts() {
        let now = DateTime::parse_from_rfc3339("2013-05-02T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let value = now_value(now);
        assert_eq!(value["date"], "2013-05-02");
        assert_eq!(value["year"], 2013);
    }
}
