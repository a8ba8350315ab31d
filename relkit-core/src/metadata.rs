//! Project metadata (`package.json`) and builder manifest (`builder.json`) loading.

use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RepositoryValue {
    Url(String),
    Detailed { url: String },
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    name: Option<String>,
    version: Option<String>,
    repository: Option<RepositoryValue>,
}

/// Project metadata read once from `package.json`.
///
/// The typed fields are the ones the release pipeline depends on. The full
/// document stays available through [`ProjectInfo::raw`] so templates can
/// reach any other field.
#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub name: String,
    pub version: Version,
    pub repository_url: String,
    raw: Value,
}

impl ProjectInfo {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = read_json(path)?;
        Self::from_value(path, raw)
    }

    /// Validates an already parsed metadata document.
    ///
    /// # Errors
    ///
    /// Returns an error if `name`, `version` or `repository.url` is missing,
    /// or if `version` is not a semantic version.
    pub fn from_value(path: &Path, raw: Value) -> Result<Self> {
        let parsed: RawInfo = serde_json::from_value(raw.clone()).map_err(|e| Error::Metadata {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let missing = |field: &str| Error::Metadata {
            path: path.to_path_buf(),
            message: format!("missing required field '{}'", field),
        };

        let name = parsed.name.ok_or_else(|| missing("name"))?;
        let version_str = parsed.version.ok_or_else(|| missing("version"))?;
        let repository_url = match parsed.repository {
            Some(RepositoryValue::Url(url)) | Some(RepositoryValue::Detailed { url }) => url,
            None => return Err(missing("repository.url")),
        };

        let version = Version::parse(&version_str).map_err(|source| Error::InvalidVersion {
            version: version_str.clone(),
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            name,
            version,
            repository_url,
            raw,
        })
    }

    /// The complete `package.json` document, with `repository` normalized to
    /// the `{ "url": ... }` form.
    pub fn raw(&self) -> Value {
        let mut raw = self.raw.clone();
        if let Value::Object(map) = &mut raw {
            if !matches!(map.get("repository"), Some(Value::Object(_))) {
                map.insert(
                    "repository".to_string(),
                    serde_json::json!({ "url": self.repository_url }),
                );
            }
        }
        raw
    }
}

/// Everything read from disk before the pipeline starts.
#[derive(Debug, Clone)]
pub struct ProjectMetadata {
    pub info: ProjectInfo,
    pub builder: Value,
}

impl ProjectMetadata {
    /// Loads `info` and the optional builder manifest relative to `root`.
    pub fn load(root: &Path, info: &str, builder: Option<&str>) -> Result<Self> {
        let info = ProjectInfo::load(&root.join(info))?;
        let builder = match builder {
            Some(path) => read_json(&root.join(path))?,
            None => Value::Object(Default::default()),
        };
        Ok(Self { info, builder })
    }
}

/// Reads and parses a JSON file, reporting a missing file distinctly.
pub fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::MetadataNotFound(PathBuf::from(path))
        } else {
            Error::io(path, e)
        }
    })?;
    serde_json::from_str(&content).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}
