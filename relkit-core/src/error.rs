//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("TOML parse error in {context}: {error}")]
    Toml {
        error: toml::de::Error,
        context: String,
    },

    #[error("Metadata file not found: {0}. Expected it in the project root.")]
    MetadataNotFound(PathBuf),

    #[error("Invalid metadata in {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    #[error("Invalid version '{version}' in {path}: {source}")]
    InvalidVersion {
        version: String,
        path: PathBuf,
        #[source]
        source: semver::Error,
    },

    #[error("Template error in '{template}': {message}")]
    Template { template: String, message: String },

    #[error("Task not found: {name}. Available tasks: {available}")]
    TaskNotFound { name: String, available: String },

    #[error("Target '{target}' not found for task '{kind}'. Available targets: {available}")]
    TargetNotFound {
        kind: String,
        target: String,
        available: String,
    },

    #[error("Task '{0}' is not a supported task kind")]
    UnsupportedTask(String),

    #[error("Circular pipeline detected: {0}")]
    CircularPipeline(String),

    #[error("Invalid configuration for {task}: {message}")]
    InvalidTarget { task: String, message: String },

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("No files matched for {task}: {patterns}")]
    NoInputs { task: String, patterns: String },

    #[error("Command rejected: {0}")]
    CommandRejected(String),

    #[error("Failed to start '{program}' for {task}: {source}")]
    Spawn {
        task: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed for {task} ({status}): {command}{detail}")]
    CommandFailed {
        task: String,
        command: String,
        status: String,
        detail: String,
    },

    #[error("Task '{task}' failed: {source}")]
    Step {
        task: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Interrupted before {0}")]
    Interrupted(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Exit code of the failing command, when the error (or the step error it
    /// wraps) came from a process that exited with one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Error::CommandFailed { status, .. } => status
                .strip_prefix("exit code ")
                .and_then(|code| code.parse().ok()),
            Error::Step { source, .. } => source.exit_code(),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::Toml {
            error,
            context: "relkit.toml".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
