//! Error types for Utask

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Utask operations
pub type Result<T> = std::result::Result<T, UtaskError>;

/// Main error type for Utask
#[derive(Error, Debug)]
pub enum UtaskError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Variable resolution errors
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// Subtask execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Duplicate task id '{0}'")]
    DuplicateTaskId(String),

    #[error("Duplicate auto-task id '{0}'")]
    DuplicateAutoTaskId(String),

    #[error("Task at position {0} has an empty title")]
    EmptyTitle(usize),

    #[error("Failed to read config file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

/// Variable resolution errors
///
/// Resolution ambiguities (unknown markers, globs with no matches) are not
/// errors; they fall back to the unchanged string. These variants cover the
/// transform-chain pass, where an unknown operation is a real mistake.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Unknown transform '{0}'")]
    UnknownTransform(String),

    #[error("Malformed transform segment '{0}'")]
    MalformedTransform(String),

    #[error("Transform '{name}' expected {expected} argument(s), got {got}")]
    TransformArity {
        name: String,
        expected: usize,
        got: usize,
    },
}

/// Subtask execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Failed to start '{program}': {error}")]
    SpawnFailed { program: String, error: String },

    #[error("Malformed argument string: {0}")]
    InvalidArguments(String),
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for variable resolution
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
