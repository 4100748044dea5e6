use std::path::PathBuf;

/// Errors that can occur while loading, registering or validating schemas.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A schema file is missing, unreadable, oversized or not valid JSON.
    #[error("malformed schema {}: {reason}", .path.display())]
    MalformedSchema { path: PathBuf, reason: String },

    /// A data file is unreadable, oversized or not valid JSON.
    #[error("malformed document {}: {reason}", .path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    /// A file exceeds the configured size limit. Not a malformed input: the
    /// run reports it against the affected schema or pair and continues.
    #[error("file too large {} ({size} bytes, max {max})", .path.display())]
    FileTooLarge { path: PathBuf, size: u64, max: usize },

    /// The schema directory could not be enumerated.
    #[error("failed to load schemas: {0}")]
    LoadFailed(String),

    /// The schema could not be compiled.
    #[error("failed to compile schema {id}: {reason}")]
    CompileFailed { id: String, reason: String },

    /// An entry already exists under this identifier.
    #[error("schema with key or id \"{0}\" already exists")]
    AlreadyRegistered(String),
}

impl SchemaError {
    /// True for errors that indicate a broken input file rather than a
    /// registration problem.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            SchemaError::MalformedSchema { .. } | SchemaError::MalformedDocument { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
