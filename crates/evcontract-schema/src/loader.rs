use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{Result, SchemaError};

/// Load and parse a schema file.
///
/// Missing, unreadable and syntactically invalid files fail with
/// [`SchemaError::MalformedSchema`]. A file over `max_size` fails with
/// [`SchemaError::FileTooLarge`].
pub fn load_json(path: &Path, max_size: Option<usize>) -> Result<Value> {
    read_value(path, max_size).map_err(|failure| {
        failure.into_error(path, |path, reason| SchemaError::MalformedSchema { path, reason })
    })
}

/// Load and parse a data document; same rules as [`load_json`] but fails
/// with [`SchemaError::MalformedDocument`].
pub fn load_document(path: &Path, max_size: Option<usize>) -> Result<Value> {
    read_value(path, max_size).map_err(|failure| {
        failure.into_error(path, |path, reason| SchemaError::MalformedDocument { path, reason })
    })
}

/// Identifier a schema is registered under: its `$id`, else `file_name`.
pub fn schema_id(schema: &Value, file_name: &str) -> String {
    declared_id(schema)
        .map(str::to_string)
        .unwrap_or_else(|| file_name.to_string())
}

/// The schema's own `$id`, when it declares a string one.
pub fn declared_id(schema: &Value) -> Option<&str> {
    schema
        .get("$id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

enum ReadFailure {
    Malformed(String),
    TooLarge { size: u64, max: usize },
}

impl ReadFailure {
    fn into_error(
        self,
        path: &Path,
        malformed: impl FnOnce(PathBuf, String) -> SchemaError,
    ) -> SchemaError {
        match self {
            ReadFailure::Malformed(reason) => malformed(path.to_path_buf(), reason),
            ReadFailure::TooLarge { size, max } => SchemaError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                max,
            },
        }
    }
}

fn malformed(err: impl std::fmt::Display) -> ReadFailure {
    ReadFailure::Malformed(err.to_string())
}

fn read_value(path: &Path, max_size: Option<usize>) -> std::result::Result<Value, ReadFailure> {
    let content = match max_size {
        None => std::fs::read_to_string(path).map_err(malformed)?,
        Some(max) => {
            let file = std::fs::File::open(path).map_err(malformed)?;
            let size = file.metadata().map_err(malformed)?.len();
            if size > max as u64 {
                return Err(ReadFailure::TooLarge { size, max });
            }

            let read_limit = u64::try_from(max.saturating_add(1)).unwrap_or(u64::MAX);
            let mut content = String::new();
            file.take(read_limit)
                .read_to_string(&mut content)
                .map_err(malformed)?;
            if content.len() > max {
                return Err(ReadFailure::TooLarge {
                    size: content.len() as u64,
                    max,
                });
            }
            content
        }
    };

    serde_json::from_str(&content).map_err(malformed)
}
