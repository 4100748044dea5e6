use std::path::{Path, PathBuf};

use crate::config::{RunConfig, ValidationPair};
use crate::error::{Result, SchemaError};
use crate::event::{EventSink, RunEvent, RunSummary};
use crate::loader::{declared_id, file_name_of, load_document, load_json, schema_id};
use crate::registry::SchemaRegistry;
use crate::validator::{validate_value, ErrorDescriptor};

/// Result of checking one (schema, data) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    /// One or both files are absent; nothing was checked.
    Skipped { missing: Vec<PathBuf> },
    Passed,
    Failed(Vec<ErrorDescriptor>),
}

/// Registry configured from `config`, resolving unknown `$ref` targets from
/// the schema directory.
pub fn new_registry(config: &RunConfig) -> SchemaRegistry {
    SchemaRegistry::with_config(config.registry).with_base_dir(&config.schema_dir)
}

/// Register the shared schema under its file name and its `$id`.
///
/// An absent file is reported as a warning. Existing entries under either
/// key are replaced. Registration errors are reported and swallowed; a
/// malformed file is returned as an error.
pub fn preload_common(
    registry: &mut SchemaRegistry,
    config: &RunConfig,
    sink: &mut dyn EventSink,
) -> Result<()> {
    let path = config.common_path();
    if !path.exists() {
        sink.emit(RunEvent::Warning {
            message: format!("{} not found at {}", config.common_file, path.display()),
        });
        return Ok(());
    }

    let key = config.common_file.as_str();
    let common = match load_json(&path, registry.config().max_file_size) {
        Ok(common) => common,
        Err(err @ SchemaError::FileTooLarge { .. }) => {
            sink.emit(RunEvent::PreloadFailed {
                key: key.to_string(),
                message: err.to_string(),
            });
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    let mut keys = vec![key];
    if let Some(id) = declared_id(&common) {
        if id != key {
            keys.push(id);
        }
    }

    for target in keys {
        match registry.replace(target, common.clone()) {
            Ok(()) => {}
            Err(SchemaError::AlreadyRegistered(id)) => {
                tracing::debug!(id = %id, "shared schema already registered");
            }
            Err(err) => {
                sink.emit(RunEvent::PreloadFailed {
                    key: target.to_string(),
                    message: err.to_string(),
                });
                return Ok(());
            }
        }
    }

    sink.emit(RunEvent::Preloaded {
        key: key.to_string(),
    });
    Ok(())
}

/// Register every versioned schema file in the schema directory.
///
/// Files are visited in name order. A schema that fails to compile, is over
/// the configured size, or falls past the configured schema count is
/// reported and does not stop the others; a file that is not valid JSON
/// aborts with an error.
pub fn register_directory(
    registry: &mut SchemaRegistry,
    config: &RunConfig,
    sink: &mut dyn EventSink,
) -> Result<()> {
    let dir = &config.schema_dir;
    let entries = std::fs::read_dir(dir)
        .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", dir.display())))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.ends_with(&config.schema_suffix) {
            files.push((file_name, entry.path()));
        }
    }
    files.sort();

    let max_schemas = registry.config().max_schemas_from_directory;
    let mut loaded = 0usize;

    for (file_name, path) in files {
        // Follows symlinks; only regular-file targets are loaded.
        let is_file = std::fs::metadata(&path)
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }

        if let Some(max) = max_schemas {
            if loaded >= max {
                sink.emit(RunEvent::SchemaFailed {
                    file: file_name,
                    message: format!("schema count exceeds configured max ({max})"),
                });
                continue;
            }
        }
        loaded += 1;

        let schema = match load_json(&path, registry.config().max_file_size) {
            Ok(schema) => schema,
            Err(err @ SchemaError::FileTooLarge { .. }) => {
                sink.emit(RunEvent::SchemaFailed {
                    file: file_name,
                    message: err.to_string(),
                });
                continue;
            }
            Err(err) => return Err(err),
        };
        let id = schema_id(&schema, &file_name);

        let event = match registry.add(&id, schema) {
            Ok(()) => RunEvent::SchemaRegistered {
                file: file_name,
                id,
                newly_added: true,
            },
            Err(SchemaError::AlreadyRegistered(_)) => {
                tracing::debug!(
                    file = %file_name,
                    id = %id,
                    "schema already registered, skipping"
                );
                RunEvent::SchemaRegistered {
                    file: file_name,
                    id,
                    newly_added: false,
                }
            }
            Err(err) => RunEvent::SchemaFailed {
                file: file_name,
                message: err.to_string(),
            },
        };
        sink.emit(event);
    }

    Ok(())
}

/// Check the document at `data_path` against the schema at `schema_path`.
///
/// The registered validator for the schema's identifier is used when there
/// is one; otherwise the schema is compiled on the spot. Missing files yield
/// [`PairOutcome::Skipped`]; malformed files are errors.
pub fn validate_pair(
    registry: &SchemaRegistry,
    schema_path: &Path,
    data_path: &Path,
) -> Result<PairOutcome> {
    let missing: Vec<PathBuf> = [schema_path, data_path]
        .into_iter()
        .filter(|path| !path.exists())
        .map(Path::to_path_buf)
        .collect();
    if !missing.is_empty() {
        return Ok(PairOutcome::Skipped { missing });
    }

    let max_size = registry.config().max_file_size;
    let schema = load_json(schema_path, max_size)?;
    let id = schema_id(&schema, &file_name_of(schema_path));

    let compiled;
    let validator = match registry.get(&id) {
        Some(validator) => validator,
        None => {
            tracing::debug!(id = %id, "schema not registered, compiling");
            compiled = registry.compile_unregistered(&schema)?;
            &compiled
        }
    };

    let data = load_document(data_path, max_size)?;
    let outcome = validate_value(validator, &data);
    if outcome.is_pass() {
        Ok(PairOutcome::Passed)
    } else {
        Ok(PairOutcome::Failed(outcome.into_errors()))
    }
}

/// Preload the shared schema and register the versioned ones.
pub fn register_all(
    registry: &mut SchemaRegistry,
    config: &RunConfig,
    sink: &mut dyn EventSink,
) -> Result<()> {
    preload_common(registry, config, sink)?;
    register_directory(registry, config, sink)
}

/// Full run: preload, register, check every configured pair in order, then
/// emit [`RunEvent::Finished`].
pub fn run(
    config: &RunConfig,
    registry: &mut SchemaRegistry,
    sink: &mut dyn EventSink,
) -> Result<RunSummary> {
    let mut tally = Tally {
        inner: sink,
        summary: RunSummary::default(),
    };

    register_all(registry, config, &mut tally)?;
    for pair in &config.pairs {
        check_pair(registry, config, pair, &mut tally)?;
    }
    tally.emit(RunEvent::Finished);

    tracing::debug!(summary = ?tally.summary, "run complete");
    Ok(tally.summary)
}

fn check_pair(
    registry: &SchemaRegistry,
    config: &RunConfig,
    pair: &ValidationPair,
    sink: &mut dyn EventSink,
) -> Result<()> {
    let schema_path = config.resolve(&pair.schema_file);
    let data_path = config.resolve(&pair.data_file);
    let schema_file = file_name_of(&schema_path);
    let data_file = file_name_of(&data_path);

    let outcome = match validate_pair(registry, &schema_path, &data_path) {
        Ok(outcome) => outcome,
        Err(err @ (SchemaError::CompileFailed { .. } | SchemaError::FileTooLarge { .. })) => {
            sink.emit(RunEvent::PairErrored {
                schema_file,
                data_file,
                message: err.to_string(),
            });
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    let event = match outcome {
        PairOutcome::Skipped { missing } => RunEvent::PairSkipped {
            schema_file,
            data_file,
            missing,
        },
        PairOutcome::Passed => RunEvent::Passed {
            schema_file,
            data_file,
        },
        PairOutcome::Failed(errors) => RunEvent::Failed {
            schema_file,
            data_file,
            errors,
        },
    };
    sink.emit(event);
    Ok(())
}

struct Tally<'a> {
    inner: &'a mut dyn EventSink,
    summary: RunSummary,
}

impl EventSink for Tally<'_> {
    fn emit(&mut self, event: RunEvent) {
        self.summary.record(&event);
        self.inner.emit(event);
    }
}
