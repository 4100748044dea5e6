use std::path::PathBuf;

use serde::Serialize;

use crate::validator::ErrorDescriptor;

/// One observable step of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    /// The shared schema was (re)registered under `key`.
    Preloaded { key: String },
    /// A soft condition, e.g. the shared schema file is absent.
    Warning { message: String },
    /// Registering the shared schema failed for a reason other than a
    /// duplicate identifier.
    PreloadFailed { key: String, message: String },
    /// A versioned schema file is available under `id`. `newly_added` is
    /// false when the identifier was already registered.
    SchemaRegistered {
        file: String,
        id: String,
        newly_added: bool,
    },
    SchemaFailed { file: String, message: String },
    /// A pair was not checked because one of its files is absent.
    PairSkipped {
        schema_file: String,
        data_file: String,
        missing: Vec<PathBuf>,
    },
    Passed { schema_file: String, data_file: String },
    Failed {
        schema_file: String,
        data_file: String,
        errors: Vec<ErrorDescriptor>,
    },
    /// The pair's schema was not registered and could not be compiled.
    PairErrored {
        schema_file: String,
        data_file: String,
        message: String,
    },
    Finished,
}

/// Receives run events as they happen.
pub trait EventSink {
    fn emit(&mut self, event: RunEvent);
}

impl EventSink for Vec<RunEvent> {
    fn emit(&mut self, event: RunEvent) {
        self.push(event);
    }
}

/// Counts derived from a run's events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub preloaded: usize,
    pub warnings: usize,
    pub schemas_registered: usize,
    pub schema_errors: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn record(&mut self, event: &RunEvent) {
        match event {
            RunEvent::Preloaded { .. } => self.preloaded += 1,
            RunEvent::Warning { .. } => self.warnings += 1,
            RunEvent::PreloadFailed { .. } | RunEvent::SchemaFailed { .. } => {
                self.schema_errors += 1
            }
            RunEvent::SchemaRegistered { .. } => self.schemas_registered += 1,
            RunEvent::PairSkipped { .. } => self.skipped += 1,
            RunEvent::Passed { .. } => self.passed += 1,
            RunEvent::Failed { .. } | RunEvent::PairErrored { .. } => self.failed += 1,
            RunEvent::Finished => {}
        }
    }

    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a RunEvent>) -> Self {
        let mut summary = Self::default();
        for event in events {
            summary.record(event);
        }
        summary
    }

    /// True when any validation or schema registration failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.schema_errors > 0
    }
}
