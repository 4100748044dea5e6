//! JSON Schema registry and fixture validation for event contracts.
//!
//! Load a shared schema and a directory of versioned event schemas into an
//! explicit [`SchemaRegistry`], then check sample payloads against them and
//! report every violation.
//!
//! Soft conditions (absent fixtures, duplicate identifiers, schemas that do
//! not compile) surface as [`RunEvent`]s; malformed JSON inputs are errors.

pub mod config;
pub mod error;
pub mod event;
pub mod loader;
pub mod registry;
mod retriever;
pub mod runner;
pub mod validator;

#[cfg(test)]
mod testutil;

pub use config::{RegistryConfig, RunConfig, ValidationPair};
pub use error::{Result, SchemaError};
pub use event::{EventSink, RunEvent, RunSummary};
pub use registry::SchemaRegistry;
pub use runner::{
    new_registry, preload_common, register_all, register_directory, run, validate_pair,
    PairOutcome,
};
pub use validator::{validate_value, ErrorDescriptor, ValidationOutcome};
