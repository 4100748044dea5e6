//! Check event payload fixtures against their JSON Schema contracts.
//!
//! The `evcontract` binary preloads a shared schema, registers every
//! versioned schema in a directory and validates a list of sample payloads.
//! The library side is [`schema`], re-exported from `evcontract-schema`.

/// Re-export schema registry and run types.
pub mod schema {
    pub use evcontract_schema::*;
}
