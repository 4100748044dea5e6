use std::collections::HashMap;
use std::path::PathBuf;

use jsonschema::Validator;
use serde_json::Value;

use crate::config::RegistryConfig;
use crate::error::{Result, SchemaError};
use crate::loader::declared_id;
use crate::retriever::RegistryRetriever;

struct Entry {
    document: Value,
    validator: Validator,
}

/// Identifier-keyed registry of compiled JSON Schema validators.
///
/// Holds at most one entry per identifier. Schemas compiled through the
/// registry resolve `$ref`s against the documents already registered and,
/// when a base directory is set, against files in that directory.
pub struct SchemaRegistry {
    entries: HashMap<String, Entry>,
    base_dir: Option<PathBuf>,
    config: RegistryConfig,
}

impl SchemaRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            entries: HashMap::new(),
            base_dir: None,
            config,
        }
    }

    /// Resolve otherwise unknown `$ref` targets from files in `dir`.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    #[cfg(test)]
    pub(crate) fn add_str(&mut self, id: &str, schema_json: &str) -> Result<()> {
        let schema: Value =
            serde_json::from_str(schema_json).map_err(|err| SchemaError::MalformedSchema {
                path: PathBuf::from(id),
                reason: err.to_string(),
            })?;
        self.add(id, schema)
    }

    /// Compile and register `schema` under `id`.
    ///
    /// Fails with [`SchemaError::AlreadyRegistered`] if `id` is taken; the
    /// existing entry is left untouched.
    pub fn add(&mut self, id: &str, schema: Value) -> Result<()> {
        if self.entries.contains_key(id) {
            return Err(SchemaError::AlreadyRegistered(id.to_string()));
        }

        let validator = self
            .compile(&schema)
            .map_err(|reason| SchemaError::CompileFailed {
                id: id.to_string(),
                reason,
            })?;

        tracing::debug!(id, "registered schema");
        self.entries.insert(
            id.to_string(),
            Entry {
                document: schema,
                validator,
            },
        );
        Ok(())
    }

    /// Remove any entry under `id`, then register `schema` there.
    pub fn replace(&mut self, id: &str, schema: Value) -> Result<()> {
        if self.remove(id) {
            tracing::debug!(id, "replacing registered schema");
        }
        self.add(id, schema)
    }

    /// Remove the entry under `id`. Returns whether one existed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Compiled validator registered under `id`.
    pub fn get(&self, id: &str) -> Option<&Validator> {
        self.entries.get(id).map(|entry| &entry.validator)
    }

    #[cfg(test)]
    pub(crate) fn document(&self, id: &str) -> Option<&Value> {
        self.entries.get(id).map(|entry| &entry.document)
    }

    /// Check if an identifier has a registered schema.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Compile `schema` without registering it, resolving references the
    /// same way registered schemas do.
    pub fn compile_unregistered(&self, schema: &Value) -> Result<Validator> {
        self.compile(schema)
            .map_err(|reason| SchemaError::CompileFailed {
                id: declared_id(schema).unwrap_or("<anonymous>").to_string(),
                reason,
            })
    }

    fn compile(&self, schema: &Value) -> std::result::Result<Validator, String> {
        jsonschema::options()
            .should_validate_formats(self.config.validate_formats)
            .with_retriever(self.retriever())
            .build(schema)
            .map_err(|err| err.to_string())
    }

    fn retriever(&self) -> RegistryRetriever {
        let mut documents = HashMap::with_capacity(self.entries.len() * 2);
        for (id, entry) in &self.entries {
            documents.insert(id.clone(), entry.document.clone());
            if let Some(declared) = declared_id(&entry.document) {
                documents
                    .entry(declared.to_string())
                    .or_insert_with(|| entry.document.clone());
            }
        }
        RegistryRetriever::new(documents, self.base_dir.clone(), self.config.max_file_size)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testutil::{make_temp_dir, write_file};
    use crate::validator::validate_value;

    const OBJECT_SCHEMA: &str = r#"{
        "type": "object",
        "properties": {
            "id": { "type": "string" },
            "email": { "type": "string", "format": "email" }
        },
        "required": ["id", "email"]
    }"#;

    #[test]
    fn add_and_validate() {
        let mut registry = SchemaRegistry::new();
        registry.add_str("UserCreated.v1.json", OBJECT_SCHEMA).unwrap();

        let validator = registry.get("UserCreated.v1.json").unwrap();
        assert!(validate_value(validator, &json!({"id": "u1", "email": "a@b.com"})).is_pass());
        assert!(!validate_value(validator, &json!({"id": "u1"})).is_pass());
    }

    #[test]
    fn duplicate_add_is_typed_and_keeps_one_entry() {
        let mut registry = SchemaRegistry::new();
        registry.add_str("dup", OBJECT_SCHEMA).unwrap();

        let second = registry.add("dup", json!({"type": "string"}));
        assert!(matches!(second, Err(SchemaError::AlreadyRegistered(ref id)) if id == "dup"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.document("dup").unwrap()["type"], "object");
    }

    #[test]
    fn replace_swaps_existing_entry() {
        let mut registry = SchemaRegistry::new();
        registry.add("key", json!({"type": "integer"})).unwrap();
        registry.replace("key", json!({"type": "string"})).unwrap();

        assert_eq!(registry.len(), 1);
        let validator = registry.get("key").unwrap();
        assert!(validate_value(validator, &json!("text")).is_pass());
        assert!(!validate_value(validator, &json!(1)).is_pass());
    }

    #[test]
    fn remove_reports_presence() {
        let mut registry = SchemaRegistry::new();
        assert!(!registry.remove("absent"));
        registry.add("present", json!({})).unwrap();
        assert!(registry.remove("present"));
        assert!(registry.is_empty());
    }

    #[test]
    fn invalid_schema_fails_compile() {
        let mut registry = SchemaRegistry::new();
        let result = registry.add_str("bad", r#"{"type":"definitely-not-a-type"}"#);

        assert!(matches!(result, Err(SchemaError::CompileFailed { .. })));
        assert!(!registry.contains("bad"));
    }

    #[test]
    fn format_assertions_follow_config() {
        let instance = json!({"id": "u1", "email": "not-an-email"});

        let mut strict = SchemaRegistry::new();
        strict.add_str("user", OBJECT_SCHEMA).unwrap();
        let outcome = validate_value(strict.get("user").unwrap(), &instance);
        assert_eq!(outcome.errors().len(), 1);
        assert_eq!(outcome.errors()[0].instance_path, "/email");
        assert!(outcome.errors()[0].message.contains("email"));

        let mut lenient = SchemaRegistry::with_config(RegistryConfig {
            validate_formats: false,
            ..RegistryConfig::default()
        });
        lenient.add_str("user", OBJECT_SCHEMA).unwrap();
        assert!(validate_value(lenient.get("user").unwrap(), &instance).is_pass());
    }

    #[test]
    fn refs_resolve_against_registered_common_schema() {
        let mut registry = SchemaRegistry::new();
        registry
            .add(
                "common.json",
                json!({
                    "$defs": {
                        "nonEmpty": { "type": "string", "minLength": 1 }
                    }
                }),
            )
            .unwrap();
        registry
            .add(
                "Ping.v1.json",
                json!({
                    "type": "object",
                    "properties": { "id": { "$ref": "common.json#/$defs/nonEmpty" } },
                    "required": ["id"]
                }),
            )
            .unwrap();

        let validator = registry.get("Ping.v1.json").unwrap();
        assert!(validate_value(validator, &json!({"id": "x"})).is_pass());
        assert!(!validate_value(validator, &json!({"id": ""})).is_pass());
    }

    #[test]
    fn refs_resolve_by_declared_id() {
        let mut registry = SchemaRegistry::new();
        registry
            .add(
                "common.json",
                json!({
                    "$id": "https://example.test/events/common.json",
                    "$defs": { "count": { "type": "integer" } }
                }),
            )
            .unwrap();

        let validator = registry
            .compile_unregistered(&json!({
                "$ref": "https://example.test/events/common.json#/$defs/count"
            }))
            .unwrap();
        assert!(validate_value(&validator, &json!(4)).is_pass());
        assert!(!validate_value(&validator, &json!("4")).is_pass());
    }

    #[test]
    fn refs_fall_back_to_base_dir() {
        let dir = make_temp_dir("registry-base-dir");
        write_file(&dir, "shared.json", r#"{"$defs":{"flag":{"type":"boolean"}}}"#);

        let registry = SchemaRegistry::new().with_base_dir(&dir);
        let validator = registry
            .compile_unregistered(&json!({"$ref": "shared.json#/$defs/flag"}))
            .unwrap();
        assert!(validate_value(&validator, &json!(true)).is_pass());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unresolvable_ref_fails_compile() {
        let registry = SchemaRegistry::new();
        let result = registry.compile_unregistered(&json!({"$ref": "missing.json#/x"}));
        assert!(matches!(result, Err(SchemaError::CompileFailed { .. })));
    }

    #[test]
    fn ids_are_sorted() {
        let mut registry = SchemaRegistry::new();
        registry.add("b", json!({})).unwrap();
        registry.add("a", json!({})).unwrap();
        assert_eq!(registry.ids(), vec!["a".to_string(), "b".to_string()]);
    }
}
