use std::collections::HashMap;
use std::path::PathBuf;

use jsonschema::{Retrieve, Uri};
use serde_json::Value;

use crate::loader::load_json;

/// Resolves cross-schema `$ref`s from registered documents, falling back to
/// same-named files in the schema directory. Never touches the network.
pub(crate) struct RegistryRetriever {
    documents: HashMap<String, Value>,
    base_dir: Option<PathBuf>,
    max_file_size: Option<usize>,
}

impl RegistryRetriever {
    pub(crate) fn new(
        documents: HashMap<String, Value>,
        base_dir: Option<PathBuf>,
        max_file_size: Option<usize>,
    ) -> Self {
        Self {
            documents,
            base_dir,
            max_file_size,
        }
    }

    fn lookup(&self, uri: &str, path: &str) -> Result<Value, String> {
        if let Some(value) = self.documents.get(uri) {
            return Ok(value.clone());
        }

        let file_name = path.rsplit('/').next().unwrap_or(path);
        if file_name.is_empty() {
            return Err(format!("unresolvable schema reference: {uri}"));
        }

        if let Some(value) = self.documents.get(file_name) {
            return Ok(value.clone());
        }

        if let Some(dir) = &self.base_dir {
            let candidate = dir.join(file_name);
            if candidate.is_file() {
                tracing::debug!(uri, path = %candidate.display(), "resolving reference from disk");
                return load_json(&candidate, self.max_file_size).map_err(|err| err.to_string());
            }
        }

        Err(format!("unresolvable schema reference: {uri}"))
    }
}

impl Retrieve for RegistryRetriever {
    fn retrieve(
        &self,
        uri: &Uri<String>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        self.lookup(uri.as_str(), uri.path().as_str())
            .map_err(|message| message.into())
    }
}
