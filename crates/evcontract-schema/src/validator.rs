use std::fmt;

use jsonschema::Validator;
use serde::Serialize;
use serde_json::Value;

/// One schema violation found in a data document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDescriptor {
    /// JSON Pointer to the failing location in the data ("" is the root).
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that failed.
    pub schema_path: String,
    pub message: String,
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Result of checking one document: passes iff there are no errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    errors: Vec<ErrorDescriptor>,
}

impl ValidationOutcome {
    pub fn is_pass(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ErrorDescriptor] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ErrorDescriptor> {
        self.errors
    }
}

/// Run `validator` against `instance`, collecting every error in the order
/// the engine reports them.
pub fn validate_value(validator: &Validator, instance: &Value) -> ValidationOutcome {
    let errors = validator
        .iter_errors(instance)
        .map(|err| ErrorDescriptor {
            instance_path: err.instance_path().to_string(),
            schema_path: err.schema_path().to_string(),
            message: err.to_string(),
        })
        .collect();

    ValidationOutcome { errors }
}
