use std::path::{Path, PathBuf};

/// Default file name of the shared schema referenced by the others.
pub const DEFAULT_COMMON_FILE: &str = "common.json";

/// Default suffix identifying versioned schema files.
pub const DEFAULT_SCHEMA_SUFFIX: &str = ".v1.json";

/// Fixture pairs checked when no explicit list is configured.
pub const DEFAULT_PAIRS: [(&str, &str); 3] = [
    ("UserCreated.v1.json", "sample-user.json"),
    ("EnrollmentConfirmed.v1.json", "sample-enrollment.json"),
    ("AttendanceMarked.v1.json", "sample-attendance.json"),
];

/// Controls schema compilation and directory loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, `format` keywords are asserted instead of annotated.
    pub validate_formats: bool,
    /// Maximum number of schemas registered from a directory. Files past
    /// the limit are reported individually. `None` means unlimited.
    pub max_schemas_from_directory: Option<usize>,
    /// Maximum bytes allowed per JSON file (schema or data). `None` means
    /// unlimited.
    pub max_file_size: Option<usize>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            validate_formats: true,
            max_schemas_from_directory: None,
            max_file_size: None,
        }
    }
}

/// A schema file and the data file checked against it, both relative to
/// the schema directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPair {
    pub schema_file: String,
    pub data_file: String,
}

impl ValidationPair {
    pub fn new(schema_file: impl Into<String>, data_file: impl Into<String>) -> Self {
        Self {
            schema_file: schema_file.into(),
            data_file: data_file.into(),
        }
    }
}

/// Everything a single run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub schema_dir: PathBuf,
    pub common_file: String,
    pub schema_suffix: String,
    pub pairs: Vec<ValidationPair>,
    /// Whether failed validations should turn into a failing process outcome.
    pub fail_on_invalid: bool,
    pub registry: RegistryConfig,
}

impl RunConfig {
    /// Config with the default fixture list rooted at `schema_dir`.
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: schema_dir.into(),
            common_file: DEFAULT_COMMON_FILE.to_string(),
            schema_suffix: DEFAULT_SCHEMA_SUFFIX.to_string(),
            pairs: default_pairs(),
            fail_on_invalid: false,
            registry: RegistryConfig::default(),
        }
    }

    pub fn common_path(&self) -> PathBuf {
        self.schema_dir.join(&self.common_file)
    }

    pub fn resolve(&self, file: &str) -> PathBuf {
        resolve_in(&self.schema_dir, file)
    }
}

pub fn default_pairs() -> Vec<ValidationPair> {
    DEFAULT_PAIRS
        .iter()
        .map(|(schema, data)| ValidationPair::new(*schema, *data))
        .collect()
}

fn resolve_in(dir: &Path, file: &str) -> PathBuf {
    let candidate = Path::new(file);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        dir.join(candidate)
    }
}
