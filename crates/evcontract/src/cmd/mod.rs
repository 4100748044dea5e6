use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{Args, Subcommand};
use evcontract_schema::{RunConfig, ValidationPair};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod check;
pub mod schemas;
pub mod version;

/// Fixture directory shipped with the workspace; fixed at build time so the
/// default run does not depend on the caller's working directory.
pub const DEFAULT_SCHEMA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../schemas/events/v1");

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register schemas and validate sample payloads (default).
    Check(CheckArgs),
    /// Register schemas and list the registered identifiers.
    Schemas(SchemasArgs),
    /// Show version information.
    Version(VersionArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Check(CheckArgs::default())
    }
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Check(args) => check::run(args, format),
        Command::Schemas(args) => schemas::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Where schemas come from.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Directory holding the shared schema, versioned schemas and samples.
    ///
    /// Defaults to the workspace fixture directory, whose path is fixed when
    /// the binary is built; installed binaries should pass this explicitly.
    #[arg(long, value_name = "DIR", env = "EVCONTRACT_SCHEMA_DIR")]
    pub schema_dir: Option<PathBuf>,
    /// File name suffix of versioned schemas [default: .v1.json].
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Option<String>,
    /// File name of the shared schema [default: common.json].
    #[arg(long, value_name = "FILE")]
    pub common: Option<String>,
    /// Refuse schema and data files larger than BYTES [default: no limit].
    #[arg(long, value_name = "BYTES")]
    pub max_file_size: Option<usize>,
    /// Register at most N versioned schemas; the rest are reported as
    /// failures [default: no limit].
    #[arg(long, value_name = "N")]
    pub max_schemas: Option<usize>,
}

impl SourceArgs {
    pub fn run_config(&self) -> RunConfig {
        let dir = self
            .schema_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_DIR));
        let mut config = RunConfig::new(dir);
        if let Some(suffix) = &self.suffix {
            config.schema_suffix = suffix.clone();
        }
        if let Some(common) = &self.common {
            config.common_file = common.clone();
        }
        config.registry.max_file_size = self.max_file_size;
        config.registry.max_schemas_from_directory = self.max_schemas;
        config
    }
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Schema/data pair relative to the schema directory (repeatable).
    /// Replaces the built-in fixture list.
    #[arg(long = "pair", value_name = "SCHEMA=DATA", value_parser = parse_pair)]
    pub pairs: Vec<ValidationPair>,
    /// Exit non-zero when a validation or schema registration fails.
    #[arg(long, env = "EVCONTRACT_FAIL_ON_INVALID", value_parser = FalseyValueParser::new())]
    pub fail_on_invalid: bool,
    /// Treat `format` keywords as annotations instead of assertions.
    #[arg(long)]
    pub no_format_checks: bool,
}

impl CheckArgs {
    pub fn run_config(&self) -> RunConfig {
        let mut config = self.source.run_config();
        if !self.pairs.is_empty() {
            config.pairs = self.pairs.clone();
        }
        config.fail_on_invalid = self.fail_on_invalid;
        config.registry.validate_formats = !self.no_format_checks;
        config
    }
}

#[derive(Args, Debug, Default)]
pub struct SchemasArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

fn parse_pair(input: &str) -> Result<ValidationPair, String> {
    match input.split_once('=') {
        Some((schema, data)) if !schema.trim().is_empty() && !data.trim().is_empty() => {
            Ok(ValidationPair::new(schema.trim(), data.trim()))
        }
        _ => Err(format!("expected SCHEMA=DATA, got {input:?}")),
    }
}
