use evcontract_schema::{new_registry, register_all, RunEvent};

use crate::cmd::SchemasArgs;
use crate::exit::{schema_error, CliResult, SUCCESS};
use crate::output::{print_schemas, OutputFormat};

pub fn run(args: SchemasArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.source.run_config();
    let mut registry = new_registry(&config);
    let mut events: Vec<RunEvent> = Vec::new();

    register_all(&mut registry, &config, &mut events)
        .map_err(|err| schema_error("schema registration aborted", err))?;

    for event in &events {
        match event {
            RunEvent::Warning { message } => tracing::warn!("{message}"),
            RunEvent::PreloadFailed { key, message } => {
                tracing::warn!(key = %key, error = %message, "shared schema not registered")
            }
            RunEvent::SchemaFailed { file, message } => {
                tracing::warn!(file = %file, error = %message, "schema not registered")
            }
            _ => {}
        }
    }

    print_schemas(&registry.ids(), format);
    Ok(SUCCESS)
}
