use evcontract_schema::new_registry;

use crate::cmd::CheckArgs;
use crate::exit::{schema_error, CliResult, FAILURE, SUCCESS};
use crate::output::{ConsoleSink, OutputFormat};

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.run_config();
    tracing::info!(
        schema_dir = %config.schema_dir.display(),
        pairs = config.pairs.len(),
        "starting validation run"
    );

    let mut registry = new_registry(&config);
    let mut sink = ConsoleSink::new(format);
    let summary = evcontract_schema::run(&config, &mut registry, &mut sink)
        .map_err(|err| schema_error("validation run aborted", err))?;
    sink.finish(&summary);

    if config.fail_on_invalid && summary.has_failures() {
        tracing::warn!(
            failed = summary.failed,
            schema_errors = summary.schema_errors,
            "run finished with failures"
        );
        return Ok(FAILURE);
    }

    Ok(SUCCESS)
}
