use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("evcontract {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: evcontract");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("EVCONTRACT_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!("default_schema_dir: {}", crate::cmd::DEFAULT_SCHEMA_DIR);
    println!(
        "defaults: common={}, suffix={}",
        evcontract_schema::config::DEFAULT_COMMON_FILE,
        evcontract_schema::config::DEFAULT_SCHEMA_SUFFIX
    );

    Ok(SUCCESS)
}
