mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "evcontract",
    version,
    about = "Check event payload fixtures against their JSON Schema contracts"
)]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    format: OutputFormat,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Option<Command>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let result = cmd::run(cli.command.unwrap_or_default(), cli.format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_default_check() {
        let cli = Cli::try_parse_from(["evcontract"]).expect("bare invocation should parse");
        assert!(cli.command.is_none());
        assert!(matches!(cli.command.unwrap_or_default(), Command::Check(_)));
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parses_check_with_pairs() {
        let cli = Cli::try_parse_from([
            "evcontract",
            "check",
            "--schema-dir",
            "/tmp/schemas",
            "--pair",
            "UserCreated.v1.json=sample-user.json",
            "--pair",
            "AttendanceMarked.v1.json=sample-attendance.json",
            "--fail-on-invalid",
        ])
        .expect("check args should parse");

        match cli.command {
            Some(Command::Check(args)) => {
                assert_eq!(args.pairs.len(), 2);
                assert!(args.fail_on_invalid);
                assert_eq!(
                    args.source.schema_dir.as_deref(),
                    Some(std::path::Path::new("/tmp/schemas"))
                );
            }
            other => panic!("expected check, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_pair() {
        let err = Cli::try_parse_from(["evcontract", "check", "--pair", "no-separator"])
            .expect_err("malformed pair should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn format_is_global() {
        let cli = Cli::try_parse_from(["evcontract", "schemas", "--format", "json"])
            .expect("global format should parse after subcommand");
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Some(Command::Schemas(_))));
    }
}
