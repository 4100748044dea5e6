use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use evcontract_schema::{ErrorDescriptor, EventSink, RunEvent, RunSummary};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per step, as the run progresses.
    #[default]
    Text,
    /// A single JSON report once the run completes.
    Json,
    /// A results table once the run completes.
    Table,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

pub const FINISHED_LINE: &str = "All validations finished.";

/// Text rendering of one event and the stream it belongs on.
pub fn render_line(event: &RunEvent) -> (Stream, String) {
    match event {
        RunEvent::Preloaded { key } => (Stream::Stdout, format!("OK preload: {key}")),
        RunEvent::Warning { message } => (Stream::Stderr, format!("Warning: {message}")),
        RunEvent::PreloadFailed { key, message } => {
            (Stream::Stderr, format!("ERR preload {key} -> {message}"))
        }
        RunEvent::SchemaRegistered { file, .. } => (Stream::Stdout, format!("OK schema: {file}")),
        RunEvent::SchemaFailed { file, message } => {
            (Stream::Stderr, format!("ERR add schema {file} -> {message}"))
        }
        RunEvent::PairSkipped {
            schema_file,
            data_file,
            ..
        } => (
            Stream::Stderr,
            format!("Warning: skipping validate: {schema_file} or {data_file} missing"),
        ),
        RunEvent::Passed { data_file, .. } => {
            (Stream::Stdout, format!("OK validate: {data_file} ✅"))
        }
        RunEvent::Failed {
            data_file, errors, ..
        } => (
            Stream::Stderr,
            format!("FAIL validate: {data_file} -> {}", errors_json(errors)),
        ),
        RunEvent::PairErrored {
            data_file, message, ..
        } => (
            Stream::Stderr,
            format!("ERR validate: {data_file} -> {message}"),
        ),
        RunEvent::Finished => (Stream::Stdout, FINISHED_LINE.to_string()),
    }
}

fn errors_json(errors: &[ErrorDescriptor]) -> String {
    serde_json::to_string(errors).unwrap_or_else(|_| "[]".to_string())
}

/// Event sink for the console. Text output is streamed; the other formats
/// are buffered until [`ConsoleSink::finish`].
pub struct ConsoleSink {
    format: OutputFormat,
    events: Vec<RunEvent>,
}

impl ConsoleSink {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            events: Vec::new(),
        }
    }

    pub fn finish(&self, summary: &RunSummary) {
        match self.format {
            OutputFormat::Text => {}
            OutputFormat::Json => {
                let report = RunReport {
                    schema_id: "https://schemas.3leaps.dev/evcontract/cli/v1/run-report.schema.json",
                    events: &self.events,
                    summary,
                };
                println!(
                    "{}",
                    serde_json::to_string(&report).unwrap_or_else(|_| "{}".to_string())
                );
            }
            OutputFormat::Table => {
                println!("{}", events_table(&self.events));
                println!(
                    "passed={} failed={} skipped={} schema_errors={}",
                    summary.passed, summary.failed, summary.skipped, summary.schema_errors
                );
                println!("{FINISHED_LINE}");
            }
        }
    }
}

impl EventSink for ConsoleSink {
    fn emit(&mut self, event: RunEvent) {
        if self.format == OutputFormat::Text {
            match render_line(&event) {
                (Stream::Stdout, line) => println!("{line}"),
                (Stream::Stderr, line) => eprintln!("{line}"),
            }
        }
        self.events.push(event);
    }
}

#[derive(Serialize)]
struct RunReport<'a> {
    schema_id: &'static str,
    events: &'a [RunEvent],
    summary: &'a RunSummary,
}

fn events_table(events: &[RunEvent]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["STEP", "TARGET", "STATUS", "DETAIL"]);

    for event in events {
        let row = match event {
            RunEvent::Preloaded { key } => ["preload", key.as_str(), "ok", ""].map(String::from),
            RunEvent::Warning { message } => {
                ["-", "", "warn", message.as_str()].map(String::from)
            }
            RunEvent::PreloadFailed { key, message } => {
                ["preload", key.as_str(), "error", message.as_str()].map(String::from)
            }
            RunEvent::SchemaRegistered {
                file,
                id,
                newly_added,
            } => [
                "schema".to_string(),
                file.clone(),
                if *newly_added { "ok" } else { "present" }.to_string(),
                id.clone(),
            ],
            RunEvent::SchemaFailed { file, message } => {
                ["schema", file.as_str(), "error", message.as_str()].map(String::from)
            }
            RunEvent::PairSkipped {
                schema_file,
                data_file,
                ..
            } => [
                "validate".to_string(),
                data_file.clone(),
                "skip".to_string(),
                format!("{schema_file} or {data_file} missing"),
            ],
            RunEvent::Passed { data_file, .. } => {
                ["validate", data_file.as_str(), "pass", ""].map(String::from)
            }
            RunEvent::Failed {
                data_file, errors, ..
            } => [
                "validate".to_string(),
                data_file.clone(),
                "fail".to_string(),
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ],
            RunEvent::PairErrored {
                data_file, message, ..
            } => ["validate", data_file.as_str(), "error", message.as_str()].map(String::from),
            RunEvent::Finished => continue,
        };
        table.add_row(row.to_vec());
    }

    table
}

#[derive(Serialize)]
struct SchemaList<'a> {
    schema_id: &'static str,
    schemas: &'a [String],
}

pub fn print_schemas(ids: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for id in ids {
                println!("{id}");
            }
        }
        OutputFormat::Json => {
            let out = SchemaList {
                schema_id: "https://schemas.3leaps.dev/evcontract/cli/v1/schema-list.schema.json",
                schemas: ids,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SCHEMA ID"]);
            for id in ids {
                table.add_row(vec![id.clone()]);
            }
            println!("{table}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn renders_reference_lines() {
        assert_eq!(
            render_line(&RunEvent::Preloaded {
                key: "common.json".to_string()
            }),
            (Stream::Stdout, "OK preload: common.json".to_string())
        );
        assert_eq!(
            render_line(&RunEvent::SchemaFailed {
                file: "Broken.v1.json".to_string(),
                message: "bad type".to_string()
            }),
            (
                Stream::Stderr,
                "ERR add schema Broken.v1.json -> bad type".to_string()
            )
        );
        assert_eq!(
            render_line(&RunEvent::Passed {
                schema_file: "UserCreated.v1.json".to_string(),
                data_file: "sample-user.json".to_string()
            }),
            (Stream::Stdout, "OK validate: sample-user.json ✅".to_string())
        );
        assert_eq!(
            render_line(&RunEvent::Finished).1,
            "All validations finished."
        );
    }

    #[test]
    fn failure_line_carries_error_descriptors() {
        let (stream, line) = render_line(&RunEvent::Failed {
            schema_file: "UserCreated.v1.json".to_string(),
            data_file: "sample-user.json".to_string(),
            errors: vec![ErrorDescriptor {
                instance_path: "/email".to_string(),
                schema_path: "/properties/email/format".to_string(),
                message: "\"x\" is not a \"email\"".to_string(),
            }],
        });

        assert_eq!(stream, Stream::Stderr);
        let (prefix, json) = line.split_once(" -> ").unwrap();
        assert_eq!(prefix, "FAIL validate: sample-user.json");
        let errors: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(errors[0]["instancePath"], "/email");
    }

    #[test]
    fn skipped_pair_is_a_warning() {
        let (stream, line) = render_line(&RunEvent::PairSkipped {
            schema_file: "A.v1.json".to_string(),
            data_file: "a.json".to_string(),
            missing: vec![PathBuf::from("/x/a.json")],
        });
        assert_eq!(stream, Stream::Stderr);
        assert_eq!(line, "Warning: skipping validate: A.v1.json or a.json missing");
    }

    #[test]
    fn sink_buffers_events() {
        let mut sink = ConsoleSink::new(OutputFormat::Json);
        sink.emit(RunEvent::Finished);
        assert_eq!(sink.events, vec![RunEvent::Finished]);
    }

    #[test]
    fn table_skips_finished_marker() {
        let table = events_table(&[
            RunEvent::Passed {
                schema_file: "A.v1.json".to_string(),
                data_file: "a.json".to_string(),
            },
            RunEvent::Finished,
        ]);
        assert_eq!(table.row_iter().count(), 1);
    }
}
