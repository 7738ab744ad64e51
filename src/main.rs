//! Binary entrypoint: read one JSON analysis request, write one JSON report.
//!
//! The request comes from `--input <file>` or stdin. On success the
//! [`AnalysisReport`](u_spc::AnalysisReport) is printed to stdout; on failure an
//! `{"error": ..., "kind": ...}` object is printed instead and the process
//! exits with status 1. Logs go to stderr (`RUST_LOG`, default `u_spc=info`).
//!
//! Usage:
//!   u-spc --input request.json --pretty
//!   cat request.json | u-spc --config thresholds.json

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use u_spc::{AnalysisRequest, Engine, EngineConfig, SpcError};

/// SPC engine - control charts, run rules and process capability
#[derive(Parser, Debug)]
#[command(name = "u-spc", version)]
#[command(about = "Statistical process control analysis of subgrouped measurements")]
struct Args {
    /// Request JSON file (reads stdin when absent)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Engine configuration JSON file (insight thresholds)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Serialize)]
struct ErrorOutput {
    error: String,
    kind: &'static str,
}

impl ErrorOutput {
    fn new(kind: &'static str, error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            kind,
        }
    }
}

impl From<SpcError> for ErrorOutput {
    fn from(e: SpcError) -> Self {
        Self::new(e.kind(), e)
    }
}

fn read_source(path: Option<&Path>) -> Result<String, ErrorOutput> {
    match path {
        Some(p) => fs::read_to_string(p)
            .map_err(|e| ErrorOutput::new("Io", format!("{}: {e}", p.display()))),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| ErrorOutput::new("Io", format!("stdin: {e}")))?;
            Ok(buf)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, ErrorOutput> {
    match path {
        Some(p) => {
            let text = read_source(Some(p))?;
            serde_json::from_str(&text)
                .map_err(|e| ErrorOutput::new("InvalidConfig", format!("{}: {e}", p.display())))
        }
        None => Ok(EngineConfig::default()),
    }
}

/// A well-formed request without a required key is a `MissingField` error,
/// matching what the engine reports for rows.
fn request_error(e: serde_json::Error) -> ErrorOutput {
    if e.is_data() && e.to_string().starts_with("missing field") {
        ErrorOutput::new("MissingField", e)
    } else {
        ErrorOutput::new("InvalidJson", e)
    }
}

fn parse_request(text: &str) -> Result<AnalysisRequest, ErrorOutput> {
    serde_json::from_str(text).map_err(request_error)
}

fn run(args: &Args) -> Result<serde_json::Value, ErrorOutput> {
    let config = load_config(args.config.as_deref())?;
    let text = read_source(args.input.as_deref())?;
    let request = parse_request(&text)?;

    let report = Engine::new(config).analyze(&request)?;
    serde_json::to_value(&report).map_err(|e| ErrorOutput::new("Serialization", e))
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    out.flush()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "u_spc=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let (written, code) = match run(&args) {
        Ok(report) => (write_json(&report, args.pretty), ExitCode::SUCCESS),
        Err(err) => {
            tracing::error!(kind = err.kind, "{}", err.error);
            (write_json(&err, args.pretty), ExitCode::FAILURE)
        }
    };

    if let Err(e) = written {
        let _ = writeln!(io::stderr(), "u-spc: write error: {e}");
        return ExitCode::FAILURE;
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_measurements_is_missing_field() {
        let err = parse_request(r#"{"chartFamily": "meanRange"}"#).unwrap_err();
        assert_eq!(err.kind, "MissingField");
        assert!(err.error.contains("measurements"), "{}", err.error);
    }

    #[test]
    fn malformed_request_is_invalid_json() {
        assert_eq!(parse_request("{not json").unwrap_err().kind, "InvalidJson");
        assert_eq!(
            parse_request(r#"{"measurements": 3}"#).unwrap_err().kind,
            "InvalidJson"
        );
    }

    #[test]
    fn well_formed_request_parses() {
        let request = parse_request(r#"{"measurements": [], "usl": 1.0}"#).unwrap();
        assert!(request.measurements.is_empty());
        assert_eq!(request.usl, Some(1.0));
    }

    #[test]
    fn spc_errors_keep_their_kind() {
        let out = ErrorOutput::from(SpcError::NoMeasurements);
        assert_eq!(out.kind, "NoMeasurements");
    }
}
