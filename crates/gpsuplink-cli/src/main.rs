use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use gpsuplink_core::{Inspection, TRACKER_FPORT, UplinkInput, UplinkOutput, inspect_uplink};

mod logging;

const EXAMPLES: &str = "Examples:\n  gpsuplink decode uplink.json --stdout\n  gpsuplink decode --hex d0d556ec2fe3424050fc1873d79a5ec0 --stdout --pretty\n  gpsuplink decode 'captures/*.json' -o decoded.json --strict";

const PAYLOAD_HINT: &str =
    "the tracker sends 16 bytes: latitude then longitude, little-endian doubles";

#[derive(Parser, Debug)]
#[command(name = "gpsuplink")]
#[command(version)]
#[command(
    about = "Offline decoder for GPS tracker uplinks (ChirpStack decodeUplink shape).",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode one uplink into `{ "data": { "lat", "long" } }` JSON.
    #[command(after_help = EXAMPLES)]
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Path (or glob matching one file) to a .json uplink input
    #[arg(required_unless_present = "hex")]
    input: Option<PathBuf>,

    /// Raw payload as hex instead of an input file
    #[arg(long, conflicts_with = "input")]
    hex: Option<String>,

    /// Uplink fPort (defaults to the input file's, or 1 with --hex)
    #[arg(long)]
    fport: Option<u8>,

    /// Device variable, repeatable
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_variable)]
    vars: Vec<(String, String)>,

    /// Output path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    output: Option<PathBuf>,

    /// Write JSON output to stdout
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(id = "compact", long = "compact")]
    _compact: bool,

    /// Suppress the OK message and non-error logs
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if plausibility violations are present
    #[arg(long)]
    strict: bool,

    /// List plausibility violations after decoding
    #[arg(long)]
    list_violations: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode(args) => {
            logging::init(args.quiet, args.verbose);
            cmd_decode(args)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_decode(args: DecodeArgs) -> Result<(), CliError> {
    let (mut input, input_path) = match (&args.input, &args.hex) {
        (Some(path), _) => {
            let resolved = resolve_input_path(path)?;
            validate_input_file(&resolved)?;
            let input = read_uplink_input(&resolved)?;
            (input, Some(resolved))
        }
        (None, Some(raw)) => (
            UplinkInput::new(parse_hex_payload(raw)?, TRACKER_FPORT),
            None,
        ),
        (None, None) => unreachable!("clap requires an input file or --hex"),
    };

    if let Some(f_port) = args.fport {
        input.f_port = f_port;
    }
    for (key, value) in args.vars {
        input.variables.insert(key, value);
    }

    let output = if args.stdout {
        None
    } else {
        Some(args.output.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--output or --stdout".to_string()),
            )
        })?)
    };

    if let (Some(output_path), Some(input_path)) = (output.as_ref(), input_path.as_ref()) {
        ensure_distinct_paths(output_path, input_path)?;
    }

    let inspection = inspect_uplink(&input).map_err(|err| {
        CliError::new(
            format!("decoding failed: {}", err),
            Some(PAYLOAD_HINT.to_string()),
        )
    })?;
    tracing::info!(
        lat = inspection.output.data.lat,
        long = inspection.output.data.long,
        violations = inspection.violations.len(),
        "uplink decoded"
    );
    let json = serialize_output(&inspection.output, args.pretty)?;

    match output {
        None => {
            print!("{}", json);
        }
        Some(output) => {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&output, json)
                .with_context(|| format!("Failed to write output: {}", output.display()))?;
            if !args.quiet {
                eprintln!("OK: output written -> {}", output.display());
            }
        }
    }

    if args.list_violations {
        print_violations(&inspection);
    }
    if args.strict && inspection.has_violations() {
        return Err(CliError::new(
            "plausibility violations detected",
            Some("use --list-violations to inspect".to_string()),
        ));
    }
    Ok(())
}

fn ensure_distinct_paths(output_path: &Path, input_path: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input_path)
        .with_context(|| format!("Failed to resolve input path: {}", input_path.display()))?;
    let output_dir = output_path
        .parent()
        .map(|parent| {
            if parent.as_os_str().is_empty() {
                fs::canonicalize(".")
            } else {
                fs::canonicalize(parent)
            }
        })
        .transpose();
    // A missing output directory is created later and cannot alias the input.
    let Ok(Some(output_dir)) = output_dir else {
        return Ok(());
    };
    let output_target = output_dir.join(
        output_path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Invalid output path"))?,
    );
    if output_target == input_abs {
        return Err(CliError::new(
            format!(
                "output path must differ from input: {}",
                output_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn read_uplink_input(path: &Path) -> Result<UplinkInput, CliError> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    serde_json::from_str(&raw).map_err(|err| {
        CliError::new(
            format!("invalid uplink input '{}': {}", path.display(), err),
            Some(
                r#"expected {"bytes": [0-255, ...], "fPort": 1, "variables": {}}"#.to_string(),
            ),
        )
    })
}

fn parse_hex_payload(raw: &str) -> Result<Vec<u8>, CliError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && *c != ':' && *c != '-')
        .collect();
    let digits = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
        .unwrap_or(&cleaned);
    hex::decode(digits).map_err(|err| {
        CliError::new(
            format!("invalid hex payload: {}", err),
            Some("pass the payload as hex digits, e.g. d0d556ec2fe34240...".to_string()),
        )
    })
}

fn parse_variable(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    if key.is_empty() {
        return Err(format!("empty variable name in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

fn serialize_output(output: &UplinkOutput, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(output)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(output)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_violations(inspection: &Inspection) {
    eprintln!("Violations:");
    for violation in &inspection.violations {
        eprintln!(
            "  {} {}: {}",
            violation.severity, violation.id, violation.message
        );
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .json uplink input file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .json uplink input file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "json" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .json file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected a .json file".to_string()),
        ));
    }
    if matches.len() > 1 {
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>();
        message.push_str("; matches: ");
        message.push_str(&listed.join(", "));
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(
            message,
            Some("pass a single input file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
