use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use geigerlink_core::export::{gmcmap_log_url, safecast_measurements};
use geigerlink_core::{
    DEFAULT_CLUSTER, UplinkReport, decode_payload, storage_download_window, ttn_storage_url,
};
use glob::glob;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

mod config;

use config::SiteConfig;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GEIGERLINK_BUILD_COMMIT"),
    " ",
    env!("GEIGERLINK_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "geigerlink")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for LoRaWAN Geiger counter uplinks (CPM, µSv/h, mode).",
    long_about = None,
    after_help = "Examples:\n  geigerlink decode 100000000100\n  geigerlink uplinks storage.jsonl -o report.json\n  geigerlink export storage.jsonl --config site.toml --target safecast\n  geigerlink storage-url --app geiger-app --device geiger-1 --since report.json"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a single 6-byte payload given as hex.
    Decode {
        /// Payload bytes as hex (e.g. "10 00 00 00 01 00" or 0x100000000100)
        payload: String,

        /// LoRaWAN FPort the payload arrived on
        #[arg(long, default_value_t = 1)]
        port: u8,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Decode a TTN Storage Integration export (JSON lines) into a report.
    #[command(alias = "uplink")]
    Uplinks {
        /// Path to a .json/.jsonl export (a glob matching one file is accepted)
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Build Safecast measurements or the GMC Map log URL from an export.
    Export {
        /// Path to a .json/.jsonl export (a glob matching one file is accepted)
        input: PathBuf,

        /// Site configuration (TOML)
        #[arg(long)]
        config: PathBuf,

        /// Destination service
        #[arg(long, value_enum)]
        target: ExportTarget,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the TTN Storage Integration URL for the next download.
    StorageUrl {
        /// TTN application ID
        #[arg(long)]
        app: String,

        /// TTN end device ID
        #[arg(long)]
        device: String,

        /// TTN cluster (e.g. nam1, eu1, au1)
        #[arg(long, default_value = DEFAULT_CLUSTER)]
        cluster: String,

        /// Previous uplink report; the download resumes after its latest uplink
        #[arg(long)]
        since: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExportTarget {
    Safecast,
    Gmcmap,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let quiet = matches!(cli.command, Commands::Uplinks { quiet: true, .. });
    init_tracing(cli.verbose, quiet);

    let result = match cli.command {
        Commands::Decode {
            payload,
            port,
            pretty,
        } => cmd_decode(&payload, port, pretty),
        Commands::Uplinks {
            input,
            report,
            stdout,
            pretty,
            compact,
            quiet,
        } => cmd_uplinks(input, report, stdout, pretty, compact, quiet),
        Commands::Export {
            input,
            config,
            target,
            pretty,
        } => cmd_export(input, &config, target, pretty),
        Commands::StorageUrl {
            app,
            device,
            cluster,
            since,
        } => cmd_storage_url(&app, &device, &cluster, since.as_deref()),
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

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
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

fn cmd_decode(payload: &str, port: u8, pretty: bool) -> Result<(), CliError> {
    let bytes = parse_hex_payload(payload)?;
    let reading = decode_payload(&bytes, port).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some(format!(
                "a payload is {} bytes: CPM, dose rate, mode (little-endian u16 each)",
                geigerlink_core::PAYLOAD_LEN
            )),
        )
    })?;
    println!("{}", to_json(&reading, pretty)?);
    Ok(())
}

fn cmd_uplinks(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
) -> Result<(), CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    let report = if stdout {
        None
    } else {
        Some(report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };
    if let Some(report_path) = report.as_ref() {
        ensure_distinct_output(report_path, &input_abs)?;
    }

    let rep = analyze(&resolved_input)?;
    let json = to_json(&rep, pretty)?;

    let Some(report) = report else {
        print!("{}", json);
        return Ok(());
    };
    if let Some(parent) = report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;

    if !quiet {
        eprintln!(
            "OK: {} records ({} skipped) -> {}",
            rep.records.len(),
            rep.skipped,
            report.display()
        );
    }
    Ok(())
}

fn cmd_export(
    input: PathBuf,
    config_path: &Path,
    target: ExportTarget,
    pretty: bool,
) -> Result<(), CliError> {
    let config = SiteConfig::load(config_path).map_err(|err| {
        CliError::new(
            format!("{:#}", err),
            Some("expected [safecast] and/or [gmcmap] tables".to_string()),
        )
    })?;
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let rep = analyze(&resolved_input)?;

    match target {
        ExportTarget::Safecast => {
            let site = config.safecast.ok_or_else(|| {
                CliError::new(
                    "missing [safecast] section in config",
                    Some("add latitude, longitude, device_id and location_name".to_string()),
                )
            })?;
            let measurements: Vec<_> = rep
                .records
                .iter()
                .flat_map(|record| safecast_measurements(record, &site))
                .collect();
            tracing::info!(count = measurements.len(), "built Safecast measurements");
            println!("{}", to_json(&measurements, pretty)?);
        }
        ExportTarget::Gmcmap => {
            let account = config.gmcmap.ok_or_else(|| {
                CliError::new(
                    "missing [gmcmap] section in config",
                    Some("add account_id and geiger_counter_id".to_string()),
                )
            })?;
            let url = rep
                .latest_complete()
                .and_then(|record| gmcmap_log_url(&account, &record.reading))
                .ok_or_else(|| {
                    CliError::new(
                        "no uplink carries both CPM and dose rate",
                        Some("GMC Map needs a complete reading".to_string()),
                    )
                })?;
            println!("{}", url);
        }
    }
    Ok(())
}

fn cmd_storage_url(
    app: &str,
    device: &str,
    cluster: &str,
    since: Option<&Path>,
) -> Result<(), CliError> {
    let latest = match since {
        Some(path) => read_previous_report(path)?.latest_received_at,
        None => None,
    };
    let window = storage_download_window(latest, OffsetDateTime::now_utc());
    tracing::debug!(seconds = window.whole_seconds(), "storage download window");
    println!("{}", ttn_storage_url(cluster, app, device, window));
    Ok(())
}

fn read_previous_report(path: &Path) -> Result<UplinkReport, CliError> {
    let json = fs::read_to_string(path).map_err(|err| {
        CliError::new(
            format!("cannot read report {}: {}", path.display(), err),
            Some("pass a report written by `geigerlink uplinks`".to_string()),
        )
    })?;
    serde_json::from_str(&json).map_err(|err| {
        CliError::new(
            format!("invalid report {}: {}", path.display(), err),
            Some("pass a report written by `geigerlink uplinks`".to_string()),
        )
    })
}

fn analyze(input: &Path) -> Result<UplinkReport, CliError> {
    geigerlink_core::analyze_uplink_file(input)
        .context("uplink export analysis failed")
        .map_err(Into::into)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("JSON serialization failed").map_err(Into::into)
}

fn parse_hex_payload(payload: &str) -> Result<Vec<u8>, CliError> {
    let joined: String = payload.split_whitespace().collect();
    let digits = joined
        .strip_prefix("0x")
        .or_else(|| joined.strip_prefix("0X"))
        .unwrap_or(&joined);
    hex::decode(digits).map_err(|err| {
        CliError::new(
            format!("invalid hex payload '{}': {}", payload, err),
            Some("pass bytes as hex digits, e.g. 100000000100".to_string()),
        )
    })
}

fn ensure_distinct_output(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let report_dir = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::canonicalize(parent),
        _ => fs::canonicalize("."),
    };
    // a missing output directory cannot contain the input
    let Ok(report_dir) = report_dir else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| CliError::new("invalid report path", None))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .json or .jsonl storage export".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .json or .jsonl storage export".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "json" && ext != "jsonl" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .json or .jsonl file".to_string()),
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

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let more = if count > 3 { ", ..." } else { "" };
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{}' ({} matches); matches: {}{}",
                    pattern, count, listed, more
                ),
                Some("pass a single export file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
