use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use lonshark_core::{AnalysisConfig, Envelope, LONTALK_PORT, LonSocket, Packet, SocketError};
use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("LONSHARK_BUILD_COMMIT"),
    " ",
    env!("LONSHARK_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "lonshark")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for LonTalk/IP (CNIP) datagrams: live capture, captures and single packets.",
    long_about = None,
    after_help = "Examples:\n  lonshark listen 192.168.1.133\n  lonshark pcap analyse capture.pcapng -o report.json\n  lonshark decode 0019010000000000000000420000000100000000000105010205"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on PCAP/PCAPNG inputs.
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
    /// Receive datagrams from a device and print one line per packet.
    Listen {
        /// Device IP address
        device: IpAddr,

        /// LonTalk/IP UDP port (local and remote)
        #[arg(long, default_value_t = LONTALK_PORT)]
        port: u16,

        /// Stop after this many datagrams
        #[arg(long)]
        count: Option<u64>,

        /// Fail when no datagram arrives within this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Decode one datagram given as hex and print its fields.
    Decode {
        /// Datagram bytes in hex (whitespace and ':' separators are ignored)
        hex: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Decode every LonTalk/IP datagram of a capture into a JSON report.
    #[command(alias = "analyze")]
    #[command(
        after_help = "Examples:\n  lonshark pcap analyse capture.pcapng -o report.json\n  lonshark pcap analyze capture.pcap --stdout --pretty"
    )]
    Analyse {
        /// Path to a .pcap or .pcapng file
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

        /// LonTalk/IP UDP port to decode
        #[arg(long, default_value_t = LONTALK_PORT)]
        port: u16,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if any datagram failed to decode
        #[arg(long)]
        strict: bool,

        /// List decode errors after analysis
        #[arg(long)]
        list_errors: bool,
    },
}

struct AnalyseArgs {
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    port: u16,
    quiet: bool,
    strict: bool,
    list_errors: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Pcap { command } => match command {
            PcapCommands::Analyse {
                input,
                report,
                stdout,
                pretty,
                compact,
                port,
                quiet,
                strict,
                list_errors,
            } => cmd_pcap_analyse(AnalyseArgs {
                input,
                report,
                stdout,
                pretty,
                compact,
                port,
                quiet,
                strict,
                list_errors,
            }),
        },
        Commands::Listen {
            device,
            port,
            count,
            timeout_ms,
        } => cmd_listen(device, port, count, timeout_ms),
        Commands::Decode { hex, json } => cmd_decode(&hex, json),
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

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
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
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_pcap_analyse(args: AnalyseArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    let report_path = if args.stdout {
        None
    } else {
        let path = args.report.clone().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        ensure_distinct_output(&path, &input_abs)?;
        Some(path)
    };

    let config = AnalysisConfig { port: args.port };
    let rep = lonshark_core::analyze_pcap_file(&resolved_input, &config)
        .context("PCAP/PCAPNG analysis failed")?;
    tracing::info!(
        packets = rep.packets.len(),
        issues = rep.issues.len(),
        "analysis complete"
    );
    let json = serialize_report(&rep, args.pretty, args.compact)?;

    match report_path {
        None => print!("{}", json),
        Some(report) => {
            if let Some(parent) = report.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&report, json)
                .with_context(|| format!("Failed to write report: {}", report.display()))?;
            if !args.quiet {
                eprintln!("OK: report written -> {}", report.display());
            }
        }
    }

    if args.list_errors && !args.quiet {
        print_issues(&rep);
    }
    if args.strict && has_decode_errors(&rep) {
        return Err(CliError::new(
            "undecodable datagrams detected",
            Some("use --list-errors to inspect".to_string()),
        ));
    }
    Ok(())
}

fn ensure_distinct_output(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let parent = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A missing output directory is created later, so it cannot hold the input.
    let Ok(report_dir) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path: {}", report_path.display()))?;
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

fn serialize_report(
    rep: &lonshark_core::Report,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    let json = if pretty {
        serde_json::to_string_pretty(rep)
    } else {
        serde_json::to_string(rep)
    };
    json.context("JSON serialization failed").map_err(Into::into)
}

fn has_decode_errors(rep: &lonshark_core::Report) -> bool {
    rep.issues.iter().any(|issue| issue.severity == "error")
}

fn print_issues(rep: &lonshark_core::Report) {
    eprintln!("Decode issues:");
    for issue in &rep.issues {
        eprintln!("  {} {} ({})", issue.severity, issue.id, issue.count);
        for example in &issue.examples {
            eprintln!("    {}", example);
        }
    }
}

fn cmd_listen(
    device: IpAddr,
    port: u16,
    count: Option<u64>,
    timeout_ms: Option<u64>,
) -> Result<(), CliError> {
    let socket = LonSocket::dial(device, port).map_err(|err| {
        CliError::new(
            format!("failed to open LonTalk/IP socket to {device}:{port}: {err}"),
            Some(format!("is another process bound to UDP port {port}?")),
        )
    })?;
    socket
        .set_read_timeout(timeout_ms.map(Duration::from_millis))
        .context("Failed to set read timeout")?;

    let mut received = 0u64;
    while count.is_none_or(|limit| received < limit) {
        match socket.recv_packet() {
            Ok(packet) => {
                received += 1;
                println!("{} {}", now_rfc3339(), packet);
            }
            Err(SocketError::Decode(err)) => {
                received += 1;
                tracing::warn!(%err, "datagram not decoded");
            }
            Err(err) if err.is_timeout() => {
                return Err(CliError::new(
                    format!("no datagram from {device} within {}ms", timeout_ms.unwrap_or(0)),
                    Some("check the device address or raise --timeout-ms".to_string()),
                ));
            }
            Err(err) => return Err(anyhow::Error::new(err).context("receive failed").into()),
        }
    }
    Ok(())
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}

#[derive(Serialize)]
struct DecodedView<'a> {
    envelope: &'a Envelope,
    source: String,
    destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pdu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    render_error: Option<String>,
    payload_len: usize,
}

fn cmd_decode(input: &str, json: bool) -> Result<(), CliError> {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    let bytes = hex::decode(&cleaned).map_err(|err| {
        CliError::new(
            format!("invalid hex input: {err}"),
            Some("pass the datagram as an even number of hex digits".to_string()),
        )
    })?;
    let packet = lonshark_core::decode(bytes).map_err(|err| {
        CliError::new(
            format!("decode failed: {err}"),
            Some("a datagram is a 20-byte CNIP envelope followed by the LON header".to_string()),
        )
    })?;

    if json {
        let view = decoded_view(&packet);
        let text = serde_json::to_string_pretty(&view).context("JSON serialization failed")?;
        println!("{}", text);
    } else {
        print_packet(&packet);
    }
    Ok(())
}

fn decoded_view(packet: &Packet) -> DecodedView<'_> {
    let (pdu, render_error) = match lonshark_core::render_pdu(packet) {
        Ok(text) => (Some(text), None),
        Err(err) => (None, Some(err.to_string())),
    };
    DecodedView {
        envelope: packet.envelope(),
        source: lonshark_core::render_source(packet),
        destination: lonshark_core::render_destination(packet),
        pdu,
        render_error,
        payload_len: packet.payload().len(),
    }
}

fn print_packet(packet: &Packet) {
    let envelope = packet.envelope();
    let header = packet.header();
    println!(
        "envelope: length={} version={} type={} ext={} flags=0x{:02x} vendor={} session={} sequence={} timestamp={}",
        envelope.length,
        envelope.version,
        envelope.message_type,
        envelope.ext_header,
        envelope.flags,
        envelope.vendor,
        envelope.session_id,
        envelope.sequence,
        envelope.timestamp
    );
    println!(
        "header: priority={} alt_path={} delta_backlog={} version={} pdu={} address={} domain={}",
        header.priority,
        header.alternate_path,
        header.delta_backlog,
        header.version,
        header.pdu_format.label(),
        header.address_format().label(),
        header.domain
    );
    println!("source: {}", lonshark_core::render_source(packet));
    println!("destination: {}", lonshark_core::render_destination(packet));
    match lonshark_core::render_pdu(packet) {
        Ok(text) => println!("pdu: {}", text),
        Err(err) => println!("pdu: <{}>", err),
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
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
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        n => {
            let listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let more = if n > 3 { ", ..." } else { "" };
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{}' ({} matches); matches: {}{}",
                    pattern, n, listed, more
                ),
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
