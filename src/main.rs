//! refscan - find serialized references to objects that no longer exist.
//!
//! Usage:
//!   refscan scan <MANIFEST>    Scan a project manifest and list findings
//!   refscan check <MANIFEST>   Exit with status 1 when findings exist
//!   refscan --help             Show help

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use refscan_core::{FailurePolicy, ScanConfig, ScanReport};
use refscan_scan::{InMemoryHost, MissingReferenceScanner};

#[derive(Parser)]
#[command(
    name = "refscan",
    version,
    about = "Find serialized object references whose target no longer exists",
    long_about = "refscan walks every scene, prefab and serialized object listed in a \
                  project manifest and reports object-reference properties that still \
                  carry a stored id but no longer resolve."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a project and list missing references
    Scan {
        #[command(flatten)]
        scan: ScanArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show per-asset progress on stderr
        #[arg(short, long)]
        progress: bool,
    },

    /// Scan and exit with status 1 when missing references exist
    Check {
        #[command(flatten)]
        scan: ScanArgs,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Project manifest (JSON)
    manifest: PathBuf,

    /// Only entries under this root are scanned
    #[arg(short = 'r', long, default_value = "Assets")]
    content_root: String,

    /// Glob of entries to skip (repeatable)
    #[arg(short = 'x', long = "exclude")]
    exclude: Vec<String>,

    /// Skip assets that fail to resolve instead of aborting
    #[arg(long)]
    skip_failures: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Scan {
            scan,
            format,
            output,
            progress,
        } => {
            let report = run_scan(&scan, progress)?;
            write_report(&report, format, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { scan } => {
            let report = run_scan(&scan, false)?;
            if report.is_clean() {
                println!("No missing references found.");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{} missing reference(s) found.", report.len());
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

/// Install a stderr subscriber, honoring `RUST_LOG` when set.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,refscan=debug,refscan_scan=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

/// Load the manifest and run a scan.
fn run_scan(args: &ScanArgs, show_progress: bool) -> Result<ScanReport> {
    let host = InMemoryHost::from_path(&args.manifest)
        .with_context(|| format!("Failed to load manifest {}", args.manifest.display()))?;

    let policy = if args.skip_failures {
        FailurePolicy::Skip
    } else {
        FailurePolicy::Abort
    };
    let config = ScanConfig::builder()
        .content_root(args.content_root.clone())
        .exclude_patterns(args.exclude.clone())
        .failure_policy(policy)
        .build()
        .context("Invalid scan configuration")?;

    debug!(?config, manifest = %args.manifest.display(), "Loaded scan configuration");
    let scanner = MissingReferenceScanner::with_config(config)?;

    eprintln!("Scanning {} entries...", host.len());

    let report = scanner
        .scan_with_progress(&host, |p| {
            if show_progress {
                eprintln!("[{:>5.1}%] {}", p.percentage(), p.current_path);
            }
        })
        .context("Scan failed")?;

    for warning in &report.warnings {
        eprintln!(
            "Skipped {} at '{}': {}",
            warning.asset_path, warning.sub_path, warning.message
        );
    }

    Ok(report)
}

/// Print the report in the requested format.
fn write_report(report: &ScanReport, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), rows = report.len(), "Report written");
            eprintln!("Report written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
        }
    }

    Ok(())
}

/// Render rows like console entries: description, then asset path.
fn render_text(report: &ScanReport) -> String {
    let mut out = String::new();
    let rule = "─".repeat(70);

    out.push_str(&format!("{rule}\n Missing References\n{rule}\n\n"));

    if report.is_clean() {
        out.push_str(" No missing references found.\n");
    } else {
        for row in &report.rows {
            out.push_str(&format!(" {}\n   {}\n", row.description(), row.asset_path()));
        }
        out.push_str(&format!(
            "\n {} finding(s) in {} asset(s) scanned\n",
            report.len(),
            report.assets_scanned
        ));
    }

    out.push_str(&format!(
        " Scanned in {:.2}s\n",
        report.scan_duration.as_secs_f64()
    ));

    if report.has_warnings() {
        out.push_str(&format!(" {} asset(s) skipped\n", report.warnings.len()));
    }

    out
}
