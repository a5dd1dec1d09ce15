use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, error, warn};

use flowgate_checker::{stop_servers, ServerRegistry};
use flowgate_core::{
    process_file, render_json, render_text, success_message, FileCheck, FileDisposition,
    RunContext, RunOptions,
};
use flowgate_types::{ConfigFile, Reporter};

mod config;

use config::load_config;

#[derive(Parser)]
#[command(name = "flowgate")]
#[command(about = "Gate a build on an external type checker's diagnostics", long_about = None)]
struct Cli {
    /// Enable verbose (info-level) logging to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Enable debug-level logging to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run files through the checker and report diagnostics attributed to
    /// each.
    Check(CheckArgs),

    /// Terminate background checker servers.
    Stop(StopArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Files to run through the pipeline.
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Check every file, ignoring per-file pragma detection.
    #[arg(long)]
    all: bool,

    /// Ask the checker for weak-mode checking.
    #[arg(long)]
    weak: bool,

    /// Additional library/declaration search path passed to the checker.
    #[arg(long, value_name = "PATH")]
    lib: Option<PathBuf>,

    /// Terminate background checker servers when the run ends.
    #[arg(long)]
    kill: bool,

    /// Stop on the first failing file instead of continuing.
    #[arg(long)]
    abort: bool,

    /// Disable the audible failure notification.
    #[arg(long)]
    no_beep: bool,

    /// Fold location-less continuation fragments into their predecessor.
    #[arg(long)]
    collapse: bool,

    /// Report format.
    #[arg(long, value_enum)]
    reporter: Option<ReporterArg>,

    /// Path to a config file. If omitted, uses ./flowgate.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReporterArg {
    Text,
    Json,
}

impl From<ReporterArg> for Reporter {
    fn from(arg: ReporterArg) -> Self {
        match arg {
            ReporterArg::Text => Reporter::Text,
            ReporterArg::Json => Reporter::Json,
        }
    }
}

#[derive(Parser, Debug)]
struct StopArgs {
    /// Directories whose background server should be stopped.
    #[arg(value_name = "DIR", default_value = ".")]
    dirs: Vec<PathBuf>,
}

fn main() -> std::process::ExitCode {
    match run_with_args(std::env::args_os()) {
        Ok(code) => std::process::ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("{err:?}");
            std::process::ExitCode::from(1)
        }
    }
}

fn run_with_args<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    init_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Check(args) => cmd_check(args),
        Commands::Stop(args) => cmd_stop(args),
    }
}

fn cmd_check(args: CheckArgs) -> Result<i32> {
    let cfg = load_config(args.config.as_deref())?;
    let options = resolve_options(&args, &cfg);

    let beep = options.beep;
    let reporter = options.reporter;
    let mut ctx = RunContext::new(options);

    for file in &args.files {
        let target = absolutize(file);

        match process_file(&mut ctx, &target) {
            Ok(FileDisposition::Checked(check)) => {
                if !check.outcome.passed() {
                    emit_report(&check, reporter)?;
                }
            }
            Ok(FileDisposition::SkippedNoPragma) | Ok(FileDisposition::SkippedNoConfig) => {}
            Err(err) => {
                error!("{err}");
                ctx.passed = false;
            }
        }

        if ctx.options.abort && !ctx.passed {
            debug!("aborting after first failing file");
            break;
        }
    }

    let summary = ctx.finish();
    if let Some(stop) = &summary.stop {
        for failure in &stop.failures {
            warn!(dir = %failure.dir.display(), "{}", failure.reason);
        }
    }

    if summary.passed {
        println!("{}", success_message());
    } else if beep {
        eprint!("\u{7}");
    }

    Ok(if summary.passed { 0 } else { 2 })
}

fn cmd_stop(args: StopArgs) -> Result<i32> {
    let mut registry = ServerRegistry::new();
    for dir in &args.dirs {
        registry.register(&absolutize(dir));
    }

    let report = stop_servers(&registry);
    for failure in &report.failures {
        warn!(dir = %failure.dir.display(), "{}", failure.reason);
    }

    println!(
        "stopped {} of {} checker server(s)",
        report.attempted - report.failures.len(),
        report.attempted
    );

    Ok(if report.all_stopped() { 0 } else { 2 })
}

/// CLI flags win over config values; unset values fall back to built-ins.
fn resolve_options(args: &CheckArgs, cfg: &ConfigFile) -> RunOptions {
    let defaults = &cfg.defaults;

    RunOptions {
        all: args.all || defaults.all.unwrap_or(false),
        weak: args.weak || defaults.weak.unwrap_or(false),
        declarations: args.lib.clone().or_else(|| defaults.declarations.clone()),
        kill: args.kill || defaults.kill.unwrap_or(false),
        abort: args.abort || defaults.abort.unwrap_or(false),
        beep: if args.no_beep {
            false
        } else {
            defaults.beep.unwrap_or(true)
        },
        collapse: args.collapse || defaults.collapse.unwrap_or(false),
        reporter: args
            .reporter
            .map(Reporter::from)
            .or(defaults.reporter)
            .unwrap_or_default(),
        ..RunOptions::default()
    }
}

fn emit_report(check: &FileCheck, reporter: Reporter) -> Result<()> {
    match reporter {
        Reporter::Text => print!("{}", render_text(&check.records)),
        Reporter::Json => {
            if let Some(report) = check.outcome.report() {
                let json = render_json(report).context("serialize report")?;
                println!("{json}");
            }
        }
    }

    Ok(())
}

/// The engine compares paths byte-for-byte against the absolute paths the
/// checker prints, so inputs are canonicalized once up front. Paths that
/// cannot be canonicalized (not yet existing) are passed through and
/// rejected by the input gate.
fn absolutize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Initialize tracing/logging based on CLI flags.
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
