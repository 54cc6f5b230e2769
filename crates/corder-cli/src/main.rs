// crates/corder-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{ensure, Context, Result};
use clap::Parser;
use corder_core::GroupSize;
use corder_scheduler::{
    search, OrderingSink, RangePolicy, SearchConfig, SearchError, SearchReport, WriterSink,
};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Overrides the detected number of concurrent threads.
const PARALLELISM_ENV: &str = "CORDER_PARALLELISM";

/// Missing or invalid argument.
const EXIT_USAGE: u8 = 1;
/// A worker could not be started (or failed while running).
const EXIT_DISPATCH: u8 = 2;
/// `n` is too small for the derived worker count.
const EXIT_TOO_SMALL: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    name = "corder",
    about = "Count constructive orderings of Z/nZ in parallel",
    long_about = "Count constructive orderings of Z/nZ in parallel.\n\n\
        The (n-1)! orderings of the nonzero residues are split into one contiguous \
        lexicographic range per worker. By default only the first half is visited \
        and the count is doubled (every solution has a mirror on the other side of n/2).\n\n\
        Recorded orderings go to stderr, one per line; redirect stderr to capture them.",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Group size n (1..=21)
    #[arg(value_parser = clap::value_parser!(u32).range(1..=21))]
    n: u32,

    /// Worker count = THREAD_MULT × available parallelism
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    thread_mult: u32,

    /// 1 = write every constructive ordering found to stderr
    #[arg(default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    save_flag: u8,

    /// 1 = search the full space instead of half (only with SAVE_FLAG = 1)
    #[arg(default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    full_range_flag: u8,

    /// Also write the search report as JSON to this path
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

impl Cli {
    const fn save(&self) -> bool {
        self.save_flag == 1
    }

    const fn policy(&self) -> RangePolicy {
        if self.save() && self.full_range_flag == 1 {
            RangePolicy::Exhaustive
        } else {
            RangePolicy::Halved
        }
    }
}

/// JSON written by `--summary-json`.
#[derive(Serialize, Debug)]
struct RunSummary<'a> {
    multiplier: u32,
    parallelism: usize,
    elapsed_secs: f64,
    #[serde(flatten)]
    report: &'a SearchReport,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help / --version are not failures.
            let code = if e.use_stderr() { EXIT_USAGE } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[ERROR] {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Initialize tracing with an env-driven filter (default WARN).
///
/// Logs go to stderr so stdout keeps only the report lines.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Map an error to the process exit code.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<SearchError>() {
        Some(SearchError::TooFewElements { .. } | SearchError::DegeneratePartition { .. }) => {
            EXIT_TOO_SMALL
        }
        Some(
            SearchError::Dispatch { .. } | SearchError::WorkerPanicked { .. } | SearchError::Sink(_),
        ) => EXIT_DISPATCH,
        Some(SearchError::NoWorkers) | None => EXIT_USAGE,
    }
}

/// Host parallelism, unless overridden by `CORDER_PARALLELISM`.
fn detect_parallelism() -> Result<usize> {
    if let Ok(raw) = std::env::var(PARALLELISM_ENV) {
        let p: usize = raw
            .trim()
            .parse()
            .with_context(|| format!("{PARALLELISM_ENV}={raw:?} is not a number"))?;
        ensure!(p > 0, "{PARALLELISM_ENV} must be at least 1");
        return Ok(p);
    }
    Ok(std::thread::available_parallelism().map_or(1, NonZeroUsize::get))
}

/// Ensure the parent directory for a file exists.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", dir.display()))?;
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let group = GroupSize::new(cli.n)?;
    let parallelism = detect_parallelism()?;
    let policy = cli.policy();
    if cli.full_range_flag == 1 && !cli.save() {
        warn!("full-range flag has no effect unless the save flag is set");
    }

    let config = SearchConfig::new(group, parallelism, cli.thread_mult as usize, policy)?;

    if cli.save() {
        println!("Saving results..");
    }
    let start = Instant::now();
    println!("MAX THREADS: {}", config.workers());
    // Make the header visible before workers start writing to stderr.
    io::stdout().flush().context("flushing stdout")?;

    let stderr_sink = WriterSink::new(BufWriter::new(io::stderr()));
    let sink: Option<&dyn OrderingSink> = if cli.save() {
        Some(&stderr_sink)
    } else {
        None
    };

    info!(n = cli.n, parallelism, multiplier = cli.thread_mult, ?policy, "starting search");
    let report = search(&config, sink)?;
    let secs = start.elapsed().as_secs_f64();

    println!(
        "FINISHED - Total good orderings: {} - Time taken: {secs:.6}",
        report.total
    );
    println!("{},{secs:.6}", cli.thread_mult);
    if cli.save() {
        eprintln!("{},{secs:.6}", cli.thread_mult);
    }

    if let Some(path) = &cli.summary_json {
        let summary = RunSummary {
            multiplier: cli.thread_mult,
            parallelism,
            elapsed_secs: secs,
            report: &report,
        };
        write_summary(path, &summary)?;
        info!(path = %path.display(), "wrote summary");
    }
    Ok(())
}

fn write_summary(path: &Path, summary: &RunSummary<'_>) -> Result<()> {
    ensure_parent_dir(path)?;
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, summary).context("serialize summary to JSON")?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}
