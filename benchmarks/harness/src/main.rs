//! corder-bench-harness
//!
//! Sweep thread multipliers for one group size and append CSV rows into
//! `benchmarks/reports/bench-<unix>.csv`.
//!
//! Usage examples:
//!   cargo run --release -p corder-bench-harness -- --profile benchmarks/configs/small.toml
//!   cargo run --release -p corder-bench-harness -- --profile benchmarks/configs/medium.toml --parallelism 4

use std::fs;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use corder_core::GroupSize;
use corder_scheduler::{search, RangePolicy, SearchConfig};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Profile {
    /// Group size searched on every run
    n: u32,
    /// Thread multipliers to sweep, in order
    multipliers: Vec<u32>,
    /// Runs per multiplier
    repeats: u32,
    /// Range policy (`halved` unless given)
    #[serde(default)]
    policy: RangePolicy,
}

fn parse_flag(name: &str, default: &str) -> String {
    let mut it = std::env::args().skip(1);
    while let Some(k) = it.next() {
        if k == format!("--{name}") {
            return it.next().unwrap_or_else(|| default.to_string());
        }
    }
    default.to_string()
}

fn parse_profile(src: &str) -> Result<Profile> {
    let profile: Profile = toml::from_str(src).context("parse profile toml")?;
    GroupSize::new(profile.n)?;
    ensure!(!profile.multipliers.is_empty(), "profile lists no multipliers");
    ensure!(
        profile.multipliers.iter().all(|&m| m > 0),
        "multipliers must be at least 1"
    );
    Ok(profile)
}

fn main() -> Result<()> {
    let profile_path = PathBuf::from(parse_flag("profile", "benchmarks/configs/small.toml"));
    let detected = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let parallelism: usize = parse_flag("parallelism", &detected.to_string())
        .parse()
        .context("--parallelism must be a number")?;

    let profile_src = fs::read_to_string(&profile_path)
        .with_context(|| format!("read profile {}", profile_path.display()))?;
    let profile = parse_profile(&profile_src)?;
    let group = GroupSize::new(profile.n)?;
    println!(
        "Profile: n={}, multipliers={:?}, repeats={}, policy={:?}, parallelism={parallelism}",
        profile.n, profile.multipliers, profile.repeats, profile.policy
    );

    fs::create_dir_all("benchmarks/reports").context("create benchmarks/reports")?;

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before unix epoch")?
        .as_secs();
    let csv_path = PathBuf::from(format!("benchmarks/reports/bench-{ts}.csv"));
    let mut csv = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&csv_path)
        .with_context(|| format!("open {}", csv_path.display()))?;
    writeln!(csv, "n,policy,multiplier,workers,repeat,total,seconds")?;

    let policy = match profile.policy {
        RangePolicy::Halved => "halved",
        RangePolicy::Exhaustive => "exhaustive",
    };

    for &mult in &profile.multipliers {
        let config = SearchConfig::new(group, parallelism, mult as usize, profile.policy)
            .with_context(|| format!("configure multiplier {mult}"))?;
        for rep in 0..profile.repeats {
            let t0 = Instant::now();
            let report = search(&config, None)
                .with_context(|| format!("search at multiplier {mult}, repeat {rep}"))?;
            let secs = t0.elapsed().as_secs_f64();

            writeln!(
                csv,
                "{},{policy},{mult},{},{rep},{},{secs:.6}",
                profile.n,
                config.workers(),
                report.total
            )?;
            println!("  x{mult} ({} workers) #{rep}: {secs:.3}s", config.workers());
        }
    }

    println!("Wrote report → {}", csv_path.display());
    Ok(())
}
