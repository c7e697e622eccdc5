//! route171: batch runner for the busline simulator.
//!
//! Runs one service window of route 171 and writes the CSV reports.
//!
//! ```text
//! route171 [--config run.json] [--data DIR] [--out DIR] [--paced]
//! ```
//!
//! Without `--data` the built-in dataset is used (9 buses, 20 riders).  With
//! it, `stops.csv`, `passengers.csv` and `buses.csv` are read from `DIR`.
//! Without `--paced` the run ignores the configured speed and jumps between
//! events.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bl_core::{SimParams, MAX_SPEED_SENTINEL};
use bl_output::{CsvWriter, ReportObserver};
use bl_sim::{Engine, EngineBuilder, EngineConfig, ExtraBusSpec, Pacer};

// ── Run file ──────────────────────────────────────────────────────────────────

/// Contents of the optional `--config` JSON file.  Every section may be
/// omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunFile {
    params:         SimParams,
    engine:         EngineConfig,
    extra_services: Vec<ExtraBusSpec>,
}

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    data:   Option<PathBuf>,
    out:    PathBuf,
    paced:  bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        data:   None,
        out:    PathBuf::from("output/route171"),
        paced:  false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = Some(it.next().context("--config needs a path")?.into()),
            "--data"   => args.data = Some(it.next().context("--data needs a directory")?.into()),
            "--out"    => args.out = it.next().context("--out needs a directory")?.into(),
            "--paced"  => args.paced = true,
            other      => bail!("unknown argument `{other}`"),
        }
    }
    Ok(args)
}

fn read_run_file(path: &Path) -> Result<RunFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn build_engine(run: &RunFile, data: Option<&Path>) -> Result<Engine> {
    let builder = EngineBuilder::new().params(run.params.clone()).config(run.engine.clone());
    let builder = match data {
        Some(dir) => builder
            .stops(bl_import::load_stops_csv(&dir.join("stops.csv"))?)
            .passengers(bl_import::load_passengers_csv(&dir.join("passengers.csv"))?)
            .buses(bl_import::load_buses_csv(&dir.join("buses.csv"))?),
        None => builder.with_default_data(),
    };
    Ok(builder.build()?)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "route171=info,bl_sim=info".into()),
        )
        .with(fmt::layer())
        .init();

    let args = parse_args()?;
    let mut run = match &args.config {
        Some(path) => read_run_file(path)?,
        None => RunFile::default(),
    };
    if !args.paced {
        run.params.speed_factor = MAX_SPEED_SENTINEL;
    }

    println!("=== route171: busline simulator ===");
    println!(
        "Window: {} + {} min  |  Speed: {}",
        run.params.start_time,
        run.params.duration_minutes,
        if args.paced { format!("{}x", run.params.speed_factor) } else { "max".into() },
    );

    // 1. Load data.
    let mut engine = build_engine(&run, args.data.as_deref())?;
    for spec in &run.extra_services {
        let added = engine.add_extra_bus(spec)?;
        info!(buses = added.len(), destination = spec.destination.0, "extra service added");
    }
    println!(
        "Loaded {} stops, {} passengers, {} buses",
        engine.topology().len(),
        engine.passengers().len(),
        engine.fleet().len(),
    );
    println!();

    // 2. Run with the report observer attached.
    let mut obs = ReportObserver::new(CsvWriter::new(&args.out)?);
    let t0 = Instant::now();
    if args.paced {
        Pacer::new().run(&mut engine, &mut obs)?;
    } else {
        engine.run_to_end(&mut obs)?;
    }
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("report error: {e}");
    }

    // 3. Summary.
    println!("Simulation finished at {} in {:.3} s", engine.now(), elapsed.as_secs_f64());
    println!("Reports written to {}", args.out.display());
    println!();

    let Some(report) = obs.report() else {
        println!("(run did not complete; no report)");
        return Ok(());
    };
    let k = &report.kpis;
    println!("{:<22} {:>10}", "Metric", "Value");
    println!("{}", "-".repeat(33));
    println!("{:<22} {:>10}", "passengers", k.total_passengers);
    println!("{:<22} {:>10}", "arrived", k.arrived_passengers);
    println!("{:<22} {:>9.1}%", "completion rate", k.completion_rate_pct);
    println!("{:<22} {:>10.2}", "avg wait (min)", k.avg_wait_minutes);
    println!("{:<22} {:>10.2}", "avg travel (min)", k.avg_travel_minutes);
    println!("{:<22} {:>7}/{:<2}", "buses completed", k.completed_buses, k.total_buses);
    println!("{:<22} {:>10.2}", "avg trip (min)", k.avg_trip_minutes);
    println!();

    println!("{:<6} {:<10} {:<10} {:>8} {:>8}", "Bus", "Start", "Status", "Carried", "Occ %");
    println!("{}", "-".repeat(46));
    for b in &report.buses {
        println!(
            "{:<6} {:<10} {:<10} {:>8} {:>8.1}",
            b.bus_id,
            b.start_time.to_string(),
            b.status,
            b.total_carried,
            b.occupancy_pct,
        );
    }

    Ok(())
}
