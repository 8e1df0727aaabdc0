//! 港口仿真
//!
//! 从 JSON 配置构建港口并按固定步长运行到结束时间

use chrono::NaiveDateTime;
use clap::Parser;
use harbor_sim::harbor::HarborStats;
use harbor_sim::history::HarborSnapshot;
use harbor_sim::sim::{HarborSpec, SimTime};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "harbor-sim", about = "Run a harbor.json through the harbor simulator")]
struct Args {
    /// Path to harbor.json
    #[arg(long)]
    config: PathBuf,

    /// Run until this time (e.g. 2024-01-02T00:00:00); defaults to the configured end
    #[arg(long)]
    until: Option<NaiveDateTime>,

    /// Write a JSON summary (stats, final state, daily snapshots)
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Print the recorded events of this ship
    #[arg(long)]
    ship_events: Option<String>,
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    harbor: &'a str,
    finished_at: SimTime,
    ticks: u64,
    stats: &'a HarborStats,
    final_state: HarborSnapshot,
    snapshots: Vec<&'a HarborSnapshot>,
}

fn main() -> ExitCode {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let raw = fs::read_to_string(&args.config).expect("read harbor.json");
    let spec = match HarborSpec::from_json(&raw) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };
    let (mut harbor, mut sim) = match spec.build() {
        Ok(built) => built,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    match args.until {
        Some(until) => sim.run_until(SimTime(until), &mut harbor),
        None => sim.run(&mut harbor),
    }

    let stats = &harbor.stats;
    println!(
        "done @ {}, arrivals={}, dockings={}, departures={}, containers_moved={}, jobs_completed={}, containers_in_storage={}",
        sim.now(),
        stats.arrivals,
        stats.dockings,
        stats.departures,
        stats.containers_moved,
        stats.jobs_completed,
        harbor.storage().container_count()
    );

    if let Some(ship) = &args.ship_events {
        for line in harbor.history().ship_events(ship) {
            println!("event {line}");
        }
    }

    if let Some(path) = &args.summary_json {
        let summary = Summary {
            harbor: harbor.name(),
            finished_at: sim.now(),
            ticks: sim.ticks(),
            stats: &harbor.stats,
            final_state: harbor.snapshot(),
            snapshots: harbor.history().snapshots().map(|(_, s)| s).collect(),
        };
        let json = serde_json::to_string_pretty(&summary).expect("serialize summary");
        fs::write(path, json).expect("write summary json");
    }

    ExitCode::SUCCESS
}
