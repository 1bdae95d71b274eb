//! PPS tagging CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use pps_core::{CrossingAngle, Era, Sector};
use pps_eff::{
    in_fiducial, project_final_state, ArmEfficiency, ArmObservation, EfficiencyRequest, EvalFlags,
    ProtonEfficiencyEvaluator, SignalHypothesis,
};
use pps_maps::EfficiencyMapRepository;

#[derive(Parser)]
#[command(name = "ppstag")]
#[command(about = "PPS proton-tagging efficiency corrections")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tabulate tagging efficiencies over the loaded calibration grid
    Scan {
        /// Efficiency map bundle (JSON)
        #[arg(short, long)]
        maps: PathBuf,

        /// Fractional momentum loss at which to probe the curves
        #[arg(long, default_value = "0.035")]
        xi: f64,

        /// Station ids to probe (ids below 100 sit in sector 45)
        #[arg(long, value_delimiter = ',', default_value = "3,103")]
        stations: Vec<u32>,

        /// Output file for results (pretty JSON). Defaults to a stdout table.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Project events onto signal hypotheses and compute per-event weights
    Project {
        /// Efficiency map bundle (JSON)
        #[arg(short, long)]
        maps: PathBuf,

        /// Input events (JSON array)
        #[arg(short, long)]
        input: PathBuf,

        /// Single hypothesis mask 0..15; all 16 when omitted
        #[arg(long)]
        hypothesis: Option<u8>,

        /// Threads (0 = auto). Use 1 for deterministic ordering.
        #[arg(long, default_value = "1")]
        threads: usize,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// One event on the projection input: the per-arm candidates plus the run
/// conditions they were recorded under.
#[derive(Debug, Deserialize)]
struct EventRecord {
    era: Era,
    angle: CrossingAngle,
    #[serde(default)]
    positive: ArmObservation,
    #[serde(default)]
    negative: ArmObservation,
}

#[derive(Debug, Serialize)]
struct ScanRow {
    era: String,
    angle: u16,
    station: u32,
    efficiency: f64,
    uncertainty: f64,
}

#[derive(Debug, Serialize)]
struct ProjectionRow {
    event: usize,
    hypothesis: u8,
    weight: f64,
    weight_unc: f64,
    n_multi_positive: usize,
    n_pixel_positive: usize,
    n_multi_negative: usize,
    n_pixel_negative: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Scan { maps, xi, stations, output } => {
            cmd_scan(&maps, xi, &stations, output.as_ref())
        }
        Commands::Project { maps, input, hypothesis, threads, output } => {
            cmd_project(&maps, &input, hypothesis, threads, output.as_ref())
        }
    }
}

fn cmd_scan(maps: &PathBuf, xi: f64, stations: &[u32], output: Option<&PathBuf>) -> Result<()> {
    let repo = EfficiencyMapRepository::from_path(maps)
        .with_context(|| format!("loading efficiency maps from {}", maps.display()))?;
    let evaluator = ProtonEfficiencyEvaluator::new(&repo);

    let mut keys: Vec<(Sector, Era, CrossingAngle)> =
        repo.raddam_keys().map(|(s, e, a)| (s, e.clone(), a)).collect();
    keys.sort_by(|a, b| {
        (a.1.as_str(), a.2.urad(), a.0.code()).cmp(&(b.1.as_str(), b.2.urad(), b.0.code()))
    });

    let mut rows = Vec::new();
    for (sector, era, angle) in &keys {
        for &station in stations {
            if Sector::from_station_id(station) != *sector {
                continue;
            }
            // No local coordinates in a grid scan; the sentinel skips the
            // inter-pot stage.
            let req =
                EfficiencyRequest { era, angle: *angle, xi, x: -99.0, y: -99.0, station };
            let (efficiency, uncertainty) = evaluator.evaluate(&req, EvalFlags::default())?;
            rows.push(ScanRow {
                era: era.to_string(),
                angle: angle.urad(),
                station,
                efficiency,
                uncertainty,
            });
        }
    }
    info!(rows = rows.len(), "scanned efficiency grid");

    match output {
        Some(path) => {
            std::fs::write(path, serde_json::to_string_pretty(&rows)?)?;
        }
        None => {
            for r in &rows {
                println!(
                    "{:>6} {:>4} {:>4} {:.3} +/- {:.3}",
                    r.era, r.angle, r.station, r.efficiency, r.uncertainty
                );
            }
        }
    }
    Ok(())
}

fn cmd_project(
    maps: &PathBuf,
    input: &PathBuf,
    hypothesis: Option<u8>,
    threads: usize,
    output: Option<&PathBuf>,
) -> Result<()> {
    if threads > 0 {
        let _ = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global();
    }

    let repo = EfficiencyMapRepository::from_path(maps)
        .with_context(|| format!("loading efficiency maps from {}", maps.display()))?;

    let json = std::fs::read_to_string(input)
        .with_context(|| format!("reading events from {}", input.display()))?;
    let events: Vec<EventRecord> = serde_json::from_str(&json)?;
    info!(events = events.len(), "loaded events");

    let hypotheses: Vec<SignalHypothesis> = match hypothesis {
        Some(bits) => vec![SignalHypothesis::new(bits)],
        None => SignalHypothesis::all().collect(),
    };

    let rows: Vec<ProjectionRow> = events
        .par_iter()
        .enumerate()
        .map(|(idx, event)| project_event(&repo, idx, event, &hypotheses))
        .collect::<pps_core::Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();

    let json = serde_json::to_string_pretty(&rows)?;
    match output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn project_event(
    repo: &EfficiencyMapRepository,
    idx: usize,
    event: &EventRecord,
    hypotheses: &[SignalHypothesis],
) -> pps_core::Result<Vec<ProjectionRow>> {
    // Pixel candidates outside the validated acceptance never enter the
    // projection.
    let mut positive = event.positive.clone();
    let mut negative = event.negative.clone();
    for arm in [&mut positive, &mut negative] {
        arm.pixel.retain(|c| {
            in_fiducial(
                &event.era,
                Sector::from_station_id(c.station),
                c.x,
                c.y,
                c.slope_x,
                c.slope_y,
            )
        });
    }

    let pos_eff = arm_strip_efficiency(repo, &event.era, event.angle, &positive)?;
    let neg_eff = arm_strip_efficiency(repo, &event.era, event.angle, &negative)?;

    let rows = hypotheses
        .iter()
        .map(|&h| {
            let r = project_final_state(&positive, pos_eff, &negative, neg_eff, h);
            ProjectionRow {
                event: idx,
                hypothesis: h.bits(),
                weight: r.weight,
                weight_unc: r.weight_unc,
                n_multi_positive: r.positive.multi.len(),
                n_pixel_positive: r.positive.pixel.len(),
                n_multi_negative: r.negative.multi.len(),
                n_pixel_negative: r.negative.pixel.len(),
            }
        })
        .collect();
    Ok(rows)
}

/// Strip-tagging efficiency of one arm, from its leading multi-track
/// candidate. An arm with no multi-track candidate needs no survival or
/// miss factor, so it evaluates as fully efficient.
fn arm_strip_efficiency(
    repo: &EfficiencyMapRepository,
    era: &Era,
    angle: CrossingAngle,
    arm: &ArmObservation,
) -> pps_core::Result<ArmEfficiency> {
    let evaluator = ProtonEfficiencyEvaluator::new(repo);
    match arm.multi.first() {
        Some(c) => {
            let req = EfficiencyRequest { era, angle, xi: c.xi, x: c.x, y: c.y, station: c.station };
            let (value, uncertainty) = evaluator.evaluate(&req, EvalFlags::default())?;
            Ok(ArmEfficiency { value, uncertainty })
        }
        None => Ok(ArmEfficiency::unit()),
    }
}
