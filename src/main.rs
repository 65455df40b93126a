// src/main.rs
//
// Driver: build (or resume) a sample, relax it, run thermal jumps, write results.
//
// Examples:
//
//   cargo run --release -- -s settings.json
//       -> fresh sample from settings, written to runs/<run_id>/
//
//   cargo run --release -- -s step.json -o sweep --label B_0.120
//       -> one hysteresis step (settings: "hysteresis": true, "load": true);
//          resumes from json_path, applies the field from settings and writes
//          sweep/B_0.120.txt plus the relaxed state back to json_path.
//          The first step of a sweep sets "load": false; later steps fail if
//          json_path is missing.
//
// Typical outputs (per run directory):
//   runs/<run_id>/
//     ├── config.json
//     ├── summary.json
//     ├── momenta.txt                       (or <label>.txt)
//     └── momenta_<jumps>_<1|2>_<t>.txt     (per jump, non-hysteresis runs)

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use tracing::{error, info};

use mamca::config::Settings;
use mamca::error::SimError;
use mamca::output::{write_moment_dump, RunSummary};
use mamca::sample::Sample;

#[derive(Parser, Debug)]
#[command(
    name = "mamca",
    version,
    about = "Relaxation of interacting magnetic nanoparticles",
    long_about = None
)]
struct Args {
    /// Settings JSON. Defaults are used when omitted.
    #[arg(short, long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Output root directory.
    #[arg(short, long, value_name = "DIR", default_value = "runs")]
    out: PathBuf,

    /// Run directory name under the output root (non-hysteresis runs).
    #[arg(long)]
    run_id: Option<String>,

    /// Name of the final moment dump, without extension.
    #[arg(long)]
    label: Option<String>,

    /// Half-length of the moment arrows in dumps [nm].
    #[arg(long, default_value_t = 1.0)]
    arrow_scale: f64,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn sanitize_run_id(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn default_run_id(settings: &Settings) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!(
        "{}{:03}_n{}_T{}",
        now.as_secs(),
        now.subsec_millis(),
        settings.x * settings.y * settings.z * settings.n,
        settings.t
    )
}

fn unique_run_dir(out_root: &Path, run_id: &str) -> PathBuf {
    let mut dir = out_root.join(run_id);
    if !dir.exists() {
        return dir;
    }
    for k in 1..1000 {
        let cand = out_root.join(format!("{run_id}_{k}"));
        if !cand.exists() {
            dir = cand;
            break;
        }
    }
    dir
}

fn run(args: &Args) -> Result<(), SimError> {
    let settings = match args.settings.as_deref() {
        Some(path) => {
            info!("loading settings from {}", path.display());
            Settings::from_json_file(path)?
        }
        None => {
            info!("no settings file given, using defaults");
            Settings::default()
        }
    };
    settings.validate()?;

    let run_dir = if settings.hysteresis {
        args.out.clone()
    } else {
        let run_id = args
            .run_id
            .clone()
            .unwrap_or_else(|| default_run_id(&settings));
        unique_run_dir(&args.out, &sanitize_run_id(&run_id))
    };
    std::fs::create_dir_all(&run_dir)?;
    settings.write_json_file(&run_dir.join("config.json"))?;
    info!(run_dir = %run_dir.display(), "output directory");

    let mut sample = Sample::load_or_generate(&settings)?;
    info!(
        particles = sample.particles().len(),
        field = %sample.external_field(),
        parallel = settings.parallel,
        "starting relaxation"
    );

    let scale = args.arrow_scale;
    let report = if settings.hysteresis {
        sample.process_model()?
    } else {
        let mut dump_err: Option<std::io::Error> = None;
        let report = sample.process_model_with(|s, snap| {
            if dump_err.is_some() {
                return;
            }
            let path = run_dir.join(snap.file_name());
            if let Err(e) = write_moment_dump(&path, s.particles(), scale, true) {
                dump_err = Some(e);
            }
        })?;
        if let Some(e) = dump_err {
            return Err(e.into());
        }
        report
    };

    info!("start: {}", report.start);
    info!("end:   {}", report.end);
    info!(
        steps = report.total_steps,
        jumps = report.jumps,
        two_minima = sample.two_minimum_particles().len(),
        "model processed"
    );

    let dump_name = match &args.label {
        Some(label) => format!("{}.txt", sanitize_run_id(label)),
        None => "momenta.txt".to_string(),
    };
    write_moment_dump(&run_dir.join(dump_name), sample.particles(), scale, true)?;
    sample.to_record().write_json(&settings.json_path)?;
    RunSummary::new(&sample, &report).write_json(&run_dir.join("summary.json"))?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level_filter = args
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(log_level_filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
