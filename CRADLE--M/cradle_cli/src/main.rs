use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Local, Utc};
use clap::{Parser, Subcommand};
use cradle_simulation::{
    CaregiverFlow, ExperienceSource, NewbornRoutine, PathStatus, SandboxConfig, SimulationEngine,
    SimulationTelemetry, SourceKind,
};
use cradle_world::{ascii_map, generate_world, CageBounds};
use serde_json::json;
use shared_event_bus::{read_events, FileEventPublisher};
use shared_logging::LogLevel;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "cradle", version, about = "Observer console for the cradle sandbox")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lives a number of days and prints the run report.
    Run(RunArgs),
    /// Prints the events a source would schedule for one day.
    Plan {
        #[arg(long, default_value_t = 0)]
        day: u32,
        #[arg(long, default_value_t = 7)]
        seed: u64,
        #[arg(long, default_value = "newborn")]
        source: String,
        #[arg(long, default_value_t = 10)]
        events_per_day: usize,
    },
    /// Prints the observer map after living some days.
    Map {
        #[arg(long, default_value_t = 7)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        days: u32,
    },
    /// Lets the curriculum bots propose paths and lists the registry.
    Paths {
        #[arg(long, default_value_t = 7)]
        seed: u64,
        /// Days lived before proposing.
        #[arg(long, default_value_t = 1)]
        days: u32,
        /// Approve unlocked proposals.
        #[arg(long)]
        approve: bool,
        /// Live one day built from the approved paths.
        #[arg(long)]
        live: bool,
        #[arg(long)]
        status: Option<String>,
    },
    /// Replays an observer event log.
    Events {
        file: PathBuf,
        /// Only types at or below this dotted prefix.
        #[arg(long)]
        prefix: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    days: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    source: Option<String>,
    #[arg(long)]
    overnight_in_hospital: bool,
    /// Directory receiving a dated JSON-lines log.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    #[arg(long)]
    event_log: Option<PathBuf>,
    #[arg(long)]
    min_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => handle_run(args),
        Commands::Plan {
            day,
            seed,
            source,
            events_per_day,
        } => {
            let kind = parse_source(&source)?;
            let mut world = generate_world(seed);
            let mut source: Box<dyn ExperienceSource> = match kind {
                SourceKind::Newborn => Box::new(NewbornRoutine::new(seed, Default::default())),
                SourceKind::Caregiver => Box::new(CaregiverFlow::new(events_per_day)),
            };
            for event in source.build_day(&mut world, day) {
                println!("{:>3} {}", event.index, event.summary());
            }
            Ok(())
        }
        Commands::Map { seed, days } => {
            let mut engine = SimulationEngine::builder().seed(seed).build()?;
            engine.run(days)?;
            println!("{}", ascii_map(engine.world(), CageBounds::default()));
            Ok(())
        }
        Commands::Paths {
            seed,
            days,
            approve,
            live,
            status,
        } => {
            let status = status
                .map(|raw| PathStatus::parse(&raw).ok_or_else(|| anyhow!("unknown status `{raw}`")))
                .transpose()?;
            let mut engine = SimulationEngine::builder().seed(seed).build()?;
            engine.run(days.max(1))?;
            engine.propose_paths();
            if approve || live {
                engine.approve_unlocked();
            }
            if live {
                let report = engine.run_approved_day()?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            for path in engine.registry().list(status) {
                println!(
                    "{} | {:?} | {:?} | {:.2} | {}",
                    path.path_id,
                    path.kind,
                    path.status,
                    path.priority,
                    path.field("name").unwrap_or("-")
                );
            }
            Ok(())
        }
        Commands::Events {
            file,
            prefix,
            limit,
        } => {
            let events = read_events(&file)?;
            let matching: Vec<_> = events
                .iter()
                .filter(|event| match prefix.as_deref() {
                    Some(prefix) => event.is_under(prefix),
                    None => true,
                })
                .collect();
            for event in matching.iter().rev().take(limit).rev() {
                println!(
                    "{} | {} | {} | {}",
                    event.timestamp, event.source, event.event_type, event.payload
                );
            }
            Ok(())
        }
    }
}

fn handle_run(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => SandboxConfig::load(path)?,
        None => SandboxConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(days) = args.days {
        config.days = days;
    }
    if let Some(source) = &args.source {
        config.source = parse_source(source)?;
    }
    if args.overnight_in_hospital {
        config.overnight_in_hospital = true;
    }
    if let Some(level) = args.min_level {
        config.telemetry.min_level = level;
    }
    if let Some(dir) = &args.log_dir {
        config.telemetry.log_path = Some(compute_log_path(dir)?);
    }
    if let Some(path) = args.event_log {
        config.telemetry.event_path = Some(path);
    }

    let run_id = format!("run-{}", Uuid::new_v4());
    let mut telemetry = SimulationTelemetry::builder("cradle")
        .min_level(config.telemetry.level()?)
        .context("run_id", run_id.clone())
        .context("seed", config.seed);
    if let Some(path) = &config.telemetry.log_path {
        telemetry = telemetry.log_path(path);
    }
    if let Some(path) = &config.telemetry.event_path {
        let publisher = FileEventPublisher::new(path)
            .with_context(|| format!("opening event log {}", path.display()))?;
        telemetry = telemetry.event_publisher(Arc::new(publisher));
    }
    let telemetry = telemetry.build()?;
    let _ = telemetry.log(
        LogLevel::Info,
        "simulation.run.started",
        json!({ "days": config.days, "source": config.source }),
    );

    let days = config.days;
    let mut engine = SimulationEngine::builder()
        .config(config)
        .telemetry(telemetry.clone())
        .build()?;
    let report = engine.run(days)?;

    for day in &report.days {
        println!(
            "day {:>2} | {} | events {:>2} | accepted {:>2} | blocked {} | packets {:>2} | replayed {}",
            day.day,
            day.source,
            day.events,
            day.accepted,
            day.blocked,
            day.packets,
            day.sleep.replayed_count
        );
    }
    println!("{run_id}");
    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    let _ = telemetry.log(
        LogLevel::Info,
        "simulation.run.completed",
        json!({
            "accepted": report.total_accepted(),
            "blocked": report.total_blocked(),
        }),
    );
    Ok(())
}

fn parse_source(raw: &str) -> Result<SourceKind> {
    SourceKind::parse(raw).ok_or_else(|| anyhow!("unknown source `{raw}` (newborn | caregiver)"))
}

fn compute_log_path(base: &Path) -> Result<PathBuf> {
    let now = Local::now();
    let dir = base
        .join(format!("{:04}", now.year()))
        .join(format!("{:02}", now.month()))
        .join(format!("{:02}", now.day()));
    fs::create_dir_all(&dir)?;
    Ok(dir.join(format!(
        "cradle-{}.log.jsonl",
        Utc::now().format("%Y%m%d-%H%M%S")
    )))
}
