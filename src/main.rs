//! School route planner entry point: CLI wiring and config-driven planning.

use std::path::{Path, PathBuf};
use std::process;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use school_routes::config::PlannerConfig;
use school_routes::io::export::export_csv;
use school_routes::io::schedule::load_schedule;
use school_routes::model::SchoolActivities;
use school_routes::plan::week::{TargetWeek, today};
use school_routes::plan::{WeekSummary, build_delivery_plans};
use school_routes::sample;

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    schedule: Option<String>,
    week: Option<String>,
    mode: Option<String>,
    plans_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("school-routes: weekly school material delivery planner");
    eprintln!();
    eprintln!("Usage: school-routes [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load planner config from TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (sample, all_holidays)");
    eprintln!("  --schedule <path>        Schedule CSV (overrides config)");
    eprintln!("  --week <YYYY-MM-DD>      Any date in the target week");
    eprintln!("  --mode <mode>            course-start, per-term or ad-hoc");
    eprintln!("  --plans-out <path>       Export plans to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after planning");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the sample preset is used.");
    eprintln!("Without a schedule file, built-in sample schools are planned.");
}

/// Consumes the value following a flag or exits with an error.
fn take_value(args: &[String], i: &mut usize, flag: &str, what: &str) -> String {
    *i += 1;
    match args.get(*i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        schedule: None,
        week: None,
        mode: None,
        plans_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                cli.config_path = Some(take_value(&args, &mut i, "--config", "a path argument"));
            }
            "--preset" => {
                cli.preset = Some(take_value(&args, &mut i, "--preset", "a name argument"));
            }
            "--schedule" => {
                cli.schedule = Some(take_value(&args, &mut i, "--schedule", "a path argument"));
            }
            "--week" => cli.week = Some(take_value(&args, &mut i, "--week", "a date argument")),
            "--mode" => cli.mode = Some(take_value(&args, &mut i, "--mode", "a mode argument")),
            "--plans-out" => {
                cli.plans_out = Some(take_value(&args, &mut i, "--plans-out", "a path argument"));
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                let raw = take_value(&args, &mut i, "--port", "a u16 argument");
                if let Ok(p) = raw.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{raw}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.config_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --config and --preset are mutually exclusive");
        process::exit(1);
    }

    cli
}

/// Logs go to stderr so plan output on stdout stays parseable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configured schedule, falling back to the built-in sample schools.
fn load_schools(schedule: Option<&Path>, week: TargetWeek) -> Vec<SchoolActivities> {
    let Some(path) = schedule else {
        return sample::schools(week.monday());
    };
    match load_schedule(path, today()) {
        Ok(schools) => schools,
        Err(e) => {
            warn!("{e}; falling back to sample schools");
            sample::schools(week.monday())
        }
    }
}

fn main() {
    let cli = parse_args();
    init_tracing();

    // Load config: --config takes priority, then --preset, then sample default
    let mut config = if let Some(ref path) = cli.config_path {
        match PlannerConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match PlannerConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        PlannerConfig::sample()
    };

    // Apply overrides
    if let Some(schedule) = cli.schedule {
        config.input.schedule = Some(PathBuf::from(schedule));
    }
    if cli.week.is_some() {
        config.plan.week = cli.week;
    }
    if cli.mode.is_some() {
        config.plan.mode = cli.mode;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let week = config.week(today());
    let mode = config.mode();
    let holidays = config.holidays();
    let schools = load_schools(config.input.schedule.as_deref(), week);

    let plans = build_delivery_plans(&schools, week, mode, &holidays);

    println!("Delivery plans for {week} ({mode})");
    for plan in &plans {
        println!("{plan}");
        println!("    {}", plan.rationale);
    }
    println!("\n{}", WeekSummary::from_plans(&plans));

    if let Some(ref path) = cli.plans_out {
        if let Err(e) = export_csv(&plans, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Plans written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(school_routes::api::AppState {
            config,
            schools,
            today: today(),
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(school_routes::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
