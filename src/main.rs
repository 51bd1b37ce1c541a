//! rate-sim entry point — CLI wiring and config-driven projection.

use std::path::Path;
use std::process;

use tracing_subscriber::EnvFilter;

use rate_sim::config::ProjectionConfig;
use rate_sim::io::export::export_csv;
use rate_sim::model::engine::Engine;
use rate_sim::model::infrastructure::escalation_components;
use rate_sim::model::summary::Summary;

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    years_override: Option<u32>,
    csv_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("rate-sim — Residential bill-trajectory projector for large new grid loads");
    eprintln!();
    eprintln!("Usage: rate-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load projection config from TOML file");
    eprintln!("  --preset <name>          Use a built-in utility preset");
    eprintln!("                           ({})", ProjectionConfig::PRESETS.join(", "));
    eprintln!("  --years <u32>            Override projection horizon");
    eprintln!("  --csv-out <path>         Export trajectory to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after projection");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the pjm_mid_atlantic preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        years_override: None,
        csv_out: None,
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
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --config requires a path argument");
                    process::exit(1);
                }
                cli.config_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--years" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --years requires a u32 argument");
                    process::exit(1);
                }
                if let Ok(y) = args[i].parse::<u32>() {
                    cli.years_override = Some(y);
                } else {
                    eprintln!("error: --years value \"{}\" is not a valid u32", args[i]);
                    process::exit(1);
                }
            }
            "--csv-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --csv-out requires a path argument");
                    process::exit(1);
                }
                cli.csv_out = Some(args[i].clone());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
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

    cli
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = parse_args();

    // Load config: --config takes priority, then --preset, then the PJM default
    let mut config = if let Some(ref path) = cli.config_path {
        match ProjectionConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ProjectionConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ProjectionConfig::pjm_mid_atlantic()
    };

    // Apply horizon override
    if let Some(years) = cli.years_override {
        config.simulation.projection_years = years;
    }

    // Validate
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Resolve and project
    let resolved = match config.resolve() {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };
    let engine = Engine::new(resolved.assumptions);
    let trajectory =
        match engine.project(&resolved.utility, &resolved.datacenter, resolved.projection_years) {
            Ok(trajectory) => trajectory,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        };

    // Print per-year bills for every scenario
    println!(
        "{} ({}), {} MW data center ({:.0}% curtailable when flexible), {}-year horizon",
        resolved.utility.name,
        resolved.utility.market,
        resolved.datacenter.capacity_mw,
        resolved.datacenter.curtailable_fraction() * 100.0,
        resolved.projection_years
    );
    for (scenario, points) in trajectory.iter() {
        println!("\n{scenario}:");
        for point in points {
            println!(
                "  y{:02}  ${:>8.2}/mo  (alloc {:>4.1}%, spillover ${:>6.1}M)",
                point.year,
                point.monthly_bill,
                point.metrics.residential_allocation * 100.0,
                point.metrics.socialized_capacity_cost / 1.0e6,
            );
        }
    }

    // Print summary report
    let summary = Summary::from_trajectory(&trajectory);
    println!("\n{summary}");

    // Baseline escalation split, independent of any new load
    let split = escalation_components(
        resolved.utility.average_monthly_bill,
        &engine.assumptions().rates,
        resolved.projection_years,
    );
    println!(
        "Baseline increase: ${:.2}/mo (inflation ${:.2}, infrastructure ${:.2})",
        split.total_increase, split.inflation_component, split.infrastructure_component
    );
    println!(
        "Implied baseline rate in year {}: {:.1} cents/kWh",
        resolved.projection_years,
        summary.baseline_final_bill / resolved.utility.average_monthly_usage_kwh * 100.0
    );

    // Export CSV if requested
    if let Some(ref path) = cli.csv_out {
        if let Err(e) = export_csv(&trajectory, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Trajectory written to {path}");
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(rate_sim::api::AppState {
            utility_name: resolved.utility.name.clone(),
            market: resolved.utility.market,
            summary,
            trajectory,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(rate_sim::api::serve(state, addr));
    }
}
