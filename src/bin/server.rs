//! memfit
//!
//! HTTP API and terminal front end for the allocation simulator

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use memfit::api::{serve, AppState};
use memfit::{
    compare_with_allocations, parse_size_list, AppConfig, Comparison, Limits, Strategy,
    StrategyReport, Workload,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "memfit")]
#[command(version, about = "Contiguous memory allocation simulator (first, best and worst fit)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve(ServeArgs),

    /// Run a simulation and print the results
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Path to a TOML config file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port number (overrides $PORT)
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// Directory containing the web frontend
    #[arg(long)]
    frontend_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (e.g. "info", "memfit=debug")
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Block sizes in KB, comma separated (e.g. "100,500,200")
    #[arg(short = 'b', long)]
    blocks: String,

    /// Process sizes in KB, comma separated (e.g. "212,417")
    #[arg(short = 'p', long)]
    processes: String,

    /// Strategy to run: first, best, worst or all
    #[arg(short = 's', long, default_value = "all")]
    strategy: String,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_log(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| match EnvFilter::try_new(level) {
            Ok(filter) => Ok(filter),
            Err(e) => {
                eprintln!("invalid log level: {}, using info, err is: {}", level, e);
                EnvFilter::try_new("info")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
    {
        eprintln!("failed to init logger: {}", e);
    }
}

/// Defaults < config file < $PORT < flags
fn resolve_config(args: &ServeArgs) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };

    config.apply_env().context("reading $PORT")?;

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = &args.frontend_dir {
        config.server.frontend_dir = Some(dir.clone());
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

async fn run_server(args: ServeArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    init_log(&config.logging.level);

    info!("Starting memfit server");
    info!(
        "Limits: max_blocks={}, max_processes={}, max_body_bytes={}",
        config.limits.max_blocks, config.limits.max_processes, config.limits.max_body_bytes
    );

    match &config.server.frontend_dir {
        Some(dir) if dir.is_dir() => info!("Serving frontend from {:?}", dir),
        Some(dir) => warn!("Frontend directory {:?} does not exist, serving status only", dir),
        None => info!("No frontend configured, GET / serves status"),
    }

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", listener.local_addr()?);

    let state = Arc::new(AppState::from_config(&config));
    serve(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down...");
    })
    .await?;

    info!("Server stopped");
    Ok(())
}

/// `None` selects every strategy
fn parse_strategy_choice(s: &str) -> Result<Option<Strategy>> {
    if s.trim().eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    Ok(Some(s.parse()?))
}

fn print_comparison(comparison: &Comparison) {
    println!("COMPARISON ({})", comparison.comparison_type);
    println!("Total memory = {} KB", comparison.total_memory);
    println!(
        "{:<10} | {:>9} | {:>13} | {:>11} | {:>11}",
        "Strategy", "Processes", "Allocated KB", "Wasted KB", "Utilization"
    );
    for strategy in Strategy::ALL {
        let stats = comparison.stats(strategy);
        println!(
            "{:<10} | {:>9} | {:>13} | {:>11} | {:>10.2}%",
            strategy.name(),
            stats.allocated_processes,
            stats.allocated_memory,
            stats.wasted_memory,
            stats.utilization_percent
        );
    }
    println!("Best algorithm: {}", comparison.best_algorithm);
}

fn run_simulation(args: SimulateArgs) -> Result<()> {
    init_log(&args.log_level);

    let blocks = parse_size_list(&args.blocks).context("parsing --blocks")?;
    let processes = parse_size_list(&args.processes).context("parsing --processes")?;
    let choice = parse_strategy_choice(&args.strategy)?;

    let workload = Workload::new(blocks, processes, &Limits::unbounded())?;

    println!("====================================================");
    println!("  SIMULATION OF CONTIGUOUS MEMORY ALLOCATION");
    println!("====================================================");

    match choice {
        Some(strategy) => {
            let allocation = strategy.run(workload.blocks().to_vec(), workload.processes());
            let report =
                StrategyReport::new(strategy, workload.blocks(), workload.processes(), &allocation)?;
            println!();
            println!("{}", report);
        }
        None => {
            let (comparison, runs) = compare_with_allocations(&workload);
            for (strategy, allocation) in &runs {
                let report = StrategyReport::new(
                    *strategy,
                    workload.blocks(),
                    workload.processes(),
                    allocation,
                )?;
                println!();
                println!("{}", report);
            }
            println!();
            print_comparison(&comparison);
        }
    }

    println!();
    println!("============= END OF SIMULATION =============");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => run_server(args).await,
        Command::Simulate(args) => run_simulation(args),
    }
}
