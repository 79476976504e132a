use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use node_packages::{
    config::Config,
    model::Manager,
    output::{print_result, OutputFormat},
    scanner::{get_scanner, Scanner},
    Orchestrator,
};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
}

#[derive(Parser)]
#[command(name = "node-packages")]
#[command(
    author,
    version,
    about = "List JavaScript packages found in package manager caches"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan package manager caches
    Scan {
        /// Only scan one manager (npm, pnpm, yarn, bun, deno)
        #[arg(short, long)]
        manager: Option<Manager>,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Scan managers one after another
        #[arg(long)]
        no_parallel: bool,
    },

    /// List managers and the cache roots they would scan
    ListManagers,

    /// Show the config file
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Print the default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Commands) -> Result<u8> {
    match command {
        Commands::Scan {
            manager,
            format,
            no_parallel,
        } => {
            let config = Config::load()?;
            let format_str = format.unwrap_or_else(|| config.default_format.clone());
            let parallel = !no_parallel && config.parallel;
            run_scan(&config, manager, format_str, parallel).await
        }
        Commands::ListManagers => {
            list_managers(&Config::load()?)?;
            Ok(exit_codes::SUCCESS)
        }
        Commands::Config { path, default } => {
            handle_config(path, default)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

async fn run_scan(
    config: &Config,
    manager: Option<Manager>,
    format: String,
    parallel: bool,
) -> Result<u8> {
    let format = OutputFormat::from_str(&format).map_err(|e| anyhow::anyhow!(e))?;
    let is_interactive = format == OutputFormat::Table;

    let scanners: Vec<Box<dyn Scanner>> = match manager {
        Some(m) => vec![get_scanner(m)],
        None => config.scanners(),
    };

    let mut orchestrator = Orchestrator::new(scanners)
        .with_extra_roots(config.extra_roots()?)
        .parallel(parallel);

    let progress = if is_interactive {
        let pb = ProgressBar::new(orchestrator.scanner_count() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Scanning caches...");
        let handle = pb.clone();
        orchestrator = orchestrator.on_manager_done(move |_| handle.inc(1));
        Some(pb)
    } else {
        None
    };

    let mut inventory = orchestrator.run().await;

    if let Some(pb) = progress {
        pb.finish_with_message(format!("Found {} packages", inventory.records.len()));
    }

    let before = inventory.records.len();
    inventory.retain_records(|r| !config.ignore.should_ignore_package(r.name()));
    debug!(ignored = before - inventory.records.len(), "applied ignore list");

    print_result(&inventory, format)?;

    Ok(exit_codes::SUCCESS)
}

fn list_managers(config: &Config) -> Result<()> {
    println!("Available managers:");
    println!();

    let orchestrator =
        Orchestrator::new(config.scanners()).with_extra_roots(config.extra_roots()?);

    for (manager, roots) in orchestrator.roots() {
        let scanner = get_scanner(manager);
        println!("  {:<8} {}", manager.as_str(), scanner.name());
        if roots.is_empty() {
            println!("  {:<8} (no home directory)", "");
        }
        for root in roots {
            let found = if root.exists() { "found" } else { "missing" };
            println!("  {:<8} {:<8} {}", "", found, root.display());
        }
        println!();
    }

    Ok(())
}

fn handle_config(show_path: bool, show_default: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if show_default {
        print!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!(
            "Run 'node-packages config --default > {}' to create one.",
            config_path.display()
        );
    }

    Ok(())
}
