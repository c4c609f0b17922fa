//! Worker Bootstrap
//!
//! Resolves the environment of a stream-processing worker and starts it.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI (--environment, --check-host, --env-file, --config)
//!    │
//!    ▼
//!  ┌───────────────────────────────────────────────────────────────┐
//!  │                        BOOTSTRAP                               │
//!  │                                                                │
//!  │  process env ──▶ Environ (read keys are frozen)                │
//!  │                    │                                           │
//!  │                    ├──◀ vault: AppID login, secret/{env}/…     │
//!  │                    ├──◀ defaults: ENVIRONMENT, APP_WEB_*        │
//!  │                    │                                           │
//!  │  .env ──────────▶ Config (env ▶ file ▶ default, typed casts)   │
//!  │                    │                                           │
//!  │                    ├──◀ discovery: KAFKA_MANAGER_URL → KAFKA_URL│
//!  │                    │                                           │
//!  │  --check-host ──▶ liveness: TCP connect, exponential backoff   │
//!  │                    │                                           │
//!  │                    ▼                                           │
//!  │                 Settings                                       │
//!  └────────────────────┬──────────────────────────────────────────┘
//!                       ▼
//!              worker process (resolved environ)
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use worker_bootstrap::config::loader::load_or_default;
use worker_bootstrap::health::HostSpec;
use worker_bootstrap::lifecycle::{Bootstrap, BootstrapError, BootstrapOptions, Profile, WorkerCommand};
use worker_bootstrap::observability::logging::{crate_directive, init_logging, LogFormat};
use worker_bootstrap::Environ;

#[derive(Parser)]
#[command(name = "worker-bootstrap", version)]
#[command(about = "Resolve configuration, inject secrets and start the stream worker", long_about = None)]
struct Cli {
    /// Environment in which to run the application
    #[arg(short, long, default_value = "local", global = true)]
    environment: String,

    /// Check if a host is alive before starting (repeatable)
    #[arg(long = "check-host", value_name = "HOST[:PORT]", global = true)]
    check_host: Vec<HostSpec>,

    /// KEY=VALUE override file
    #[arg(long, default_value = ".env", global = true)]
    env_file: PathBuf,

    /// Bootstrap configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run production
    Start {
        /// Extra arguments passed to the worker
        #[arg(last = true)]
        worker_args: Vec<String>,
    },
    /// Run development
    Development {
        /// Extra arguments passed to the worker
        #[arg(last = true)]
        worker_args: Vec<String>,
    },
    /// Run the bootstrap and print the resolved settings without starting the worker
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (format, level) = match cli.command {
        Commands::Start { .. } => (LogFormat::Json, "info"),
        Commands::Development { .. } => (LogFormat::Pretty, "debug"),
        Commands::Check => (LogFormat::Pretty, "info"),
    };
    init_logging(format, &crate_directive(level));

    tracing::info!("worker-bootstrap v{} starting", env!("CARGO_PKG_VERSION"));

    let code = run(cli).await.inspect_err(|e| {
        tracing::error!(error = %e, "Bootstrap failed");
    })?;

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<i32, BootstrapError> {
    let config = load_or_default(cli.config.as_deref())?;
    let options = BootstrapOptions {
        environment: cli.environment,
        env_file: cli.env_file,
        check_hosts: cli.check_host,
    };

    let bootstrap = Bootstrap::new(config.clone(), options);
    let prepared = bootstrap.prepare(Environ::from_process()).await?;

    let (profile, worker_args) = match cli.command {
        Commands::Start { worker_args } => (Profile::Production, worker_args),
        Commands::Development { worker_args } => (Profile::Development, worker_args),
        Commands::Check => {
            println!("{:#?}", prepared.settings);
            println!("vault: {:?}", prepared.injection);
            println!("discovery: {:?}", prepared.discovery);
            for report in &prepared.liveness {
                if let Some(last) = report.attempts.last() {
                    println!(
                        "host {}:{} alive after {} attempt(s) in {:?}",
                        last.host, last.port, last.attempt, report.elapsed
                    );
                }
            }
            return Ok(0);
        }
    };

    let command = WorkerCommand::build(profile, &config.worker, &prepared.settings, &worker_args);
    Ok(command.launch(&prepared.environ).await?)
}
