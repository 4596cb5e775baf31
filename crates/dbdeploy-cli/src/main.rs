//! dbdeploy CLI - numbered SQL change-script deployment.

use clap::{Parser, Subcommand};
use dbdeploy::history::connect;
use dbdeploy::{
    ChangeHistory, ChangeRepository, Config, DeployError, Deployer, DirectoryScripts,
    EmptyHistory, PgExecutor, PgJournal, ScriptDocument, ScriptIdentity,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Level};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

#[derive(Parser)]
#[command(name = "dbdeploy")]
#[command(about = "Apply numbered SQL change scripts and track them in a journal table")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "dbdeploy.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List change scripts that have not been applied yet
    Pending {
        /// Last change to apply, inclusive (folder/number or number)
        #[arg(long)]
        last_change: Option<String>,
    },

    /// Write one SQL script containing every pending change
    Generate {
        /// Output file [default: stdout]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Last change to apply, inclusive (folder/number or number)
        #[arg(long)]
        last_change: Option<String>,
    },

    /// Execute pending changes against the configured PostgreSQL database
    Apply {
        /// Last change to apply, inclusive (folder/number or number)
        #[arg(long)]
        last_change: Option<String>,
    },

    /// Print the CREATE TABLE statement for the journal table
    JournalDdl,

    /// List journal entries that did not complete successfully
    Failed,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), DeployError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(DeployError::Config)?;

    let config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    let cancel_token = setup_signal_handler().await?;

    match cli.command {
        Commands::Pending { last_change } => {
            let cap = resolve_cap(&config, last_change.as_deref())?;
            let deployer = build_deployer(&config, history_for(&config).await?)?;
            let reconciliation = deployer.pending(cap.as_ref()).await?;

            if cli.output_json {
                let pending: Vec<String> = reconciliation
                    .pending
                    .iter()
                    .map(|p| p.script.display_name())
                    .collect();
                println!("{}", serde_json::to_string_pretty(&pending)?);
            } else {
                for pending in &reconciliation.pending {
                    let marker = if pending.is_rerun() { " (rerun)" } else { "" };
                    println!("{}{}", pending.script.display_name(), marker);
                }
            }
        }
        Commands::Generate { output, last_change } => {
            if cli.output_json && output.is_none() {
                return Err(DeployError::Config(
                    "--output-json with generate requires --output".into(),
                ));
            }

            let cap = resolve_cap(&config, last_change.as_deref())?;
            let deployer = build_deployer(&config, history_for(&config).await?)?;
            let mut document = ScriptDocument::new(deployer.renderer().delimiter().clone());
            let report = deployer
                .run(&mut document, cap.as_ref(), &cancel_token)
                .await?;

            match output {
                Some(path) => {
                    write_document(&path, document.as_str())?;
                    info!("Wrote {} changes to {:?}", report.scripts_applied.len(), path);
                }
                None => print!("{}", document.as_str()),
            }

            if cli.output_json {
                println!("{}", report.to_json()?);
            }
        }
        Commands::Apply { last_change } => {
            let conn = config.connection.as_ref().ok_or_else(|| {
                DeployError::Config("apply requires a connection section".into())
            })?;

            let cap = resolve_cap(&config, last_change.as_deref())?;
            let client = connect(conn).await?;
            let journal = PgJournal::new(client.clone(), config.renderer()?.journal_table());
            let create_table = config.create_journal_table && !journal.exists().await?;

            let deployer = build_deployer(&config, Arc::new(journal))?
                .with_journal_creation(create_table);
            let mut executor = PgExecutor::new(client, deployer.renderer().delimiter().clone());
            let report = deployer
                .run(&mut executor, cap.as_ref(), &cancel_token)
                .await?;

            if cli.output_json {
                println!("{}", report.to_json()?);
            } else {
                println!("Applied {} change scripts", report.scripts_applied.len());
            }
        }
        Commands::JournalDdl => {
            println!("{}", config.renderer()?.render_journal_ddl()?);
        }
        Commands::Failed => {
            let deployer = build_deployer(&config, history_for(&config).await?)?;
            let failed = deployer.repository().failed_changes().await?;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&failed)?);
            } else if failed.is_empty() {
                println!("No failed changes");
            } else {
                for entry in &failed {
                    println!(
                        "{} {} [{:?}] {}",
                        entry.identity,
                        entry.name,
                        entry.status,
                        entry.output.as_deref().unwrap_or("")
                    );
                }
            }
        }
    }

    Ok(())
}

/// Version cap from the command line, falling back to the configuration.
fn resolve_cap(config: &Config, flag: Option<&str>) -> Result<Option<ScriptIdentity>, DeployError> {
    match flag {
        Some(value) => Ok(Some(value.parse()?)),
        None => config.last_change(),
    }
}

/// Journal reader for the configured target, or none when offline.
async fn history_for(config: &Config) -> Result<Arc<dyn ChangeHistory>, DeployError> {
    match config.connection {
        Some(ref conn) => {
            let client = connect(conn).await?;
            let table = config.renderer()?.journal_table().to_string();
            Ok(Arc::new(PgJournal::new(client, table)))
        }
        None => {
            warn!("No connection configured; treating every script as unapplied");
            Ok(Arc::new(EmptyHistory::new()))
        }
    }
}

fn build_deployer(
    config: &Config,
    history: Arc<dyn ChangeHistory>,
) -> Result<Deployer, DeployError> {
    let repository = ChangeRepository::new(
        Arc::new(DirectoryScripts::new(&config.scripts_dir)),
        history,
    );
    Ok(Deployer::new(repository, config.renderer()?)
        .with_journal_creation(config.create_journal_table))
}

fn write_document(path: &Path, text: &str) -> Result<(), DeployError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;
    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Generated SQL goes to stdout, so logs stay on stderr.
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        "json" => subscriber.json().init(),
        "text" => subscriber.init(),
        other => return Err(format!("Unknown log format '{}' (expected text or json)", other)),
    }

    Ok(())
}

/// Setup signal handlers for graceful shutdown.
/// Handles both SIGINT (Ctrl-C) and SIGTERM.
/// Returns a CancellationToken that will be cancelled when a signal is received.
#[cfg(unix)]
async fn setup_signal_handler() -> Result<CancellationToken, DeployError> {
    let cancel_token = CancellationToken::new();

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    let token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv() => eprintln!("\nReceived SIGINT. Stopping after the current script..."),
            _ = sigterm.recv() => eprintln!("\nReceived SIGTERM. Stopping after the current script..."),
        }
        token.cancel();
    });

    Ok(cancel_token)
}

/// Setup signal handler for Windows (only Ctrl-C)
#[cfg(not(unix))]
async fn setup_signal_handler() -> Result<CancellationToken, DeployError> {
    let cancel_token = CancellationToken::new();
    let token = cancel_token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nReceived Ctrl-C. Stopping after the current script...");
            token.cancel();
        }
    });

    Ok(cancel_token)
}
