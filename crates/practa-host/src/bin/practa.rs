//! practa - validate packages, browse the catalog, and run simulated Flows

use anyhow::{bail, Context};
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use practa_core::{CompletionSink, PractaOutput};
use practa_flow::{FlowEngine, FlowHandle};
use practa_host::{simulation_registry, FlowRunner, HostConfig, CONFIG_ENV};
use practa_registry::{FlowOverrides, PractaRegistry};
use practa_storage::{
    JsonFileBackend, MemoryBackend, StaticIdentity, StorageBackend, StorageManager, UserId,
};
use practa_validator::{PackageSource, SubmissionValidator};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "practa", version, about = "Practa package and Flow tooling")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a package directory (index.tsx + metadata.json)
    Validate {
        /// Package directory
        dir: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List known unit types
    Catalog {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run a Flow of builtin types with simulated units
    Simulate {
        /// Unit types, in order
        #[arg(required = true)]
        types: Vec<String>,
        /// Flow name
        #[arg(long, default_value = "Simulated flow")]
        name: String,
        /// Persist unit storage to this JSON file instead of memory
        #[arg(long)]
        store: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct OutputArgs {
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

/// Logs each completed unit
struct LogSink;

#[async_trait]
impl CompletionSink for LogSink {
    async fn persist_completed_unit(&self, output: &PractaOutput, unit_type: &str) {
        tracing::info!(
            unit_type,
            rice = output.rice_earned(),
            has_content = output.content.is_some(),
            "unit completed"
        );
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = HostConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Validate { dir, output } => validate(&config, &dir, output),
        Command::Catalog { output } => catalog(output),
        Command::Simulate {
            types,
            name,
            store,
            output,
        } => simulate(&config, &name, &types, store, output).await,
    }
}

fn validate(config: &HostConfig, dir: &std::path::Path, output: OutputArgs) -> anyhow::Result<ExitCode> {
    let package = PackageSource::load_dir(dir)?;
    let report = SubmissionValidator::new(config.validator.clone()).validate(&package);

    if output.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for result in report.results() {
            println!("{result}");
        }
        println!(
            "{}: {} error(s), {} warning(s)",
            if report.is_valid() { "valid" } else { "invalid" },
            report.error_count(),
            report.warning_count()
        );
    }

    Ok(if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn catalog(output: OutputArgs) -> anyhow::Result<ExitCode> {
    let registry = simulation_registry();
    let listing = registry.listing();

    if output.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        for entry in &listing {
            println!(
                "{:<20} {:<22} {}",
                entry.practa_type,
                entry.name,
                entry.description.as_deref().unwrap_or("")
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn simulate(
    config: &HostConfig,
    name: &str,
    types: &[String],
    store: Option<PathBuf>,
    output: OutputArgs,
) -> anyhow::Result<ExitCode> {
    let registry: Arc<PractaRegistry> = Arc::new(simulation_registry());
    let types: Vec<&str> = types.iter().map(String::as_str).collect();
    let definition = registry.create_flow(name, &types, FlowOverrides::default())?;

    let backend: Arc<dyn StorageBackend> = match store {
        Some(path) => Arc::new(
            JsonFileBackend::open(&path)
                .with_context(|| format!("opening store {}", path.display()))?,
        ),
        None => Arc::new(MemoryBackend::new()),
    };
    let storage = StorageManager::new(
        backend,
        Arc::new(StaticIdentity::new(UserId::anonymous("practa-cli"))),
    )
    .with_limits(config.storage);

    let engine = FlowEngine::new(config.engine.clone()).with_storage(storage);
    let runner = FlowRunner::new(registry, engine, Arc::new(LogSink), config.runner.clone());
    let handle = runner.run(definition).await?;

    if handle.journal().verify_integrity().is_err() {
        bail!("journal failed verification");
    }
    print_run(&handle, output)?;
    Ok(ExitCode::SUCCESS)
}

fn print_run(handle: &FlowHandle, output: OutputArgs) -> anyhow::Result<()> {
    let state = handle.state();
    if output.json {
        let body = serde_json::json!({
            "state": state,
            "journalHead": handle.journal().head(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("flow    {} ({})", handle.definition().name, state.flow_id());
    println!("status  {}", state.status());
    println!(
        "steps   {}/{} ({} skipped)",
        state.current_index(),
        handle.definition().len(),
        state.skipped_indices().len()
    );
    println!("rice    {}", state.rice_earned());
    for (step, output) in handle.definition().practas.iter().zip(state.practa_outputs()) {
        let text = output.content.as_ref().map_or("-", |c| c.value());
        println!("  {:<20} {text}", step.practa_type);
    }
    if let Some(head) = handle.journal().head() {
        println!("journal {} entries, head {head}", handle.journal().len());
    }
    Ok(())
}
