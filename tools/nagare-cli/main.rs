use clap::Parser;
use nagare::prelude::*;
use std::fs;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Compiles a JSON process definition into an executable process model
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the process definition JSON file
    process_path: String,

    /// Write the compiled model to this file (bincode)
    #[arg(short, long)]
    output: Option<String>,

    /// Write the process metadata to this file (JSON) instead of stdout
    #[arg(short, long)]
    metadata: Option<String>,

    /// Only known process ids may be called from call activities
    #[arg(long = "known-process", value_name = "ID")]
    known_processes: Vec<String>,

    /// Only known rule units may be bound by rule-set nodes
    #[arg(long = "known-rule-unit", value_name = "UNIT")]
    known_rule_units: Vec<String>,

    /// Do not print the instruction listing
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    if let Err(e) = run(cli) {
        exit_with_error(&e.to_string());
    }
}

fn run(cli: Cli) -> Result<()> {
    let total_start = Instant::now();

    // --- 1. Loading ---
    let json = fs::read_to_string(&cli.process_path)
        .map_err(|e| format!("Failed to read process file '{}': {}", cli.process_path, e))?;
    let process = ProcessDefinition::from_json(&json)?;
    info!(process_id = %process.id, nodes = process.nodes.len(), "loaded process definition");

    // --- 2. Compilation ---
    let mut builder = ProcessCompiler::builder();
    if !cli.known_processes.is_empty() {
        builder = builder.with_process_catalog(cli.known_processes);
    }
    if !cli.known_rule_units.is_empty() {
        builder = builder.with_rule_unit_catalog(cli.known_rule_units);
    }
    let compiler = builder.build();

    let compile_start = Instant::now();
    let artifacts = compiler.compile(&process)?;
    let compile_duration = compile_start.elapsed();

    // --- 3. Output ---
    if !cli.quiet {
        println!("{}", Listing(&artifacts.model));
    }

    let metadata_json = serde_json::to_string_pretty(&artifacts.metadata)?;
    match &cli.metadata {
        Some(path) => {
            fs::write(path, metadata_json)?;
            info!(path = %path, "wrote process metadata");
        }
        None => println!("{}", metadata_json),
    }

    if let Some(path) = &cli.output {
        artifacts.model.save(path)?;
        info!(path = %path, "wrote compiled model");
    }

    println!("\n--- Compilation Summary ---");
    println!("Instructions:         {}", artifacts.model.instructions.len());
    println!("Work Items:           {}", artifacts.metadata.work_items.len());
    println!("Signals:              {}", artifacts.metadata.signals.len());
    println!("Triggers:             {}", artifacts.metadata.triggers.len());
    println!("Sub-Processes:        {}", artifacts.metadata.sub_processes.len());
    println!("Startable:            {}", artifacts.metadata.startable);
    println!("-----------------------------");
    println!("Compilation:          {:?}", compile_duration);
    println!("Total Execution:      {:?}", total_start.elapsed());
    Ok(())
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
