use clap::Parser;
use nagare::prelude::*;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Replays editor commands against a saved flow graph
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the graph snapshot JSON file
    graph_path: String,
    /// Optional path to a JSON array of commands to apply in order
    commands_path: Option<String>,

    /// Path to an engine configuration JSON file
    #[arg(short, long)]
    config: Option<String>,

    /// Write the resulting graph snapshot to this path
    #[arg(short, long)]
    output: Option<String>,

    /// Generate predictable ids (`condition-1`, `e1`) for created nodes and edges
    #[arg(long)]
    sequential_ids: bool,

    /// Stop at the first rejected command instead of reporting and continuing
    #[arg(long)]
    strict: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nagare=info,warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    run(cli);
}

fn run(cli: Cli) {
    let total_start = Instant::now();

    // --- 1. Loading ---
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => EngineConfig::default(),
    };
    let snapshot = GraphSnapshot::from_file(&cli.graph_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load graph: {}", e)));
    let commands: Vec<Command> = match &cli.commands_path {
        Some(path) => {
            let json = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read commands file '{}': {}", path, e))
            });
            serde_json::from_str(&json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to parse commands JSON: {}", e))
            })
        }
        None => Vec::new(),
    };

    let mut store = GraphStore::from_snapshot(snapshot, config)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to build graph: {}", e)));
    if cli.sequential_ids {
        store = store.with_id_generator(SequentialIds::default());
    }
    println!(
        "Loaded graph with {} nodes and {} edges",
        store.nodes().len(),
        store.edges().len()
    );

    // --- 2. Applying commands ---
    let mut rejected = 0;
    for (i, command) in commands.into_iter().enumerate() {
        let name = command.name();
        match store.apply(command) {
            Ok(outcome) => {
                println!("\n[{}] {}: {}", i + 1, name, outcome);
                if let Some(report) = outcome.report().filter(|r| !r.is_empty()) {
                    print!("{}", report);
                }
            }
            Err(e) if cli.strict => {
                exit_with_error(&format!("Command {} ({}) rejected: {}", i + 1, name, e))
            }
            Err(e) => {
                rejected += 1;
                println!("\n[{}] {}: rejected: {}", i + 1, name, e);
            }
        }
    }

    // --- 3. Summary ---
    println!(
        "\nFinished in {:?}: {} nodes, {} edges, {} rejected commands",
        total_start.elapsed(),
        store.nodes().len(),
        store.edges().len(),
        rejected
    );

    if let Some(path) = &cli.output {
        store
            .snapshot()
            .save(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write graph: {}", e)));
        println!("Wrote graph to {}", path);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
