//! Docgraph CLI - turn documents into knowledge graphs

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use docgraph_core::Error;
use docgraph_core::config::Config;
use docgraph_core::domain::knowledge::{
    AnalysisResult, EntityExtractor, KnowledgeEngine, decode_text,
};
use tracing::{debug, info};


#[derive(Parser)]
#[command(name = "docgraph")]
#[command(author, version, about = "Extract knowledge graphs from text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json); `analyze` defaults to json
    #[arg(long, global = true)]
    format: Option<OutputFormat>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a document into a knowledge graph with insights
    Analyze {
        /// Input file (`-` or omitted reads stdin)
        file: Option<PathBuf>,
        /// Skip external enrichment even when an API key is configured
        #[arg(long)]
        offline: bool,
        /// Seed for cluster edge sampling (reproducible graphs)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print follow-up questions for a document
    Questions {
        /// Input file (`-` or omitted reads stdin)
        file: Option<PathBuf>,
        /// Skip external enrichment even when an API key is configured
        #[arg(long)]
        offline: bool,
    },

    /// Print the entity candidates found in a document
    Entities {
        /// Input file (`-` or omitted reads stdin)
        file: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let level = if cli.quiet { "docgraph=warn" } else { "docgraph=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{}", render_error(&e));
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Analyze {
            file,
            offline,
            seed,
        } => {
            let format = cli.format.unwrap_or(OutputFormat::Json);
            cmd_analyze(file.as_deref(), offline, seed, format).await
        }

        Commands::Questions { file, offline } => {
            let format = cli.format.unwrap_or(OutputFormat::Text);
            cmd_questions(file.as_deref(), offline, format).await
        }

        Commands::Entities { file } => {
            let format = cli.format.unwrap_or(OutputFormat::Text);
            cmd_entities(file.as_deref(), format)
        }

        Commands::Config { action } => cmd_config(action, cli.quiet),
    }
}

/// Error message with its code and a fix hint when the cause is a core error
fn render_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<Error>() {
        Some(core) => {
            let mut message = format!("Error [{}]: {}", core.code(), core);
            if let Some(suggestion) = core.suggestion() {
                message.push_str(&format!("\nSuggestion: {}", suggestion));
            }
            message
        }
        None => format!("Error: {:#}", error),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_analyze(
    file: Option<&Path>,
    offline: bool,
    seed: Option<u64>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if seed.is_some() {
        config.graph.seed = seed;
    }
    let engine = build_engine(&config, offline)?;

    let input = read_input(file)?;
    let result = engine.analyze_bytes(&input).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_analysis(&result),
    }
    Ok(())
}

async fn cmd_questions(
    file: Option<&Path>,
    offline: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let engine = build_engine(&config, offline)?;

    let input = read_input(file)?;
    let text = decode_text(&input)?;
    let questions = engine.generate_follow_up_questions(text).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&questions)?),
        OutputFormat::Text => {
            for (i, question) in questions.iter().enumerate() {
                println!("{}. {}", i + 1, question);
            }
        }
    }
    Ok(())
}

fn cmd_entities(file: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
    let input = read_input(file)?;
    let text = decode_text(&input)?;

    let mut entities = EntityExtractor::new().extract(text).into_vec();
    entities.sort();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entities)?),
        OutputFormat::Text => {
            for entity in &entities {
                println!("{}", entity);
            }
        }
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn build_engine(config: &Config, offline: bool) -> anyhow::Result<KnowledgeEngine> {
    let engine = KnowledgeEngine::from_config(config)?;
    if offline {
        debug!("Enrichment disabled by --offline");
        return Ok(engine.without_lookup());
    }
    if !engine.is_enrichment_enabled() {
        info!("No Knowledge Graph API key configured, using local analysis");
    }
    Ok(engine)
}

/// Read the whole input; `None` and `-` mean stdin
fn read_input(file: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        _ => {
            let mut buffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn print_analysis(result: &AnalysisResult) {
    if let Some(summary) = &result.summary {
        println!("{}", summary);
    }
    println!("Source: {}", result.metadata.source);
    println!();

    println!("Nodes ({}):", result.graph.nodes.len());
    for node in &result.graph.nodes {
        println!(
            "  {:<30} {:<14} size {:>4.1}  cluster {}",
            node.label, node.node_type, node.size, node.cluster
        );
    }
    println!();

    println!("Edges ({}):", result.graph.edges.len());
    for edge in &result.graph.edges {
        println!(
            "  {} -- {} ({}, {:.1})",
            edge.source, edge.target, edge.relationship, edge.weight
        );
    }
    println!();

    if !result.insights.clusters.is_empty() {
        println!("Clusters:");
        for cluster in &result.insights.clusters {
            println!("  {}: {}", cluster.label, cluster.concepts.join(", "));
        }
        println!();
    }

    println!("Questions:");
    for question in &result.insights.questions {
        println!("  - {}", question);
    }
    println!();

    println!("Gaps:");
    for gap in &result.insights.gaps {
        println!("  - {}", gap);
    }
}
