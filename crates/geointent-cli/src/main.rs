use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use geointent_dispatch::IntentCatalogue;
use geointent_grammar::parse_query;
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "geointent")]
#[command(about = "Compile spatial search requests into query intents")]
#[command(version)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a request and print its query intent as JSON
    Compile {
        /// Request text, e.g. "cafes within 10 minutes of Oakland"
        #[arg(required = true)]
        text: Vec<String>,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Check an intent catalogue file and list its intents
    Catalogue {
        /// Catalogue file (.yaml, .yml or .json)
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Compile { text, pretty } => run_compile(&text.join(" "), pretty)?,
        Commands::Catalogue { path } => run_catalogue(path)?,
    }

    Ok(())
}

fn run_compile(text: &str, pretty: bool) -> anyhow::Result<()> {
    debug!("Compiling request: {}", text);
    let parsed = parse_query(text).with_context(|| format!("could not compile '{}'", text))?;

    let json = if pretty {
        serde_json::to_string_pretty(&parsed)?
    } else {
        serde_json::to_string(&parsed)?
    };
    println!("{}", json);
    Ok(())
}

fn run_catalogue(path: PathBuf) -> anyhow::Result<()> {
    let catalogue = IntentCatalogue::load_from_file(&path)
        .with_context(|| format!("failed to load catalogue {}", path.display()))?;
    catalogue.validate_shape()?;

    println!(
        "Catalogue {} is valid: {} intents",
        path.display(),
        catalogue.len()
    );
    for entry in &catalogue.intents {
        println!(
            "  {:<24} {:<14} {}",
            entry.name, entry.parser, entry.description
        );
    }
    Ok(())
}
