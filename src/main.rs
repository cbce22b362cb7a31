use chunkvault::cli::commands::{Cli, Commands};
use chunkvault::domain::entities::vector_record::VectorRecord;
use chunkvault::ChunkVault;
use clap::Parser;
use std::io::Read;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let vault = match ChunkVault::from_env() {
        Ok(vault) => vault,
        Err(e) => {
            eprintln!("Error initializing chunkvault: {e}");
            std::process::exit(1);
        }
    };

    let result = run_command(vault, cli.command).await;
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Logs to stderr so stdout stays machine-readable JSON.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run_command(vault: ChunkVault, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Init => {
            vault.ensure_collection().await?;
            println!("Vector store ready");
        }
        Commands::Upsert { input } => {
            let json = if input.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(&input)?
            };
            let records: Vec<VectorRecord> = serde_json::from_str(&json)?;
            vault.upsert(&records).await?;
            println!("Upserted {} records", records.len());
        }
        Commands::Search {
            vector,
            element_type,
            limit,
        } => {
            let query: Vec<f32> = serde_json::from_str(&vector)?;
            let results = match element_type {
                Some(t) => vault.search_by_type(&query, &t, limit).await?,
                None => vault.search(&query, limit).await?,
            };
            if results.is_empty() && !vault.collection_exists().await {
                tracing::info!("Nothing indexed yet; run the indexer first");
            }
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Clear => {
            vault.clear_collection().await?;
            println!("Collection cleared");
        }
        Commands::Health => {
            let details = vault.health_details().await;
            println!("{}", serde_json::to_string_pretty(&details)?);
            if !details.store_reachable {
                return Err("vector store unreachable".into());
            }
        }
        Commands::Info => {
            let info = vault.collection_info().await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }
    Ok(())
}
