use std::env;
use std::path::PathBuf;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use medrag::db::ingest::{parse_concepts, parse_descriptions, parse_relationships};
use medrag::db::GraphIngestor;
use medrag::{GraphClient, MedRagConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("medrag=info".parse()?),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut concepts_path = PathBuf::from("data/Nodes.txt");
    let mut descriptions_path = PathBuf::from("data/Description.txt");
    let mut relationships_path = PathBuf::from("data/Relationships.txt");
    let mut indexes_only = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--concepts" | "-c" => {
                if i + 1 < args.len() {
                    concepts_path = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--descriptions" | "-d" => {
                if i + 1 < args.len() {
                    descriptions_path = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--relationships" | "-r" => {
                if i + 1 < args.len() {
                    relationships_path = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--indexes-only" => indexes_only = true,
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = MedRagConfig::from_env();
    let client = GraphClient::connect(
        &config.neo4j_uri,
        &config.neo4j_user,
        &config.neo4j_password,
        config.graph_row_limit,
    )
    .await?;

    let ingestor = GraphIngestor::new(client);
    ingestor.create_indexes().await?;

    if indexes_only {
        return Ok(());
    }

    let concepts = parse_concepts(&concepts_path)?;
    let descriptions = parse_descriptions(&descriptions_path)?;
    let relationships = parse_relationships(&relationships_path)?;

    let loaded = ingestor.load_concepts(&concepts).await?;
    tracing::info!("{} concepts loaded", loaded);

    let loaded = ingestor.load_descriptions(&descriptions).await?;
    tracing::info!("{} descriptions loaded", loaded);

    let loaded = ingestor.load_relationships(&relationships).await?;
    tracing::info!("{} relationships loaded", loaded);

    Ok(())
}

fn print_help() {
    println!("medrag-ingest - load ontology release files into the knowledge graph");
    println!();
    println!("Usage: medrag-ingest [options]");
    println!("  -c, --concepts <path>        concepts file (default data/Nodes.txt)");
    println!("  -d, --descriptions <path>    descriptions file (default data/Description.txt)");
    println!("  -r, --relationships <path>   relationships file (default data/Relationships.txt)");
    println!("      --indexes-only           create indexes and exit");
    println!();
    println!("Connection comes from MEDRAG_NEO4J_URI / _USER / _PASSWORD.");
}
