//! docent CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use docent::{
    chunk::SectionChunker,
    commands::{
        cmd_ask, cmd_ingest_repo, cmd_init, cmd_search, cmd_status, print_answer,
        print_ingest_stats, print_search_results, print_status, AskOptions,
    },
    config::Config,
    error::{Error, Result},
    llm::ModelClient,
    store::QdrantEngine,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "docent")]
#[command(version, about = "Repository documentation Q&A over a vector index", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize docent configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Download a repository's docs, chunk them, and index the sections
    Ingest {
        /// Repository slug in the form owner/name
        repo: String,

        /// Branch to snapshot (defaults to the configured branch)
        #[arg(short, long)]
        branch: Option<String>,
    },

    /// Ask a question about the indexed documentation
    Ask {
        /// The question to answer
        question: String,

        /// Number of sections retrieved for grounding
        #[arg(short, long)]
        k: Option<usize>,

        /// Override the configured answer model
        #[arg(long)]
        model: Option<String>,
    },

    /// Search the indexed sections directly
    Search {
        /// The search query
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show system status
    Status,

    /// Manage Qdrant vector database
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Database management actions
#[derive(Subcommand)]
enum DbAction {
    /// Initialize/create the Qdrant collection
    Init,

    /// Show Qdrant collection status
    Status,

    /// Reset the collection (delete all vectors and recreate)
    Reset {
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle init command specially (doesn't need existing config)
    if let Commands::Init { force } = cli.command {
        let base_dir = cli.config.as_deref().and_then(|p| {
            if p.extension().map_or(false, |e| e == "toml") {
                p.parent().map(PathBuf::from)
            } else {
                Some(p.to_path_buf())
            }
        });
        let config = cmd_init(base_dir, force).await?;

        println!("✓ docent initialized successfully");
        println!("  Config: {}", config.paths.config_file.display());
        println!("\nNext steps:");
        println!("  1. Edit the config file to customize settings");
        println!("  2. Export your model API key: export {}=...", config.model.api_key_env);
        println!("  3. Start Qdrant: docker run -p 6334:6334 qdrant/qdrant");
        println!("  4. Ingest docs: docent ingest owner/name");
        return Ok(());
    }

    // Handle completions command (doesn't need config/store)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "docent", &mut std::io::stdout());
        return Ok(());
    }

    // Load configuration
    let config = load_config(cli.config.as_deref())?;

    // Composition root: credentials are resolved here, never inside components
    let model_client = Arc::new(ModelClient::new(&config.model, config.model.api_key())?);
    let engine = QdrantEngine::connect(&config, Arc::clone(&model_client)).await?;

    match cli.command {
        Commands::Init { .. } | Commands::Completions { .. } => unreachable!(),

        Commands::Ingest { repo, branch } => {
            let (owner, name) = repo.split_once('/').ok_or_else(|| {
                Error::Config(format!("Invalid repo slug '{}': expected owner/name", repo))
            })?;

            let chunker =
                SectionChunker::new(Arc::clone(&model_client), config.model.chunk_model.clone());
            let stats =
                cmd_ingest_repo(&config, &engine, &chunker, owner, name, branch.as_deref())
                    .await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                let branch = branch.as_deref().unwrap_or(&config.fetch.default_branch);
                print_ingest_stats(&repo, branch, &stats);
            }
        }

        Commands::Ask { question, k, model } => {
            let options = AskOptions { k, model };
            let answer = cmd_ask(
                &config,
                Arc::clone(&model_client),
                &engine,
                &question,
                options,
            )
            .await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                print_answer(&answer);
            }
        }

        Commands::Search { query, limit } => {
            let output = cmd_search(&config, &engine, &query, limit).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_search_results(&output);
            }
        }

        Commands::Status => {
            let status = cmd_status(&config, &engine).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
        }

        Commands::Db { action } => {
            handle_db_action(&engine, action, cli.json).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_config_path);

    if !config_path.exists() {
        eprintln!(
            "Config file not found: {}\nRun 'docent init' first.",
            config_path.display()
        );
        return Err(Error::NotInitialized);
    }

    Config::load(&config_path)
}

async fn handle_db_action(engine: &QdrantEngine, action: DbAction, json: bool) -> Result<()> {
    match action {
        DbAction::Init => {
            engine.ensure_collection().await?;
            if json {
                println!(r#"{{"status": "ok", "message": "Collection initialized"}}"#);
            } else {
                println!("✓ Qdrant collection initialized");
            }
        }
        DbAction::Status => match engine.collection_info().await? {
            Some(info) => {
                if json {
                    println!(
                        r#"{{"exists": true, "points_count": {}, "indexed_vectors_count": {}, "status": "{}"}}"#,
                        info.points_count, info.indexed_vectors_count, info.status
                    );
                } else {
                    println!("Qdrant Collection Status:");
                    println!("  Status: {}", info.status);
                    println!("  Points: {}", info.points_count);
                    println!("  Indexed Vectors: {}", info.indexed_vectors_count);
                }
            }
            None => {
                if json {
                    println!(r#"{{"exists": false}}"#);
                } else {
                    println!("Collection does not exist. Run 'docent db init' to create it.");
                }
            }
        },
        DbAction::Reset { yes } => {
            if !yes {
                eprintln!("⚠️  This will delete ALL indexed data!");
                eprintln!("Run with --yes to confirm.");
                std::process::exit(1);
            }
            engine.reset_collection().await?;
            if json {
                println!(r#"{{"status": "ok", "message": "Collection reset"}}"#);
            } else {
                println!("✓ Qdrant collection reset (all data deleted and collection recreated)");
            }
        }
    }

    Ok(())
}
