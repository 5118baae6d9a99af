//! Film Cards CLI
//!
//! Commands: films, card, render
//! Outputs JSON (or markup for `card`) to stdout, logs to stderr
//! Returns 1 on load errors, 2 on render failure

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filmcards_core::{Catalog, FilmCard, PageRenderer, RenderConfig};

#[derive(Parser)]
#[command(name = "filmcards-cli")]
#[command(about = "Film Cards CLI - render film development tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the film dataset (JSON object keyed by film name)
    #[arg(short, long, default_value = "data/films.json")]
    data: PathBuf,

    /// Path to a render config (JSON); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List films in the dataset
    Films,

    /// Render a single film card element
    Card {
        /// Film name as it appears in the dataset
        #[arg(short, long)]
        film: String,
    },

    /// Render the full page
    Render {
        /// Write the page here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn error_json(message: String) -> String {
    serde_json::json!({ "success": false, "error": message }).to_string()
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filmcards_core=info,filmcards_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match RenderConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                println!("{}", error_json(format!("Failed to load config: {}", e)));
                return ExitCode::FAILURE;
            }
        },
        None => RenderConfig::default(),
    };

    let catalog = match Catalog::load_from_file(&cli.data) {
        Ok(c) => c,
        Err(e) => {
            println!("{}", error_json(format!("Failed to load dataset: {}", e)));
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(path = %cli.data.display(), films = catalog.len(), "dataset loaded");

    let renderer = match PageRenderer::new(config) {
        Ok(r) => r,
        Err(e) => {
            println!("{}", error_json(e.to_string()));
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Films => {
            let films: Vec<_> = catalog
                .iter()
                .map(|f| serde_json::json!({
                    "name": f.name,
                    "image": f.image,
                    "box_iso": f.box_iso,
                    "developments": f.developments.len(),
                }))
                .collect();

            match serde_json::to_string_pretty(&films) {
                Ok(out) => {
                    println!("{}", out);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    println!("{}", error_json(e.to_string()));
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Card { film } => {
            let entry = match catalog.get(&film) {
                Some(e) => e,
                None => {
                    println!("{}", error_json(format!("Film not found: {}", film)));
                    return ExitCode::FAILURE;
                }
            };

            match FilmCard::from_entry(entry) {
                Ok(card) => {
                    print!("{}", card.render_element(renderer.config()));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    println!("{}", error_json(e.to_string()));
                    ExitCode::from(2)
                }
            }
        }

        Commands::Render { output } => {
            let (document, report) = match renderer.render_page(&catalog) {
                Ok(r) => r,
                Err(e) => {
                    println!("{}", error_json(e.to_string()));
                    return ExitCode::from(2);
                }
            };

            match output {
                Some(path) => {
                    if let Err(e) = fs::write(&path, &document) {
                        println!("{}", error_json(format!("Failed to write {}: {}", path.display(), e)));
                        return ExitCode::FAILURE;
                    }
                    tracing::info!(path = %path.display(), bytes = document.len(), "page written");
                    let out = serde_json::json!({ "success": true, "report": report });
                    println!("{}", serde_json::to_string_pretty(&out).unwrap_or_else(|e| error_json(e.to_string())));
                }
                None => print!("{}", document),
            }

            if report.failures.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
    }
}
