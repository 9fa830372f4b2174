use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod core;
mod error;
mod models;

use commands::{init_project, run_generate, run_session, show_modifiers, show_styles, GenerateOptions};
use models::{ModelVersion, Mood, Scene};

/// Threadsmith - Gemini-powered Threads post generator
#[derive(Parser)]
#[command(name = "threadsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a batch of posts from the given selectors
    Generate {
        /// Mood baseline
        #[arg(short, long, value_enum, default_value = "cynical")]
        mood: Mood,

        /// Life scene
        #[arg(short, long, value_enum, default_value = "work")]
        scene: Scene,

        /// Text model tier
        #[arg(long, value_enum, default_value = "flash")]
        model: ModelVersion,

        /// Keyword that must appear verbatim (repeatable, max 5)
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,

        /// Posts per generation (4 or 8)
        #[arg(long)]
        count: Option<usize>,

        /// Override the request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the prompt and schema without calling the provider
        #[arg(long)]
        dry_run: bool,

        /// Emit the raw post list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive session: selectors, editing, scheduling, visuals
    Session,

    /// List selectable moods, scenes, visual styles and models
    Styles {
        /// Also print the full style/mood modifier tables
        #[arg(long)]
        modifiers: bool,
    },

    /// Write a starter threadsmith.toml
    Init {
        /// Project directory (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::Generate {
            mood,
            scene,
            model,
            keywords,
            count,
            timeout,
            dry_run,
            json,
        } => {
            let project_root = std::env::current_dir().unwrap();
            let options = GenerateOptions {
                mood,
                scene,
                model,
                keywords,
                count,
                timeout,
                dry_run,
                json,
            };
            run_generate(&project_root, options).await
        }

        Commands::Session => {
            let project_root = std::env::current_dir().unwrap();
            run_session(&project_root).await
        }

        Commands::Styles { modifiers } => {
            if modifiers {
                show_modifiers()
            } else {
                show_styles()
            }
        }

        Commands::Init { path } => {
            let project_root = path.unwrap_or_else(|| std::env::current_dir().unwrap());
            init_project(&project_root)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
