//! ReadAgent CLI: the main entry point.
//!
//! Commands:
//! - `read`       Paginate and gist a document into a memory directory
//! - `ask`        Answer questions against a memory (single or interactive)
//! - `show`       Print gists, pages, or paragraphs as interchange text
//! - `import`     Write edited interchange text back into a memory
//! - `config`     Show, locate, or validate the configuration
//! - `providers`  List supported oracle backends

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::show::ShowTarget;

#[derive(Parser)]
#[command(
    name = "readagent",
    about = "ReadAgent: gist memories and page lookup for long documents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Paginate and gist a document
    Read {
        /// Paragraphs as `{"paragraphs": [...]}` JSON, or text split on blank lines
        #[arg(short, long)]
        input: PathBuf,

        /// Directory that receives paragraphs.json, pages.json, and gists.json
        #[arg(short, long)]
        out: PathBuf,

        /// Oracle backend to use instead of the configured default
        #[arg(short, long, env = "READAGENT_PROVIDER")]
        provider: Option<String>,
    },

    /// Ask questions about a document that has been read
    Ask {
        /// Memory directory written by `read`
        #[arg(long)]
        memory: PathBuf,

        /// Ask a single question instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Oracle backend to use instead of the configured default
        #[arg(short, long, env = "READAGENT_PROVIDER")]
        provider: Option<String>,
    },

    /// Print part of a memory as editable interchange text
    Show {
        /// Memory directory
        #[arg(long)]
        memory: PathBuf,

        /// What to print
        #[arg(value_enum)]
        what: ShowTarget,
    },

    /// Replace parts of a memory with edited interchange text
    Import {
        /// Memory directory
        #[arg(long)]
        memory: PathBuf,

        /// Gists text (`0: ...` entries separated by blank lines)
        #[arg(long)]
        gists: Option<PathBuf>,

        /// Pages text (`0: ['...', ...]` entries separated by blank lines)
        #[arg(long)]
        pages: Option<PathBuf>,

        /// Paragraphs text (separated by blank lines)
        #[arg(long)]
        paragraphs: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// List supported oracle backends
    Providers,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Check the configuration for problems
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Read {
            input,
            out,
            provider,
        } => commands::read::run(&input, &out, provider.as_deref()).await?,
        Commands::Ask {
            memory,
            message,
            provider,
        } => commands::ask::run(&memory, message, provider.as_deref()).await?,
        Commands::Show { memory, what } => commands::show::run(&memory, what)?,
        Commands::Import {
            memory,
            gists,
            pages,
            paragraphs,
        } => commands::import::run(
            &memory,
            gists.as_deref(),
            pages.as_deref(),
            paragraphs.as_deref(),
        )?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show()?,
            ConfigAction::Path => commands::config_cmd::path()?,
            ConfigAction::Validate => commands::config_cmd::validate()?,
        },
        Commands::Providers => commands::providers::run()?,
    }

    Ok(())
}
