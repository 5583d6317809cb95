use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "seatmap")]
#[command(about = "Seatmap CLI - pick tables for a group meal session", long_about = None)]
struct Cli {
    /// Config file (defaults to <config_dir>/seatmap/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the table regions of a layout file
    Tables {
        /// SVG layout file
        file: PathBuf,
    },
    /// Show the add/remove diff between two table lists
    Diff {
        /// Desired tables, comma separated
        #[arg(long, value_delimiter = ',')]
        selected: Vec<String>,
        /// Persisted tables, comma separated
        #[arg(long, value_delimiter = ',')]
        baseline: Vec<String>,
    },
    /// Load a session and print its seating-map status
    Show {
        session: String,
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a session's layout with its tables marked
    Render {
        session: String,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Set the tables of a session and save
    Select {
        session: String,
        /// Table id to select; repeat for several, omit to clear
        #[arg(short, long = "table")]
        tables: Vec<String>,
    },
    /// End a session
    End { session: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Tables { file } => commands::offline::tables(&file)?,
        Commands::Diff { selected, baseline } => commands::offline::diff(&selected, &baseline),
        Commands::Show { session, json } => commands::session::show(config, &session, json).await?,
        Commands::Render { session, output } => {
            commands::session::render(config, &session, output.as_deref()).await?
        }
        Commands::Select { session, tables } => {
            commands::session::select(config, &session, &tables).await?
        }
        Commands::End { session } => commands::session::end(config, &session).await?,
    }

    Ok(())
}
