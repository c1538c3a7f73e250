mod client;
mod commands;
mod config;
mod error;
mod index;
mod model;
mod prefetch;
mod projection;
mod query;
mod render;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use tracing_subscriber::EnvFilter;

use crate::client::{TrelloClient, DEFAULT_API_BASE};
use crate::config::{Credentials, OutputSettings, RuntimeConfig};
use crate::index::NameIndex;

#[derive(Parser)]
#[command(name = "tres")]
#[command(about = "Trello search for the command line")]
#[command(after_help = "Environment: TRELLO_KEY and TRELLO_TOKEN are required, \
TRELLO_USER defaults to \"me\". Exits with status 1 if anything goes wrong.")]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,
    /// Log requests and progress to stderr
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Column separator for result columns
    #[arg(long, global = true)]
    colsep: Option<String>,
    /// Row separator for result lines
    #[arg(long, global = true)]
    rowsep: Option<String>,
    /// Quote string wrapped around every column value
    #[arg(long, global = true)]
    quotechar: Option<String>,
    /// Comma-separated list of result field names
    #[arg(long, global = true)]
    fields: Option<String>,
    /// Output format: text | csv | json | markdown | excel
    #[arg(long, global = true)]
    format: Option<String>,
    /// Maximum number of cards to retrieve
    #[arg(long, global = true)]
    limit: Option<usize>,
    /// Prefix each record with its row number
    #[arg(long, global = true)]
    number: bool,
    /// Write a header row in excel output (true | false)
    #[arg(long, global = true, value_name = "BOOL")]
    sheet_header: Option<bool>,
}

impl OutputArgs {
    fn settings(&self) -> OutputSettings {
        OutputSettings {
            colsep: self.colsep.clone(),
            rowsep: self.rowsep.clone(),
            quotechar: self.quotechar.clone(),
            fields: self.fields.clone(),
            format: self.format.clone(),
            limit: self.limit,
            number: self.number.then_some(true),
            sheet_header: self.sheet_header,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search cards with a literal query or a query file
    Search {
        /// Trello search query, or the path of a file containing one
        query: String,
    },
    /// List the members of a board
    Members {
        /// Board name (case-insensitive)
        board: String,
    },
    /// List every board with its lists
    Boards,
    /// Create a list on a board
    Addlist {
        /// Board name (case-insensitive)
        board: String,
        /// Name of the new list
        name: String,
        /// Position: top, bottom or a number
        #[arg(long, default_value = "bottom")]
        pos: String,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tres=debug")
    } else {
        EnvFilter::try_from_env("TRES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let file = config::load_config()?;
    let config = RuntimeConfig::default()
        .merged(&file.output)
        .merged(&cli.output.settings());

    let client = TrelloClient::new(DEFAULT_API_BASE, Credentials::from_env()?)?;
    let index = NameIndex::load(&client, client.user()).await?;

    let mut out = std::io::BufWriter::new(std::io::stdout().lock());
    match cli.command {
        Commands::Search { query } => {
            commands::search(&client, &index, config, &query, &mut out).await?;
        }
        Commands::Members { board } => {
            commands::members(&client, &index, config, &board, &mut out).await?;
        }
        Commands::Boards => {
            commands::boards(&index, &config, &mut out)?;
        }
        Commands::Addlist { board, name, pos } => {
            commands::add_list(&client, &index, &config, &board, &name, &pos, &mut out).await?;
        }
    }
    out.flush()?;

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
