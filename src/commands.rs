use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::client::TrelloClient;
use crate::config::RuntimeConfig;
use crate::error::TresError;
use crate::index::NameIndex;
use crate::prefetch::{prefetch, FetchPlan, Prefetched};
use crate::query;
use crate::render::{Format, RenderJob};

/// Reads the query from `target` if it names a file, otherwise uses it as is
fn load_query(target: &str) -> Result<String> {
    let path = Path::new(target);
    if path.is_file() {
        std::fs::read_to_string(path)
            .with_context(|| format!("Could not load query: {:?}", path))
    } else {
        Ok(target.to_string())
    }
}

/// Searches cards and renders them
pub async fn search(
    client: &TrelloClient,
    index: &NameIndex,
    config: RuntimeConfig,
    target: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let prepared = query::preprocess(&load_query(target)?, config)?;
    let config = prepared.config;
    let format: Format = config.format.parse()?;

    let cards = client
        .search_cards(&prepared.query, config.limit)
        .await
        .context("Error searching for cards")?;
    tracing::info!(count = cards.len(), query = %prepared.query, "search finished");

    let plan = FetchPlan::for_cards(format, &config.field_list());
    let extras = prefetch(client, &cards, plan).await;
    let job = RenderJob::new(&config, index, &extras);
    for field in job.fields.iter().filter(|f| !job.cards.knows(f)) {
        tracing::debug!(%field, "unknown card field, projecting empty values");
    }
    format
        .renderer()
        .cards(&cards, &job, out)
        .context("Error writing search result")
}

/// Lists the members of a board
pub async fn members(
    client: &TrelloClient,
    index: &NameIndex,
    config: RuntimeConfig,
    board: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let format: Format = config.format.parse()?;
    let board_id = resolve_board(index, board)?;
    let members = client.board_members(board_id).await?;
    tracing::info!(count = members.len(), board, "board members fetched");

    let extras = Prefetched::default();
    let job = RenderJob::new(&config, index, &extras);
    for field in job.fields.iter().filter(|f| !job.members.knows(f)) {
        tracing::debug!(%field, "unknown member field, projecting empty values");
    }
    format.renderer().members(&members, &job, out)
}

/// Prints every board and its lists from the name index
pub fn boards(index: &NameIndex, config: &RuntimeConfig, out: &mut dyn Write) -> Result<()> {
    let format: Format = config.format.parse()?;
    if matches!(format, Format::Excel | Format::Markdown | Format::Json) {
        return Err(TresError::UnsupportedFormat {
            format: format.name().to_string(),
            command: "boards",
        }
        .into());
    }

    let sep = &config.col_sep;
    for board in index.boards() {
        writeln!(out, "Board{sep}{}{sep}{}", board.name, board.id)?;
        for list in index.lists_of(&board.id) {
            writeln!(out, "List{sep}{}{sep}{}", list.name, list.id)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Creates a list on a board and prints it
pub async fn add_list(
    client: &TrelloClient,
    index: &NameIndex,
    config: &RuntimeConfig,
    board: &str,
    name: &str,
    pos: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let board_id = resolve_board(index, board)?;
    let list = client
        .create_list(board_id, name, pos)
        .await
        .with_context(|| format!("Could not create list '{}'", name))?;
    let sep = &config.col_sep;
    writeln!(out, "List{sep}{}{sep}{}", list.name, list.id)?;
    Ok(())
}

fn resolve_board<'a>(index: &'a NameIndex, board: &str) -> Result<&'a str> {
    let id = index.board_id(board);
    if id.is_empty() {
        return Err(TresError::UnknownBoard(board.to_string()).into());
    }
    Ok(id)
}
