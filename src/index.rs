use anyhow::Result;
use std::collections::HashMap;

use crate::client::TrelloClient;
use crate::model::NameEntry;

/// Id/name lookups for boards and their lists
///
/// Built once per run before any rendering. Lookups never touch the network
/// and answer with an empty string when nothing matches.
#[derive(Debug, Default, Clone)]
pub struct NameIndex {
    boards: Vec<NameEntry>,
    /// Keyed by lowercased board name; boards sharing a name share an entry
    lists: HashMap<String, Vec<NameEntry>>,
    /// Keyed by board id
    board_lists: HashMap<String, Vec<NameEntry>>,
}

impl NameIndex {
    /// Loads every board of `member` and the lists of each board
    pub async fn load(client: &TrelloClient, member: &str) -> Result<Self> {
        let mut index = NameIndex::default();
        for board in client.board_names(member).await? {
            let lists = client.list_names(&board.id).await?;
            index.insert_board(board, lists);
        }
        tracing::info!(boards = index.boards.len(), "name index loaded");
        Ok(index)
    }

    pub fn insert_board(&mut self, board: NameEntry, lists: Vec<NameEntry>) {
        self.lists
            .entry(board.name.to_lowercase())
            .or_default()
            .extend(lists.iter().cloned());
        self.board_lists.insert(board.id.clone(), lists);
        self.boards.push(board);
    }

    pub fn boards(&self) -> &[NameEntry] {
        &self.boards
    }

    /// Lists of the board with this name (case-insensitive)
    pub fn lists_for(&self, board_name: &str) -> &[NameEntry] {
        self.lists
            .get(&board_name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Lists of exactly one board
    pub fn lists_of(&self, board_id: &str) -> &[NameEntry] {
        self.board_lists
            .get(board_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn board_id(&self, board_name: &str) -> &str {
        id_from_name(board_name, &self.boards)
    }

    pub fn board_name(&self, board_id: &str) -> &str {
        name_from_id(board_id, &self.boards)
    }

    /// Resolves board id to board name, then the list id within that board
    pub fn list_name(&self, board_id: &str, list_id: &str) -> &str {
        let board = self.board_name(board_id);
        if board.is_empty() {
            return "";
        }
        name_from_id(list_id, self.lists_for(board))
    }
}

/// Case-insensitive exact match on name
pub fn id_from_name<'a>(name: &str, entries: &'a [NameEntry]) -> &'a str {
    let wanted = name.to_lowercase();
    entries
        .iter()
        .find(|e| e.name.to_lowercase() == wanted)
        .map(|e| e.id.as_str())
        .unwrap_or("")
}

/// Exact match on identifier
pub fn name_from_id<'a>(id: &str, entries: &'a [NameEntry]) -> &'a str {
    entries
        .iter()
        .find(|e| e.id == id)
        .map(|e| e.name.as_str())
        .unwrap_or("")
}

#[cfg(test)]
pub(crate) fn sample_index() -> NameIndex {
    let mut index = NameIndex::default();
    index.insert_board(
        NameEntry::new("b1", "Work"),
        vec![NameEntry::new("l1", "To Do"), NameEntry::new("l2", "Done")],
    );
    index.insert_board(
        NameEntry::new("b2", "Home"),
        vec![NameEntry::new("l3", "Chores")],
    );
    index
}
