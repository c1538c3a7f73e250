//! Record shapes returned by the Trello REST API
//!
//! Only the attributes the tool reads are modeled explicitly. Cards and members
//! keep every other attribute in a flattened map so the JSON output can echo the
//! records exactly as the service sent them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Treats an explicit JSON `null` like a missing attribute.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifier/name pair used for boards and lists in the name index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameEntry {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[cfg(test)]
impl NameEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Aggregate counters the service attaches to each card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badges {
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub check_items: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub check_items_checked: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subscribed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub votes: u32,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id_board: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
}

impl Label {
    /// Display name, falling back to the uppercased color for unnamed labels
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            self.color.to_uppercase()
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub desc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub closed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub due: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date_last_activity: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id_attachment_cover: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id_board: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id_list: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id_checklists: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id_labels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id_members: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id_members_voted: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id_short: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<Label>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pos: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subscribed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub badges: Badges,
    /// Attributes not modeled above, kept for the JSON output
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bio: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confirmed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar_hash: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub initials: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub member_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A list as returned by the list creation endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardList {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub closed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id_board: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pos: f64,
}

/// Search endpoint envelope
#[derive(Debug, Default, Deserialize)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentCreator {
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

/// A `commentCard` action on a card
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: CommentData,
    #[serde(default, deserialize_with = "null_as_default")]
    pub member_creator: CommentCreator,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
}

impl CheckItem {
    pub fn is_complete(&self) -> bool {
        self.state == "complete"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub check_items: Vec<CheckItem>,
}
