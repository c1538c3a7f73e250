//! Field projection: field name -> string value, per record
//!
//! Each record kind has a table mapping a lowercase field name to an extractor.
//! Unknown names project to an empty string. Quoting is applied uniformly after
//! extraction, so composite values and error placeholders are quoted too.

use std::collections::HashMap;

use crate::index::NameIndex;
use crate::model::{Card, Member};
use crate::prefetch::Prefetched;

pub const COMMENTS_UNREADABLE: &str = "[Could not read comments for card]";
pub const CHECKLISTS_UNREADABLE: &str = "[Could not read checklist items for card]";

/// Everything an extractor may consult besides the record itself
#[derive(Clone, Copy)]
pub struct ProjectionContext<'a> {
    pub index: &'a NameIndex,
    pub extras: &'a Prefetched,
    pub quote: &'a str,
    /// Replace newlines in free-text fields with a literal `\n`
    pub escape_newlines: bool,
}

impl<'a> ProjectionContext<'a> {
    pub fn new(index: &'a NameIndex, extras: &'a Prefetched, quote: &'a str) -> Self {
        Self {
            index,
            extras,
            quote,
            escape_newlines: false,
        }
    }

    pub fn unquoted(self) -> Self {
        Self { quote: "", ..self }
    }

    pub fn escaping_newlines(self) -> Self {
        Self {
            escape_newlines: true,
            ..self
        }
    }

    fn free_text(&self, text: &str) -> String {
        if self.escape_newlines {
            escape_newlines(text)
        } else {
            text.to_string()
        }
    }
}

pub type Extractor<R> = fn(&R, &ProjectionContext<'_>) -> String;

/// Lookup table from field name to extractor for one record kind
pub struct FieldTable<R> {
    extractors: HashMap<&'static str, Extractor<R>>,
}

impl<R> FieldTable<R> {
    pub fn new(entries: &[(&'static str, Extractor<R>)]) -> Self {
        Self {
            extractors: entries.iter().copied().collect(),
        }
    }

    pub fn knows(&self, field: &str) -> bool {
        self.extractors.contains_key(normalize(field).as_str())
    }

    /// Unquoted value of one field; unknown fields give an empty string
    pub fn extract(&self, record: &R, field: &str, ctx: &ProjectionContext<'_>) -> String {
        self.extractors
            .get(normalize(field).as_str())
            .map(|extract| extract(record, ctx))
            .unwrap_or_default()
    }

    /// One value per requested field, same order, quoted if configured
    pub fn project(
        &self,
        record: &R,
        fields: &[String],
        ctx: &ProjectionContext<'_>,
    ) -> Vec<String> {
        fields
            .iter()
            .map(|field| quote(self.extract(record, field, ctx), ctx.quote))
            .collect()
    }
}

fn normalize(field: &str) -> String {
    field.trim().to_lowercase()
}

fn quote(value: String, quote: &str) -> String {
    if quote.is_empty() {
        value
    } else {
        format!("{quote}{value}{quote}")
    }
}

pub fn escape_newlines(text: &str) -> String {
    text.replace('\n', "\\n")
}

const CARD_FIELDS: &[(&str, Extractor<Card>)] = &[
    ("id", |c, _| c.id.clone()),
    ("attachmentcount", |c, _| c.badges.attachments.to_string()),
    ("checked", |c, _| {
        format!("{}/{}", c.badges.check_items_checked, c.badges.check_items)
    }),
    ("commentcount", |c, _| c.badges.comments.to_string()),
    ("hasdesc", |c, _| c.badges.description.to_string()),
    ("closed", |c, _| c.closed.to_string()),
    ("datelastactivity", |c, _| c.date_last_activity.clone()),
    ("desc", |c, ctx| ctx.free_text(&c.desc)),
    ("due", |c, _| c.due.clone()),
    ("email", |c, _| c.email.clone()),
    ("idattachmentcover", |c, _| c.id_attachment_cover.clone()),
    ("idboard", |c, _| c.id_board.clone()),
    ("idchecklists", |c, _| c.id_checklists.join(",")),
    ("idlabels", |c, _| c.id_labels.join(",")),
    ("idlist", |c, _| c.id_list.clone()),
    ("idmembers", |c, _| c.id_members.join(",")),
    ("idmembersvoted", |c, _| c.id_members_voted.join(",")),
    ("idshort", |c, _| c.id_short.to_string()),
    ("labels", |c, _| {
        c.labels
            .iter()
            .map(|l| format!("[{}]", l.display_name()))
            .collect::<Vec<_>>()
            .join(" ")
    }),
    ("labelcolors", |c, _| {
        c.labels
            .iter()
            .map(|l| format!("[{}]", l.color.to_uppercase()))
            .collect::<Vec<_>>()
            .join(" ")
    }),
    ("listname", |c, ctx| {
        ctx.index.list_name(&c.id_board, &c.id_list).to_string()
    }),
    ("boardname", |c, ctx| ctx.index.board_name(&c.id_board).to_string()),
    ("name", |c, _| c.name.clone()),
    ("pos", |c, _| c.pos.to_string()),
    ("shortlink", |c, _| c.short_link.clone()),
    ("shorturl", |c, _| c.short_url.clone()),
    ("subscribed", |c, _| c.subscribed.to_string()),
    ("url", |c, _| c.url.clone()),
    ("comments", comments),
    ("checklistitems", checklist_items),
];

const MEMBER_FIELDS: &[(&str, Extractor<Member>)] = &[
    ("id", |m, _| m.id.clone()),
    ("idmember", |m, _| m.id.clone()),
    ("url", |m, _| m.url.clone()),
    ("avatarhash", |m, _| m.avatar_hash.clone()),
    ("bio", |m, _| escape_newlines(&m.bio)),
    ("confirmed", |m, _| m.confirmed.to_string()),
    ("fullname", |m, _| m.full_name.clone()),
    ("initials", |m, _| m.initials.clone()),
    ("membertype", |m, _| m.member_type.clone()),
    ("status", |m, _| m.status.clone()),
    ("name", |m, _| m.username.clone()),
];

pub fn card_fields() -> FieldTable<Card> {
    FieldTable::new(CARD_FIELDS)
}

pub fn member_fields() -> FieldTable<Member> {
    FieldTable::new(MEMBER_FIELDS)
}

/// `@user on date: text` per comment, one per line
fn comments(card: &Card, ctx: &ProjectionContext<'_>) -> String {
    if card.badges.comments == 0 {
        return String::new();
    }
    match ctx.extras.comments(&card.id) {
        Some(Ok(comments)) => comments
            .iter()
            .map(|c| {
                format!(
                    "@{} on {}: {}\n",
                    c.member_creator.username,
                    c.date,
                    escape_newlines(&c.data.text)
                )
            })
            .collect(),
        Some(Err(e)) => format!("{} {}", COMMENTS_UNREADABLE, e),
        None => String::new(),
    }
}

/// `checklist: n. item` per check item, ` (done)` when complete
fn checklist_items(card: &Card, ctx: &ProjectionContext<'_>) -> String {
    if card.badges.check_items == 0 {
        return String::new();
    }
    match ctx.extras.checklists(&card.id) {
        Some(Ok(checklists)) => {
            let mut out = String::new();
            for checklist in checklists {
                for (i, item) in checklist.check_items.iter().enumerate() {
                    out.push_str(&format!(
                        "{}: {}. {}",
                        checklist.name,
                        i + 1,
                        escape_newlines(&item.name)
                    ));
                    if item.is_complete() {
                        out.push_str(" (done)");
                    }
                    out.push('\n');
                }
            }
            out
        }
        Some(Err(e)) => format!("{} {}", CHECKLISTS_UNREADABLE, e),
        None => String::new(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::model::{Badges, Card, CheckItem, Checklist, Comment, Label, Member};

    pub fn card() -> Card {
        Card {
            id: "c1".to_string(),
            name: "Ship release".to_string(),
            desc: "line one\nline two".to_string(),
            id_board: "b1".to_string(),
            id_list: "l2".to_string(),
            date_last_activity: "2024-03-01T10:00:00.000Z".to_string(),
            short_url: "https://trello.com/c/abc".to_string(),
            labels: vec![
                Label {
                    name: "Urgent".to_string(),
                    color: "red".to_string(),
                    ..Default::default()
                },
                Label {
                    color: "green".to_string(),
                    ..Default::default()
                },
            ],
            badges: Badges {
                check_items: 3,
                check_items_checked: 1,
                comments: 2,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn comment(user: &str, date: &str, text: &str) -> Comment {
        let mut comment = Comment {
            date: date.to_string(),
            ..Default::default()
        };
        comment.member_creator.username = user.to_string();
        comment.data.text = text.to_string();
        comment
    }

    pub fn checklist() -> Checklist {
        Checklist {
            name: "Release".to_string(),
            check_items: vec![
                CheckItem {
                    name: "Tag".to_string(),
                    state: "complete".to_string(),
                    ..Default::default()
                },
                CheckItem {
                    name: "Announce".to_string(),
                    state: "incomplete".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    pub fn member() -> Member {
        Member {
            id: "m1".to_string(),
            username: "ada".to_string(),
            full_name: "Ada Lovelace".to_string(),
            bio: "first\nprogrammer".to_string(),
            confirmed: true,
            member_type: "normal".to_string(),
            ..Default::default()
        }
    }
}
