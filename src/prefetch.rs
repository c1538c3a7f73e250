//! Secondary fetches done before rendering
//!
//! Comments and checklists are pulled per card up front so that projection and
//! rendering stay pure. A failed fetch is kept as its error message; it never
//! aborts the run.

use std::collections::HashMap;

use crate::client::TrelloClient;
use crate::model::{Card, Checklist, Comment};
use crate::render::Format;

/// Which secondary records a render pass needs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchPlan {
    pub comments: bool,
    pub checklists: bool,
}

impl FetchPlan {
    pub fn for_cards(format: Format, fields: &[String]) -> Self {
        let wants = |name: &str| fields.iter().any(|f| f.eq_ignore_ascii_case(name));
        match format {
            Format::Json => FetchPlan::default(),
            Format::Markdown => FetchPlan {
                comments: true,
                checklists: true,
            },
            Format::Text => FetchPlan {
                comments: wants("comments"),
                checklists: true,
            },
            Format::Csv | Format::Excel => FetchPlan {
                comments: wants("comments"),
                checklists: wants("checklistitems"),
            },
        }
    }
}

pub type Fetched<T> = Result<Vec<T>, String>;

#[derive(Debug, Default, Clone)]
pub struct CardExtras {
    pub comments: Option<Fetched<Comment>>,
    pub checklists: Option<Fetched<Checklist>>,
}

/// Secondary records keyed by card id
#[derive(Debug, Default, Clone)]
pub struct Prefetched {
    cards: HashMap<String, CardExtras>,
}

impl Prefetched {
    pub fn get(&self, card_id: &str) -> Option<&CardExtras> {
        self.cards.get(card_id)
    }

    pub fn comments(&self, card_id: &str) -> Option<&Fetched<Comment>> {
        self.get(card_id).and_then(|e| e.comments.as_ref())
    }

    pub fn checklists(&self, card_id: &str) -> Option<&Fetched<Checklist>> {
        self.get(card_id).and_then(|e| e.checklists.as_ref())
    }

    pub fn insert(&mut self, card_id: &str, extras: CardExtras) {
        self.cards.insert(card_id.to_string(), extras);
    }
}

/// Fetches what `plan` asks for, skipping cards whose badge counters are zero
pub async fn prefetch(client: &TrelloClient, cards: &[Card], plan: FetchPlan) -> Prefetched {
    let mut prefetched = Prefetched::default();
    for card in cards {
        let mut extras = CardExtras::default();
        if plan.comments && card.badges.comments > 0 {
            extras.comments = Some(degrade(
                &card.id,
                "comments",
                client.card_comments(&card.id).await,
            ));
        }
        if plan.checklists && card.badges.check_items > 0 {
            extras.checklists = Some(degrade(
                &card.id,
                "checklists",
                client.card_checklists(&card.id).await,
            ));
        }
        if extras.comments.is_some() || extras.checklists.is_some() {
            prefetched.insert(&card.id, extras);
        }
    }
    prefetched
}

fn degrade<T>(card_id: &str, what: &str, result: anyhow::Result<Vec<T>>) -> Fetched<T> {
    result.map_err(|e| {
        tracing::warn!(card = card_id, error = %e, "could not read {}", what);
        e.to_string()
    })
}
