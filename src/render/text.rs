use anyhow::Result;
use std::io::Write;

use super::{title_case, RenderJob, Renderer};
use crate::model::{Card, Member};
use crate::projection::CHECKLISTS_UNREADABLE;

/// One labeled line per field, checklists inline, records divided by a rule
pub struct TextRenderer;

const DIVIDER: &str = "--------";

impl Renderer for TextRenderer {
    fn cards(&self, cards: &[Card], job: &RenderJob<'_>, out: &mut dyn Write) -> Result<()> {
        let ctx = job.context();
        writeln!(out, "Found {} cards", cards.len())?;
        writeln!(out)?;

        for (row, card) in cards.iter().enumerate() {
            write!(out, "{}", job.number_prefix(row))?;
            let values = job.cards.project(card, &job.fields, &ctx);
            for (field, value) in job.fields.iter().zip(&values) {
                write!(out, "{:<25}: ", title_case(field))?;
                // comments span several lines, start them on their own
                if field.eq_ignore_ascii_case("comments") {
                    writeln!(out)?;
                }
                writeln!(out, "{}", value)?;
            }

            if card.badges.check_items > 0 {
                match job.extras.checklists(&card.id) {
                    Some(Ok(checklists)) => {
                        writeln!(out, "Checklists")?;
                        for checklist in checklists {
                            writeln!(out, "{}", checklist.name)?;
                            for (i, item) in checklist.check_items.iter().enumerate() {
                                write!(out, "{:2}: {}", i + 1, item.name)?;
                                if item.is_complete() {
                                    write!(out, " ✅ (done)")?;
                                }
                                writeln!(out)?;
                            }
                        }
                        writeln!(out)?;
                    }
                    Some(Err(e)) => writeln!(out, "{} {}", CHECKLISTS_UNREADABLE, e)?,
                    None => {}
                }
            }

            writeln!(out, "{}", DIVIDER)?;
        }
        Ok(())
    }

    fn members(
        &self,
        members: &[Member],
        job: &RenderJob<'_>,
        out: &mut dyn Write,
    ) -> Result<()> {
        let ctx = job.context();
        for (row, member) in members.iter().enumerate() {
            write!(out, "{}", job.number_prefix(row))?;
            let values = job.members.project(member, &job.fields, &ctx);
            for (field, value) in job.fields.iter().zip(&values) {
                writeln!(out, "{:<20} : {}", field, value)?;
            }
            write!(out, "{}{}", DIVIDER, job.config.row_sep)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use crate::index::NameIndex;
    use crate::prefetch::{CardExtras, Prefetched};
    use crate::projection::fixtures::{card, checklist, member};
    use crate::render::render_to_string;

    #[test]
    fn test_cards_labeled_lines_and_checklists() {
        let config = RuntimeConfig {
            fields: "name,listname".to_string(),
            ..Default::default()
        };
        let mut extras = Prefetched::default();
        extras.insert(
            "c1",
            CardExtras {
                comments: None,
                checklists: Some(Ok(vec![checklist()])),
            },
        );

        let text = render_to_string(&TextRenderer, &config, &extras, &[card()]);

        let expected = format!(
            "Found 1 cards\n\n{:<25}: Ship release\n{:<25}: Done\nChecklists\nRelease\n 1: Tag ✅ (done)\n 2: Announce\n\n--------\n",
            "Name", "Listname"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_numbering_and_quotes() {
        let config = RuntimeConfig {
            fields: "id".to_string(),
            quote_char: "\"".to_string(),
            number: true,
            ..Default::default()
        };
        let mut second = card();
        second.id = "c2".to_string();
        second.badges.check_items = 0;
        let mut first = card();
        first.badges.check_items = 0;

        let text = render_to_string(
            &TextRenderer,
            &config,
            &Prefetched::default(),
            &[first, second],
        );

        assert!(text.contains(&format!("   0 {:<25}: \"c1\"\n", "Id")));
        assert!(text.contains(&format!("   1 {:<25}: \"c2\"\n", "Id")));
    }

    #[test]
    fn test_checklist_failure_is_shown_inline() {
        let config = RuntimeConfig::default();
        let mut extras = Prefetched::default();
        extras.insert(
            "c1",
            CardExtras {
                comments: None,
                checklists: Some(Err("HTTP Status 404 Not Found".to_string())),
            },
        );

        let text = render_to_string(&TextRenderer, &config, &extras, &[card()]);

        assert!(text
            .contains("[Could not read checklist items for card] HTTP Status 404 Not Found\n"));
        assert!(text.ends_with("--------\n"));
    }

    #[test]
    fn test_members() {
        let config = RuntimeConfig {
            fields: "name,fullname".to_string(),
            ..Default::default()
        };
        let index = NameIndex::default();
        let extras = Prefetched::default();
        let job = RenderJob::new(&config, &index, &extras);
        let mut out = Vec::new();

        TextRenderer.members(&[member()], &job, &mut out).unwrap();

        let expected = format!(
            "{:<20} : ada\n{:<20} : Ada Lovelace\n--------\n",
            "name", "fullname"
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
