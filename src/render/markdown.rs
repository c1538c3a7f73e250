use anyhow::Result;
use std::io::Write;

use super::{title_case, RenderJob, Renderer};
use crate::model::{Card, Member};
use crate::projection::{escape_newlines, CHECKLISTS_UNREADABLE, COMMENTS_UNREADABLE};

/// One document section per record
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    fn card_section(card: &Card, job: &RenderJob<'_>) -> Vec<String> {
        let mut lines = vec![format!("# {}", card.name.trim())];

        let badges: String = card
            .labels
            .iter()
            .map(|label| {
                let name = if label.name.is_empty() {
                    format!("[{}]", label.color.to_uppercase())
                } else {
                    label.name.clone()
                };
                format!(
                    "<span style=\"background-color: {};\">{}</span> ",
                    label.color, name
                )
            })
            .collect();
        lines.push(badges);
        lines.push(String::new());
        lines.push("## Description".to_string());
        lines.push(escape_newlines(&card.desc));

        if card.badges.comments > 0 {
            match job.extras.comments(&card.id) {
                Some(Ok(comments)) => {
                    lines.push(String::new());
                    lines.push("## Card Comments".to_string());
                    for comment in comments {
                        lines.push(String::new());
                        lines.push(format!(
                            "### {} from @{}",
                            comment.date, comment.member_creator.username
                        ));
                        lines.push(String::new());
                        lines.push(comment.data.text.clone());
                        lines.push(String::new());
                    }
                }
                Some(Err(e)) => lines.push(format!("{} {}", COMMENTS_UNREADABLE, e)),
                None => {}
            }
        }

        if card.badges.check_items > 0 {
            match job.extras.checklists(&card.id) {
                Some(Ok(checklists)) => {
                    lines.push(String::new());
                    lines.push("## Checklists".to_string());
                    for checklist in checklists {
                        lines.push(format!("### {}", checklist.name));
                        for item in &checklist.check_items {
                            let mut line = format!(" 1. {}", item.name);
                            if item.is_complete() {
                                line.push_str(" &#x2705; (done)");
                            }
                            lines.push(line);
                        }
                    }
                    lines.push(String::new());
                }
                Some(Err(e)) => lines.push(format!("{} {}", CHECKLISTS_UNREADABLE, e)),
                None => {}
            }
        }

        lines.push("## Card Info".to_string());
        lines.push(format!(" * last activity on {}", card.date_last_activity));
        if !card.due.is_empty() {
            lines.push(format!(" * due on {}", card.due));
        }
        lines.push(format!(
            " * card shortUrl [{}]({})",
            card.short_url, card.short_url
        ));
        lines.push(format!(" * board {}", job.index.board_name(&card.id_board)));
        lines.push(format!(
            " * list {}",
            job.index.list_name(&card.id_board, &card.id_list)
        ));
        lines.push(String::new());
        lines.push(String::new());
        lines
    }
}

impl Renderer for MarkdownRenderer {
    fn cards(&self, cards: &[Card], job: &RenderJob<'_>, out: &mut dyn Write) -> Result<()> {
        for card in cards {
            write!(
                out,
                "{}{}",
                Self::card_section(card, job).join("\n"),
                job.config.row_sep
            )?;
        }
        Ok(())
    }

    fn members(
        &self,
        members: &[Member],
        job: &RenderJob<'_>,
        out: &mut dyn Write,
    ) -> Result<()> {
        let ctx = job.context().escaping_newlines();
        for member in members {
            writeln!(out, "## {}", member.full_name)?;
            writeln!(out)?;
            let values = job.members.project(member, &job.fields, &ctx);
            for (field, value) in job.fields.iter().zip(&values) {
                writeln!(out, " * {}: {}", title_case(field), value)?;
            }
            write!(out, "{}", job.config.row_sep)?;
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
    use crate::projection::fixtures::{card, checklist, comment, member};
    use crate::render::render_to_string;

    fn extras() -> Prefetched {
        let mut extras = Prefetched::default();
        extras.insert(
            "c1",
            CardExtras {
                comments: Some(Ok(vec![comment("ada", "2024-01-02", "ship it")])),
                checklists: Some(Ok(vec![checklist()])),
            },
        );
        extras
    }

    #[test]
    fn test_card_section() {
        let md = render_to_string(
            &MarkdownRenderer,
            &RuntimeConfig::default(),
            &extras(),
            &[card()],
        );

        assert!(md.starts_with("# Ship release\n"));
        assert!(md.contains(
            "<span style=\"background-color: red;\">Urgent</span> <span style=\"background-color: green;\">[GREEN]</span> \n"
        ));
        assert!(md.contains("## Description\nline one\\nline two\n"));
        assert!(md.contains("## Card Comments\n\n### 2024-01-02 from @ada\n\nship it\n"));
        assert!(md.contains("### Release\n 1. Tag &#x2705; (done)\n 1. Announce\n"));
        assert!(md.contains(
            " * card shortUrl [https://trello.com/c/abc](https://trello.com/c/abc)\n"
        ));
        assert!(md.contains(" * board Work\n * list Done\n"));
        assert!(!md.contains("due on"));
    }

    #[test]
    fn test_failed_secondary_fetches_are_placeholders() {
        let mut extras = Prefetched::default();
        extras.insert(
            "c1",
            CardExtras {
                comments: Some(Err("timed out".to_string())),
                checklists: Some(Err("timed out".to_string())),
            },
        );

        let md = render_to_string(&MarkdownRenderer, &RuntimeConfig::default(), &extras, &[card()]);

        assert!(md.contains("[Could not read comments for card] timed out\n"));
        assert!(md.contains("[Could not read checklist items for card] timed out\n"));
        assert!(md.contains("## Card Info\n"));
    }

    #[test]
    fn test_members() {
        let config = RuntimeConfig {
            fields: "name,bio".to_string(),
            ..Default::default()
        };
        let index = NameIndex::default();
        let extras = Prefetched::default();
        let job = RenderJob::new(&config, &index, &extras);
        let mut out = Vec::new();

        MarkdownRenderer.members(&[member()], &job, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "## Ada Lovelace\n\n * Name: ada\n * Bio: first\\nprogrammer\n\n"
        );
    }
}
