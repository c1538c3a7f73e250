use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;
use std::borrow::Cow;
use std::io::Write;

use super::{title_case, RenderJob, Renderer};
use crate::model::{Card, Member};
use crate::projection::FieldTable;

/// A single-sheet xlsx workbook written as binary
///
/// Cell boundaries replace quoting, so the quote character is ignored here.
/// Member listings get a header row by default and card listings do not;
/// `sheet_header` overrides both.
pub struct ExcelRenderer;

const SHEET_NAME: &str = "Sheet1";

/// Most characters a single xlsx cell holds
const CELL_LIMIT: usize = 32_767;
const TRUNCATED: &str = " [truncated]";

/// Cuts `value` on a char boundary so it fits one cell, marking the cut
fn cell_text(value: &str) -> Cow<'_, str> {
    if value.chars().count() <= CELL_LIMIT {
        return Cow::Borrowed(value);
    }
    tracing::warn!(
        chars = value.chars().count(),
        "cell value too long for xlsx, truncating"
    );
    let keep = CELL_LIMIT - TRUNCATED.chars().count();
    let mut cut: String = value.chars().take(keep).collect();
    cut.push_str(TRUNCATED);
    Cow::Owned(cut)
}

/// Cell text for every row of the sheet
pub(crate) fn sheet_rows<R>(
    table: &FieldTable<R>,
    records: &[R],
    job: &RenderJob<'_>,
    header_by_default: bool,
) -> Vec<Vec<String>> {
    let ctx = job.context().unquoted();
    let mut rows = Vec::with_capacity(records.len() + 1);
    if job.config.sheet_header.unwrap_or(header_by_default) {
        rows.push(job.fields.iter().map(|f| title_case(f)).collect());
    }
    rows.extend(
        records
            .iter()
            .map(|record| table.project(record, &job.fields, &ctx)),
    );
    rows
}

fn write_workbook(rows: &[Vec<String>], out: &mut dyn Write) -> Result<()> {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet.write_string(r as u32, c as u16, &*cell_text(value))?;
            }
        }
    }
    let buffer = workbook
        .save_to_buffer()
        .context("Failed to build workbook")?;
    out.write_all(&buffer)?;
    Ok(())
}

impl Renderer for ExcelRenderer {
    fn cards(&self, cards: &[Card], job: &RenderJob<'_>, out: &mut dyn Write) -> Result<()> {
        write_workbook(&sheet_rows(&job.cards, cards, job, false), out)
    }

    fn members(
        &self,
        members: &[Member],
        job: &RenderJob<'_>,
        out: &mut dyn Write,
    ) -> Result<()> {
        write_workbook(&sheet_rows(&job.members, members, job, true), out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use crate::index::sample_index;
    use crate::prefetch::{CardExtras, Prefetched};
    use crate::projection::fixtures::{card, comment, member};

    fn quoted_config(sheet_header: Option<bool>) -> RuntimeConfig {
        RuntimeConfig {
            fields: "name,listname".to_string(),
            quote_char: "\"".to_string(),
            sheet_header,
            ..Default::default()
        }
    }

    #[test]
    fn test_cards_have_no_header_by_default_and_no_quotes() {
        let config = quoted_config(None);
        let index = sample_index();
        let extras = Prefetched::default();
        let job = RenderJob::new(&config, &index, &extras);

        let rows = sheet_rows(&job.cards, &[card()], &job, false);

        assert_eq!(rows, vec![vec!["Ship release".to_string(), "Done".to_string()]]);
    }

    #[test]
    fn test_members_have_header_by_default() {
        let config = RuntimeConfig {
            fields: "name,fullname".to_string(),
            ..Default::default()
        };
        let index = sample_index();
        let extras = Prefetched::default();
        let job = RenderJob::new(&config, &index, &extras);

        let rows = sheet_rows(&job.members, &[member()], &job, true);

        assert_eq!(rows[0], vec!["Name", "Fullname"]);
        assert_eq!(rows[1], vec!["ada", "Ada Lovelace"]);
    }

    #[test]
    fn test_header_setting_overrides_default() {
        let config = quoted_config(Some(true));
        let index = sample_index();
        let extras = Prefetched::default();
        let job = RenderJob::new(&config, &index, &extras);

        let rows = sheet_rows(&job.cards, &[card()], &job, false);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["Name", "Listname"]);
    }

    #[test]
    fn test_writes_xlsx_container() {
        let config = quoted_config(None);
        let index = sample_index();
        let extras = Prefetched::default();
        let job = RenderJob::new(&config, &index, &extras);
        let mut out = Vec::new();

        ExcelRenderer.cards(&[card()], &job, &mut out).unwrap();

        assert!(out.starts_with(b"PK"));
    }

    #[test]
    fn test_cell_text_fits_cell_limit() {
        assert_eq!(cell_text("short"), "short");

        let long = "é".repeat(CELL_LIMIT + 10);
        let cut = cell_text(&long);
        assert_eq!(cut.chars().count(), CELL_LIMIT);
        assert!(cut.ends_with(TRUNCATED));
    }

    #[test]
    fn test_oversized_comments_still_write_workbook() {
        let config = RuntimeConfig {
            fields: "name,comments".to_string(),
            ..Default::default()
        };
        let index = sample_index();
        let mut extras = Prefetched::default();
        let long = "x".repeat(16_000);
        extras.insert(
            "c1",
            CardExtras {
                comments: Some(Ok(vec![
                    comment("ada", "2024-03-01", &long),
                    comment("bob", "2024-03-02", &long),
                    comment("cy", "2024-03-03", &long),
                ])),
                checklists: None,
            },
        );
        let job = RenderJob::new(&config, &index, &extras);
        let mut out = Vec::new();

        ExcelRenderer.cards(&[card()], &job, &mut out).unwrap();

        assert!(out.starts_with(b"PK"));
    }
}
