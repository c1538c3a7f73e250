use anyhow::Result;
use std::io::Write;

use super::{RenderJob, Renderer};
use crate::model::{Card, Member};

/// Separator-joined rows under a header of field names
///
/// Values are not escaped beyond the configured quote character; newlines in
/// free-text fields become a literal `\n` so every record stays on one row.
pub struct CsvRenderer;

impl CsvRenderer {
    fn header(job: &RenderJob<'_>, out: &mut dyn Write) -> Result<()> {
        write!(
            out,
            "{}{}",
            job.fields.join(job.config.col_sep.as_str()),
            job.config.row_sep
        )?;
        Ok(())
    }

    fn row(values: &[String], job: &RenderJob<'_>, out: &mut dyn Write) -> Result<()> {
        write!(
            out,
            "{}{}",
            values.join(job.config.col_sep.as_str()),
            job.config.row_sep
        )?;
        Ok(())
    }
}

impl Renderer for CsvRenderer {
    fn cards(&self, cards: &[Card], job: &RenderJob<'_>, out: &mut dyn Write) -> Result<()> {
        let ctx = job.context().escaping_newlines();
        Self::header(job, out)?;
        for card in cards {
            Self::row(&job.cards.project(card, &job.fields, &ctx), job, out)?;
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
        Self::header(job, out)?;
        for member in members {
            Self::row(&job.members.project(member, &job.fields, &ctx), job, out)?;
        }
        Ok(())
    }
}
