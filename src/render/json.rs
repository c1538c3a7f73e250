use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use super::{RenderJob, Renderer};
use crate::model::{Card, Member};

/// The raw records as one JSON array, bypassing field projection
pub struct JsonRenderer;

fn write_array<T: Serialize>(
    records: &[T],
    job: &RenderJob<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    serde_json::to_writer(&mut *out, records).context("Failed to serialize records")?;
    write!(out, "{}", job.config.row_sep)?;
    Ok(())
}

impl Renderer for JsonRenderer {
    fn cards(&self, cards: &[Card], job: &RenderJob<'_>, out: &mut dyn Write) -> Result<()> {
        write_array(cards, job, out)
    }

    fn members(
        &self,
        members: &[Member],
        job: &RenderJob<'_>,
        out: &mut dyn Write,
    ) -> Result<()> {
        write_array(members, job, out)
    }
}
