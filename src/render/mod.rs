//! Output renderers
//!
//! One [`Renderer`] per output format. Renderers write straight to the given
//! stream; the format name is validated before anything is written.

mod csv;
mod excel;
mod json;
mod markdown;
mod text;

use anyhow::Result;
use std::io::Write;
use std::str::FromStr;

use crate::config::RuntimeConfig;
use crate::error::TresError;
use crate::index::NameIndex;
use crate::model::{Card, Member};
use crate::prefetch::Prefetched;
use crate::projection::{card_fields, member_fields, FieldTable, ProjectionContext};

pub use self::csv::CsvRenderer;
pub use self::excel::ExcelRenderer;
pub use self::json::JsonRenderer;
pub use self::markdown::MarkdownRenderer;
pub use self::text::TextRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Csv,
    Json,
    Markdown,
    Excel,
}

impl FromStr for Format {
    type Err = TresError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Format::Text),
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "markdown" | "md" => Ok(Format::Markdown),
            "excel" | "xlsx" => Ok(Format::Excel),
            _ => Err(TresError::InvalidFormat(s.to_string())),
        }
    }
}

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Format::Text => "text",
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Markdown => "markdown",
            Format::Excel => "excel",
        }
    }

    pub fn renderer(self) -> &'static dyn Renderer {
        match self {
            Format::Text => &TextRenderer,
            Format::Csv => &CsvRenderer,
            Format::Json => &JsonRenderer,
            Format::Markdown => &MarkdownRenderer,
            Format::Excel => &ExcelRenderer,
        }
    }
}

/// Everything a render pass reads besides the records
pub struct RenderJob<'a> {
    pub config: &'a RuntimeConfig,
    pub fields: Vec<String>,
    pub index: &'a NameIndex,
    pub extras: &'a Prefetched,
    pub cards: FieldTable<Card>,
    pub members: FieldTable<Member>,
}

impl<'a> RenderJob<'a> {
    pub fn new(config: &'a RuntimeConfig, index: &'a NameIndex, extras: &'a Prefetched) -> Self {
        Self {
            config,
            fields: config.field_list(),
            index,
            extras,
            cards: card_fields(),
            members: member_fields(),
        }
    }

    /// Projection context honoring the configured quote character
    pub fn context(&self) -> ProjectionContext<'_> {
        ProjectionContext::new(self.index, self.extras, &self.config.quote_char)
    }

    pub fn number_prefix(&self, row: usize) -> String {
        if self.config.number {
            format!("{:4} ", row)
        } else {
            String::new()
        }
    }
}

pub trait Renderer {
    fn cards(&self, cards: &[Card], job: &RenderJob<'_>, out: &mut dyn Write) -> Result<()>;
    fn members(&self, members: &[Member], job: &RenderJob<'_>, out: &mut dyn Write)
        -> Result<()>;
}

/// Uppercases the first letter of every word
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !c.is_alphanumeric();
    }
    out
}

#[cfg(test)]
pub(crate) fn render_to_string(
    renderer: &dyn Renderer,
    config: &RuntimeConfig,
    extras: &Prefetched,
    cards: &[Card],
) -> String {
    let index = crate::index::sample_index();
    let job = RenderJob::new(config, &index, extras);
    let mut out = Vec::new();
    renderer.cards(cards, &job, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        assert_eq!("CSV".parse::<Format>().unwrap(), Format::Csv);
        assert_eq!("excel".parse::<Format>().unwrap(), Format::Excel);
        assert_eq!(" markdown ".parse::<Format>().unwrap(), Format::Markdown);
        assert_eq!(Format::Json.name(), "json");
    }

    #[test]
    fn test_invalid_format_is_reported() {
        let err = "yaml".parse::<Format>().unwrap_err();
        assert!(matches!(err, TresError::InvalidFormat(ref name) if name == "yaml"));
        assert_eq!(err.to_string(), "invalid output format: yaml");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("datelastactivity"), "Datelastactivity");
        assert_eq!(title_case("short url"), "Short Url");
        assert_eq!(title_case("name"), "Name");
    }
}
