//! Search query preprocessing
//!
//! A query is free text, possibly spread over several lines of a file. `//`
//! starts a comment, blank lines are dropped, and lines beginning with `@` are
//! directives that adjust the output settings instead of joining the query.

use anyhow::Result;

use crate::config::{unescape, RuntimeConfig};
use crate::error::TresError;

/// A recognized `@name value` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Fields(String),
    Format(String),
    ColSep(String),
    RowSep(String),
    Limit(String),
}

impl Directive {
    /// Parses a directive line; unrecognized names yield `None`
    pub fn parse(line: &str) -> Option<Self> {
        let (name, value) = match line.split_once(char::is_whitespace) {
            Some((name, value)) => (name, value.trim()),
            None => (line, ""),
        };
        let value = value.to_string();
        match name.to_lowercase().as_str() {
            "@fields" => Some(Directive::Fields(value)),
            "@format" => Some(Directive::Format(value.to_lowercase())),
            "@colsep" => Some(Directive::ColSep(value)),
            "@rowsep" => Some(Directive::RowSep(value)),
            "@limit" => Some(Directive::Limit(value)),
            _ => None,
        }
    }

    /// Returns `config` with this directive applied
    pub fn apply(self, config: RuntimeConfig) -> Result<RuntimeConfig> {
        Ok(match self {
            Directive::Fields(fields) => RuntimeConfig { fields, ..config },
            Directive::Format(format) => RuntimeConfig { format, ..config },
            Directive::ColSep(sep) => RuntimeConfig {
                col_sep: unescape(&sep),
                ..config
            },
            Directive::RowSep(sep) => RuntimeConfig {
                row_sep: unescape(&sep),
                ..config
            },
            Directive::Limit(raw) => {
                let limit = raw
                    .parse::<usize>()
                    .map_err(|_| TresError::InvalidLimit(raw.clone()))?;
                RuntimeConfig { limit, ..config }
            }
        })
    }
}

/// Query text ready to send, plus the settings its directives produced
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedQuery {
    pub query: String,
    pub config: RuntimeConfig,
}

/// Strips comments, folds directives into `config` in order, joins the rest
pub fn preprocess(raw: &str, config: RuntimeConfig) -> Result<PreparedQuery> {
    let mut config = config;
    let mut query = String::new();

    for line in raw.lines() {
        let line = match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('@') {
            match Directive::parse(line) {
                Some(directive) => {
                    tracing::debug!(?directive, "query directive");
                    config = directive.apply(config)?;
                }
                None => tracing::warn!(line, "ignoring unknown query directive"),
            }
        } else {
            query.push_str(line);
            query.push(' ');
        }
    }

    Ok(PreparedQuery { query, config })
}
