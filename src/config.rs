use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::TresError;

pub const DEFAULT_USER: &str = "me";

/// Output settings for one run
///
/// Built from defaults, the config file and CLI flags, then refined by query
/// directives. Each layer produces a new value; nothing is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub col_sep: String,
    pub row_sep: String,
    pub quote_char: String,
    /// Comma-separated field names, as given
    pub fields: String,
    pub format: String,
    pub limit: usize,
    pub number: bool,
    /// Header row for spreadsheet output; `None` keeps the per-listing default
    pub sheet_header: Option<bool>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            col_sep: "\t".to_string(),
            row_sep: "\n".to_string(),
            quote_char: String::new(),
            fields: "name".to_string(),
            format: "text".to_string(),
            limit: 200,
            number: false,
            sheet_header: None,
        }
    }
}

impl RuntimeConfig {
    /// Requested field names, trimmed, in order, blanks dropped
    pub fn field_list(&self) -> Vec<String> {
        self.fields
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(String::from)
            .collect()
    }

    /// Applies the settings present in `overrides`
    pub fn merged(mut self, overrides: &OutputSettings) -> Self {
        if let Some(ref v) = overrides.colsep {
            self.col_sep = unescape(v);
        }
        if let Some(ref v) = overrides.rowsep {
            self.row_sep = unescape(v);
        }
        if let Some(ref v) = overrides.quotechar {
            self.quote_char = v.clone();
        }
        if let Some(ref v) = overrides.fields {
            self.fields = v.clone();
        }
        if let Some(ref v) = overrides.format {
            self.format = v.clone();
        }
        if let Some(v) = overrides.limit {
            self.limit = v;
        }
        if let Some(v) = overrides.number {
            self.number = v;
        }
        if overrides.sheet_header.is_some() {
            self.sheet_header = overrides.sheet_header;
        }
        self
    }
}

/// Partial output settings, as found in the config file or on the command line
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    pub colsep: Option<String>,
    pub rowsep: Option<String>,
    pub quotechar: Option<String>,
    pub fields: Option<String>,
    pub format: Option<String>,
    pub limit: Option<usize>,
    pub number: Option<bool>,
    pub sheet_header: Option<bool>,
}

/// Contents of config.toml
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub output: OutputSettings,
}

/// API credentials and the member whose boards are indexed
#[derive(Debug, Clone)]
pub struct Credentials {
    pub key: String,
    pub token: String,
    pub user: String,
}

impl Credentials {
    /// Reads TRELLO_KEY, TRELLO_TOKEN and TRELLO_USER, loading `.env` first if present
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let key = lookup("TRELLO_KEY")
            .filter(|v| !v.is_empty())
            .ok_or(TresError::MissingCredential("TRELLO_KEY"))?;
        let token = lookup("TRELLO_TOKEN")
            .filter(|v| !v.is_empty())
            .ok_or(TresError::MissingCredential("TRELLO_TOKEN"))?;
        let user = lookup("TRELLO_USER")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_USER.to_string());
        Ok(Self { key, token, user })
    }
}

/// Returns the tres config directory (~/.config/tres/)
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("tres");
    Ok(config_dir)
}

/// Returns the config file path (~/.config/tres/config.toml)
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the config file, falling back to defaults if it doesn't exist
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&config_file()?)
}

pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    } else {
        Ok(ConfigFile::default())
    }
}

/// Expands `\t`, `\n`, `\r` and `\\` in separator values
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RuntimeConfig::default();
        assert_eq!(config.col_sep, "\t");
        assert_eq!(config.format, "text");
        assert_eq!(config.limit, 200);
        assert_eq!(config.field_list(), vec!["name"]);
    }

    #[test]
    fn test_field_list_trims_and_keeps_order() {
        let config = RuntimeConfig {
            fields: " name, ID ,,listname,name ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.field_list(), vec!["name", "ID", "listname", "name"]);
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[output]\ncolsep = \";\"\nrowsep = '\\r\\n'\nlimit = 10\nsheet_header = true\n",
        )
        .unwrap();

        let file = load_config_from(&path).unwrap();
        let config = RuntimeConfig::default().merged(&file.output);
        assert_eq!(config.col_sep, ";");
        assert_eq!(config.row_sep, "\r\n");
        assert_eq!(config.limit, 10);
        assert_eq!(config.sheet_header, Some(true));
        assert_eq!(config.format, "text");
    }

    #[test]
    fn test_missing_config_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let file = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert!(file.output.format.is_none());
    }

    #[test]
    fn test_later_layer_wins() {
        let file = OutputSettings {
            format: Some("csv".to_string()),
            limit: Some(5),
            ..Default::default()
        };
        let flags = OutputSettings {
            format: Some("json".to_string()),
            ..Default::default()
        };
        let config = RuntimeConfig::default().merged(&file).merged(&flags);
        assert_eq!(config.format, "json");
        assert_eq!(config.limit, 5);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("\\t"), "\t");
        assert_eq!(unescape("a\\nb"), "a\nb");
        assert_eq!(unescape("\\\\"), "\\");
        assert_eq!(unescape("\\x;"), "\\x;");
        assert_eq!(unescape("|"), "|");
    }

    #[test]
    fn test_credentials_required() {
        let err = Credentials::from_lookup(|_| None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TresError>(),
            Some(TresError::MissingCredential("TRELLO_KEY"))
        ));

        let err = Credentials::from_lookup(|name| (name == "TRELLO_KEY").then(|| "k".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("TRELLO_TOKEN"));
    }

    #[test]
    fn test_credentials_default_user() {
        let creds = Credentials::from_lookup(|name| match name {
            "TRELLO_KEY" => Some("k".to_string()),
            "TRELLO_TOKEN" => Some("t".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(creds.user, DEFAULT_USER);
    }
}
