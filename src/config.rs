//! Configuration file support
//!
//! Loads settings from ~/.hdevedit.toml (or %USERPROFILE%\.hdevedit.toml on Windows)
//!
//! Example:
//! ```text
//! # hdevedit configuration
//! line-numbers = true
//! tab-width = 4
//! highlighting = true
//! extra-operators = ["smooth_image", "edges_sub_pix"]
//! log-file = "/tmp/hdevedit.log"
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::syntax::KeywordSet;

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Whether to show line numbers
    #[serde(rename = "line-numbers")]
    pub show_line_numbers: bool,
    /// Tab width for display
    pub tab_width: usize,
    /// Whether syntax highlighting starts enabled
    pub highlighting: bool,
    /// Operator names recognized in addition to the built-in list
    pub extra_operators: Vec<String>,
    /// Where the interactive editor writes its log
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_line_numbers: false,
            tab_width: 4,
            highlighting: true,
            extra_operators: Vec::new(),
            log_file: None,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".hdevedit.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".hdevedit.toml"))
        }
    }

    /// Load configuration from the config file
    ///
    /// A missing file gives the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load() -> Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!("reading configuration from {}", path.display());
                Self::parse(&contents)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;
        config.tab_width = config.tab_width.clamp(1, 16);
        Ok(config)
    }

    /// Built-in operators plus the configured extras
    pub fn keyword_set(&self) -> KeywordSet {
        KeywordSet::halcon().with_extra(self.extra_operators.iter().cloned())
    }
}
