use std::path::Path;

use crate::error::Error;

/// Default question asked when no URL is given on the command line.
const DEFAULT_PROMPT: &str = "What is the URL this link should point to?";

/// Default example shown alongside the question.
const DEFAULT_PLACEHOLDER: &str = "https://hasslefree.solutions";

/// Where a newly allocated definition line goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// Directly below the last definition line, or after a blank line at
    /// the end of the document when there are none.
    #[default]
    AfterLastDefinition,
    /// Always the last line of the document.
    EndOfDocument,
}

/// Project configuration loaded from `.reflink.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where new definitions are inserted.
    pub placement: Placement,
    /// Example URL shown by the prompt.
    pub placeholder: String,
    /// Question shown by the prompt.
    pub prompt: String,
}

/// Raw TOML structure for `.reflink.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ReflinkTomlConfig {
    /// See [`Config::placement`].
    #[serde(default)]
    placement: Placement,
    /// See [`Config::placeholder`].
    placeholder: Option<String>,
    /// See [`Config::prompt`].
    prompt: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            placement: Placement::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
        };
    }
}

impl Config {
    /// Load config from `.reflink.toml` in the given root directory.
    /// Returns the defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; never silently
    /// falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".reflink.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };

        log::debug!("loading config from {}", path.display());
        return Self::parse(&content);
    }

    /// Parse config from TOML content, filling unset keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: ReflinkTomlConfig = toml::from_str(content)?;
        return Ok(Self {
            placement: raw.placement,
            placeholder: raw.placeholder.unwrap_or_else(|| return DEFAULT_PLACEHOLDER.to_string()),
            prompt: raw.prompt.unwrap_or_else(|| return DEFAULT_PROMPT.to_string()),
        });
    }
}
