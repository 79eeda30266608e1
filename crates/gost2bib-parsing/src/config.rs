use regex::Regex;
use thiserror::Error;

use gost2bib_core::config_file::ConfigFile;

use crate::authors::AuthorStyle;
use crate::render::EntryStyle;

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid boilerplate pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("unknown author style {0:?} (expected \"surname_initials\" or \"verbatim\")")]
    UnknownAuthorStyle(String),
}

/// Configuration for the citation conversion pipeline.
///
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfig {
    // ── text_processing.rs ──
    /// Phrases removed from every line before classification.
    pub(crate) boilerplate: ListOverride<Regex>,

    // ── authors.rs ──
    /// How each matched author is written into the author list.
    pub(crate) author_style: AuthorStyle,

    // ── render.rs ──
    /// Entry-key prefix and language tag.
    pub(crate) entry_style: EntryStyle,
}

impl ParsingConfig {
    pub fn author_style(&self) -> AuthorStyle {
        self.author_style
    }

    pub fn entry_style(&self) -> &EntryStyle {
        &self.entry_style
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with [`ConfigError`] if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    boilerplate: ListOverrideBuilder,
    author_style: Option<AuthorStyle>,
    key_prefix: Option<String>,
    language: Option<String>,
}

/// Helper for building `ListOverride<Regex>` from string patterns.
#[derive(Debug, Clone, Default)]
enum ListOverrideBuilder {
    #[default]
    Default,
    Replace(Vec<String>),
    Extend(Vec<String>),
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from the `[parsing]` and `[output]` tables of a config file.
    pub fn from_config_file(file: &ConfigFile) -> Result<Self, ConfigError> {
        let mut builder = Self::new();

        if let Some(parsing) = &file.parsing {
            if let Some(style) = &parsing.author_style {
                builder = builder.author_style(style.parse()?);
            }
            if let Some(patterns) = &parsing.boilerplate {
                builder = builder.set_boilerplate_patterns(patterns.clone());
            }
            for pattern in parsing.extra_boilerplate.iter().flatten() {
                builder = builder.add_boilerplate_pattern(pattern.clone());
            }
        }

        if let Some(output) = &file.output {
            if let Some(prefix) = &output.key_prefix {
                builder = builder.key_prefix(prefix);
            }
            if let Some(language) = &output.language {
                builder = builder.language(language);
            }
        }

        Ok(builder)
    }

    // ── Boilerplate patterns ──

    pub fn set_boilerplate_patterns(mut self, patterns: Vec<String>) -> Self {
        self.boilerplate = ListOverrideBuilder::Replace(patterns);
        self
    }

    pub fn add_boilerplate_pattern(mut self, pattern: String) -> Self {
        match &mut self.boilerplate {
            ListOverrideBuilder::Extend(v) | ListOverrideBuilder::Replace(v) => v.push(pattern),
            ListOverrideBuilder::Default => {
                self.boilerplate = ListOverrideBuilder::Extend(vec![pattern])
            }
        }
        self
    }

    // ── Authors ──

    pub fn author_style(mut self, style: AuthorStyle) -> Self {
        self.author_style = Some(style);
        self
    }

    // ── Output ──

    pub fn key_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = Some(prefix.to_string());
        self
    }

    pub fn language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, ConfigError> {
        let compile_all = |patterns: Vec<String>| -> Result<Vec<Regex>, regex::Error> {
            patterns.iter().map(|p| Regex::new(p)).collect()
        };

        let boilerplate = match self.boilerplate {
            ListOverrideBuilder::Default => ListOverride::Default,
            ListOverrideBuilder::Replace(patterns) => ListOverride::Replace(compile_all(patterns)?),
            ListOverrideBuilder::Extend(patterns) => ListOverride::Extend(compile_all(patterns)?),
        };

        Ok(ParsingConfig {
            boilerplate,
            author_style: self.author_style.unwrap_or_default(),
            entry_style: EntryStyle {
                key_prefix: self.key_prefix.filter(|p| !p.is_empty()),
                language: self.language.filter(|l| !l.is_empty()),
            },
        })
    }
}
