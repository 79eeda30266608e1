use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub parsing: Option<ParsingSection>,
    pub output: Option<OutputSection>,
    pub input: Option<InputSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsingSection {
    /// `"surname_initials"` or `"verbatim"`.
    pub author_style: Option<String>,
    /// Regex patterns replacing the built-in boilerplate list.
    pub boilerplate: Option<Vec<String>>,
    /// Regex patterns appended to the boilerplate list.
    pub extra_boilerplate: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    pub key_prefix: Option<String>,
    pub language: Option<String>,
    pub start_number: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSection {
    /// WHATWG encoding label, e.g. `"windows-1251"`.
    pub encoding: Option<String>,
}

/// Platform config directory path: `<config_dir>/gost2bib/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gost2bib").join("config.toml"))
}

/// Load config by cascading CWD `.gost2bib.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".gost2bib.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Some(config)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_parsing = base.parsing.unwrap_or_default();
    let overlay_parsing = overlay.parsing.unwrap_or_default();
    let base_output = base.output.unwrap_or_default();
    let overlay_output = overlay.output.unwrap_or_default();
    let base_input = base.input.unwrap_or_default();
    let overlay_input = overlay.input.unwrap_or_default();

    ConfigFile {
        parsing: Some(ParsingSection {
            author_style: overlay_parsing.author_style.or(base_parsing.author_style),
            boilerplate: overlay_parsing.boilerplate.or(base_parsing.boilerplate),
            extra_boilerplate: overlay_parsing
                .extra_boilerplate
                .or(base_parsing.extra_boilerplate),
        }),
        output: Some(OutputSection {
            key_prefix: overlay_output.key_prefix.or(base_output.key_prefix),
            language: overlay_output.language.or(base_output.language),
            start_number: overlay_output.start_number.or(base_output.start_number),
        }),
        input: Some(InputSection {
            encoding: overlay_input.encoding.or(base_input.encoding),
        }),
    }
}
