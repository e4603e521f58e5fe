//! Shared configuration loader for the stache toolchain.
//!
//! `defaults/stache.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`StacheConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/stache.default.toml");

/// Top-level configuration consumed by stache applications.
#[derive(Debug, Clone, Deserialize)]
pub struct StacheConfig {
    pub parser: ParserConfig,
    pub output: OutputConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    /// Partials known outside the template being parsed
    pub partials: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub show_positions: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Treeviz,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Treeviz => "treeviz",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    pub show_source: bool,
}

/// Builds a [`StacheConfig`] in three layers: the embedded defaults, an optional
/// `--config` file, then the command-line flags.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder()
                .add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// Layer a TOML file over the defaults; a missing file fails [`Loader::build`]
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml));
        self
    }

    /// Force `output.format`, as `--format` does
    pub fn with_format(self, format: &str) -> Result<Self, ConfigError> {
        self.flag("output.format", format)
    }

    /// Force `output.show_positions`, as `--no-positions` does
    pub fn with_show_positions(self, show: bool) -> Result<Self, ConfigError> {
        self.flag("output.show_positions", show)
    }

    fn flag(mut self, key: &str, value: impl Into<ValueKind>) -> Result<Self, ConfigError> {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<StacheConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = Loader::new().build().expect("defaults to deserialize");
        assert!(config.parser.partials.is_empty());
        assert_eq!(config.output.format, OutputFormat::Treeviz);
        assert!(config.output.show_positions);
        assert!(config.diagnostics.show_source);
    }

    #[test]
    fn flags_override_the_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[output]\nformat = \"yaml\"\nshow_positions = true").expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .with_format("json")
            .expect("format flag")
            .with_show_positions(false)
            .expect("positions flag")
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.show_positions);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = Loader::new().with_format("xml").and_then(Loader::build);
        assert!(result.is_err());
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[parser]\npartials = [\"Header\", \"Footer\"]\n\n[output]\nformat = \"yaml\"")
            .expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.parser.partials, vec!["Header", "Footer"]);
        assert_eq!(config.output.format, OutputFormat::Yaml);
        assert!(config.output.show_positions);
    }

    #[test]
    fn required_file_must_exist() {
        assert!(Loader::new()
            .with_file("/nonexistent/stache.toml")
            .build()
            .is_err());
    }
}
