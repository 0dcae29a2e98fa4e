use anyhow::{Context, Result};
use apidoc::{BuilderOptions, Info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment prefix for overrides, e.g. `APIDOC__OUTPUT__FORMAT=yaml`.
pub const ENV_PREFIX: &str = "APIDOC__";

/// Application configuration for the document renderer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Document-level metadata written to the rendered document.
    #[serde(default)]
    pub document: DocumentConfig,
    /// Builder behaviour switches.
    #[serde(default)]
    pub builder: BuilderOptions,
    /// Where and how the document is written.
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    /// Interface-description format version, e.g. "3.0.0" or "3.1.0".
    pub openapi: String,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            openapi: "3.0.0".to_string(),
            title: "Pet Store".to_string(),
            version: "1.0.0".to_string(),
            description: "Sample API declared with apidoc".to_string(),
        }
    }
}

impl DocumentConfig {
    pub fn info(&self) -> Info {
        Info::new(&self.title, &self.version, &self.description)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown output format '{0}', expected 'json' or 'yaml'")]
pub struct UnknownOutputFormat(String);

impl FromStr for OutputFormat {
    type Err = UnknownOutputFormat;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(UnknownOutputFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Output file; stdout when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Logging configuration - maps log targets to their settings.
/// Key "default" is the catch-all for records that match no explicit target.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    #[serde(default = "default_console_level")]
    pub console_level: String, // "info", "debug", "error", "off"
    /// Empty disables the file sink for this section.
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub file_level: String,
    /// Rotated files to keep.
    #[serde(default)]
    pub max_backups: Option<usize>,
    /// Rotate once the file grows past this size.
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

fn default_console_level() -> String {
    "warn".to_string()
}

/// Console-only logging at `warn`; the rendered document owns stdout.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: default_console_level(),
            file: String::new(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl AppConfig {
    /// Layered loading: defaults → YAML file → environment variables.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let path = config_path.as_ref();
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        Self::extract(Some(path))
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    /// Load configuration from file, or from defaults plus environment when no
    /// file is given.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => Self::extract(None).context("Failed to load default config"),
        }
    }

    fn extract(file: Option<&Path>) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
        if let Some(file) = file {
            figment = figment.merge(Yaml::file(file));
        }
        // APIDOC__DOCUMENT__TITLE=... maps to document.title
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment
            .extract()
            .context("Failed to extract config from figment")
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(format) = args.format {
            self.output.format = format;
        }
        if let Some(path) = &args.output {
            self.output.path = Some(path.clone());
        }

        let logging = self.logging.get_or_insert_with(default_logging_config);
        let section = logging
            .entry("default".to_string())
            .or_insert_with(|| Section {
                console_level: default_console_level(),
                file: String::new(),
                file_level: String::new(),
                max_backups: None,
                max_size_mb: None,
            });
        match args.verbose {
            0 => {}
            1 => section.console_level = "info".to_string(),
            2 => section.console_level = "debug".to_string(),
            _ => section.console_level = "trace".to_string(),
        }
    }
}

/// Command line arguments relevant to configuration.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub print_config: bool,
    pub verbose: u8,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
}
