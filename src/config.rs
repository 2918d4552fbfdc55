//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::amazon::regions::Region;
use crate::comparison::models::Locale;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Marketplace used for bare ASINs and unrecognized hosts
    #[serde(default)]
    pub region: Region,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Base delay before each request in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random jitter added to delay (0 to this value)
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Language of row labels and commentary
    #[serde(default)]
    pub locale: Locale,

    /// External purchase advice
    #[serde(default)]
    pub advice: AdviceConfig,
}

/// `[advice]` table: OpenAI-compatible chat-completions settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceConfig {
    /// Request advice on every comparison
    #[serde(default)]
    pub enabled: bool,

    /// API key; `OPENAI_API_KEY` overrides it
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Model used for term explanations
    #[serde(default = "default_explain_model")]
    pub explain_model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_delay_jitter_ms() -> u64 {
    1000
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_explain_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: Region::Jp,
            proxy: None,
            delay_ms: default_delay_ms(),
            delay_jitter_ms: default_delay_jitter_ms(),
            format: OutputFormat::Table,
            locale: Locale::Ja,
            advice: AdviceConfig::default(),
        }
    }
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            model: default_model(),
            explain_model: default_explain_model(),
            base_url: default_base_url(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("amz-compare").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(region) = std::env::var("AMZ_REGION") {
            if let Ok(r) = region.parse() {
                self.region = r;
            }
        }

        if let Ok(proxy) = std::env::var("AMZ_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(delay) = std::env::var("AMZ_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        if let Ok(locale) = std::env::var("AMZ_LOCALE") {
            if let Ok(l) = locale.parse() {
                self.locale = l;
            }
        }

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.advice.api_key = Some(key);
            }
        }

        self
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Tests touching process environment must not interleave
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn restore(name: &str, value: Option<String>) {
        match value {
            Some(v) => std::env::set_var(name, v),
            None => std::env::remove_var(name),
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.region, Region::Jp);
        assert_eq!(config.delay_ms, 1000);
        assert_eq!(config.delay_jitter_ms, 1000);
        assert_eq!(config.format, OutputFormat::Table);
        assert_eq!(config.locale, Locale::Ja);
        assert!(config.proxy.is_none());
        assert!(!config.advice.enabled);
        assert!(config.advice.api_key.is_none());
        assert_eq!(config.advice.model, "gpt-4o");
        assert_eq!(config.advice.explain_model, "gpt-4o-mini");
        assert_eq!(config.advice.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);

        let err = "invalid".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("Unknown format"));
        assert!(err.contains("table, json, markdown, csv"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_config_from_toml_partial() {
        let toml = r#"
            region = "us"
            delay_ms = 3000
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.region, Region::Us);
        assert_eq!(config.delay_ms, 3000);
        assert_eq!(config.delay_jitter_ms, 1000);
        assert_eq!(config.advice.model, "gpt-4o");
    }

    #[test]
    fn test_config_from_toml_all_fields() {
        let toml = r#"
            region = "de"
            proxy = "socks5://localhost:1080"
            delay_ms = 5000
            delay_jitter_ms = 2000
            format = "markdown"
            locale = "en"

            [advice]
            enabled = true
            api_key = "sk-test"
            model = "gpt-4o-mini"
            explain_model = "llama3"
            base_url = "http://localhost:11434/v1"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.region, Region::De);
        assert_eq!(config.proxy, Some("socks5://localhost:1080".to_string()));
        assert_eq!(config.delay_ms, 5000);
        assert_eq!(config.delay_jitter_ms, 2000);
        assert_eq!(config.format, OutputFormat::Markdown);
        assert_eq!(config.locale, Locale::En);
        assert!(config.advice.enabled);
        assert_eq!(config.advice.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.advice.model, "gpt-4o-mini");
        assert_eq!(config.advice.explain_model, "llama3");
        assert_eq!(config.advice.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            region = "fr"
            delay_ms = 4000
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.region, Region::Fr);
        assert_eq!(config.delay_ms, 4000);
    }

    #[test]
    fn test_config_from_file_not_found() {
        let result = Config::from_file("/nonexistent/path/config.toml");
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let result = Config::from_file(file.path());
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            region = "uk"
            locale = "en"
            "#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.region, Region::Uk);
        assert_eq!(config.locale, Locale::En);
    }

    #[test]
    fn test_config_with_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        let vars = ["AMZ_REGION", "AMZ_PROXY", "AMZ_DELAY", "AMZ_LOCALE", "OPENAI_API_KEY"];
        let originals: Vec<_> = vars.iter().map(|v| std::env::var(v).ok()).collect();

        std::env::set_var("AMZ_REGION", "au");
        std::env::set_var("AMZ_PROXY", "http://proxy:8080");
        std::env::set_var("AMZ_DELAY", "5000");
        std::env::set_var("AMZ_LOCALE", "en");
        std::env::set_var("OPENAI_API_KEY", "sk-env");

        let config = Config::new().with_env();
        assert_eq!(config.region, Region::Au);
        assert_eq!(config.proxy, Some("http://proxy:8080".to_string()));
        assert_eq!(config.delay_ms, 5000);
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.advice.api_key.as_deref(), Some("sk-env"));

        for (name, value) in vars.iter().zip(originals) {
            restore(name, value);
        }
    }

    #[test]
    fn test_config_with_env_invalid_values() {
        let _guard = ENV_LOCK.lock().unwrap();
        let orig_region = std::env::var("AMZ_REGION").ok();
        let orig_delay = std::env::var("AMZ_DELAY").ok();
        let orig_locale = std::env::var("AMZ_LOCALE").ok();

        // Invalid values are ignored, keeping defaults
        std::env::set_var("AMZ_REGION", "invalid_region");
        std::env::set_var("AMZ_DELAY", "not_a_number");
        std::env::set_var("AMZ_LOCALE", "klingon");

        let config = Config::new().with_env();
        assert_eq!(config.region, Region::Jp);
        assert_eq!(config.delay_ms, 1000);
        assert_eq!(config.locale, Locale::Ja);

        restore("AMZ_REGION", orig_region);
        restore("AMZ_DELAY", orig_delay);
        restore("AMZ_LOCALE", orig_locale);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::new();
        config.region = Region::Uk;
        config.proxy = Some("socks5://localhost:1080".to_string());
        config.format = OutputFormat::Json;
        config.advice.enabled = true;

        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.region, config.region);
        assert_eq!(parsed.proxy, config.proxy);
        assert_eq!(parsed.format, config.format);
        assert!(parsed.advice.enabled);
    }
}
