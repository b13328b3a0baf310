//! Configuration loading and root folder resolution
//!
//! Bootstrap settings come from an optional TOML file. Missing or unreadable
//! files never stop startup: the loader logs a warning and falls back to
//! compiled defaults. Command-line arguments and environment variables are
//! layered on top by each binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "SCRIBE_ROOT_FOLDER";

/// Environment variable holding the upstream LLM credential
pub const API_KEY_ENV: &str = "SCRIBE_LLM_API_KEY";

/// Default service port
pub const DEFAULT_PORT: u16 = 5790;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Root folder for the database and client state
    pub root_folder: Option<PathBuf>,
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
    /// Research dataset override (JSON); the embedded dataset is used if unset
    pub research_data_path: Option<PathBuf>,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Upstream completion endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible chat completions URL
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    /// Whole-request timeout; the gateway never retries
    pub timeout_secs: u64,
    /// Credential; prefer the environment variable over storing it here
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4.1-mini".to_string(),
            max_tokens: 1500,
            timeout_secs: 60,
            api_key: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Default location of the TOML file (`~/.config/sensory-scribe/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sensory-scribe").join("config.toml"))
}

/// Parse a TOML configuration file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load configuration, falling back to defaults
///
/// An explicit path that fails to load is logged as a warning; a missing
/// default file is silent.
pub fn load_toml_config(explicit: Option<&Path>) -> TomlConfig {
    let (path, explicit) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return TomlConfig::default(),
        },
    };

    if !explicit && !path.exists() {
        return TomlConfig::default();
    }

    match read_toml_config(&path) {
        Ok(config) => {
            info!("Loaded configuration from {}", path.display());
            config
        }
        Err(e) => {
            warn!("{}; using built-in defaults", e);
            TomlConfig::default()
        }
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve the upstream credential
///
/// **Priority:** environment → TOML. Returns None when neither source holds a
/// usable key; the service still starts and answers "Missing API key".
pub fn resolve_api_key(toml_config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(API_KEY_ENV).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_config
        .llm
        .api_key
        .clone()
        .filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!("LLM API key found in environment and TOML. Using environment (highest priority).");
    }

    if let Some(key) = env_key {
        info!("LLM API key loaded from environment variable");
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("LLM API key loaded from TOML config");
        return Some(key);
    }

    warn!(
        "LLM API key not configured. Set {} or [llm] api_key in the TOML config.",
        API_KEY_ENV
    );
    None
}

/// Root folder resolution
///
/// **Priority:**
/// 1. Command-line argument
/// 2. `SCRIBE_ROOT_FOLDER` environment variable
/// 3. TOML `root_folder`
/// 4. OS-dependent default (`<data_local_dir>/sensory-scribe`)
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, toml_config: &TomlConfig) -> Self {
        Self {
            cli_arg,
            toml_root: toml_config.root_folder.clone(),
        }
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_root {
            return path.clone();
        }

        default_root_folder()
    }
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("sensory-scribe"))
        .unwrap_or_else(|| PathBuf::from("./sensory_scribe_data"))
}

/// Paths derived from a resolved root folder
pub struct RootFolder {
    root: PathBuf,
}

impl RootFolder {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create the root folder if it does not exist
    pub fn ensure_exists(&self) -> Result<()> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root)?;
            info!("Created root folder: {}", self.root.display());
        }
        Ok(())
    }

    /// SQLite database holding persisted analyses
    pub fn database_path(&self) -> PathBuf {
        self.root.join("scribe.db")
    }

    /// Directory backing the client storage port
    pub fn client_state_dir(&self) -> PathBuf {
        self.root.join("client")
    }
}
