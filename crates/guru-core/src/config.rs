//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/guru/config.toml)
//! 3. Environment variables (GURU_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "GURU";

/// Bearer secret used by the ingestion endpoint when none is configured
pub const DEV_API_SECRET: &str = "dev-insecure-ingest-token";

/// Admin password used when none is configured
pub const DEV_ADMIN_PASSWORD: &str = "guru-admin";

/// Remote store credentials; all three are required
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCredentials {
    pub api_key: String,
    pub project_id: String,
    pub app_id: String,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (SQLite cache)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Firestore web API key
    #[serde(default)]
    pub firebase_api_key: Option<String>,

    /// Firestore project id
    #[serde(default)]
    pub firebase_project_id: Option<String>,

    /// Firebase app id
    #[serde(default)]
    pub firebase_app_id: Option<String>,

    /// Bearer secret accepted by the ingestion endpoint
    #[serde(default)]
    pub api_secret_token: Option<String>,

    /// Password for admin commands
    #[serde(default)]
    pub admin_password: Option<String>,

    /// Public site address used to build article URLs
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Listen address for `guru serve`
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            firebase_api_key: None,
            firebase_project_id: None,
            firebase_app_id: None,
            api_secret_token: None,
            admin_password: None,
            site_url: default_site_url(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (GURU_DATA_DIR, GURU_FIREBASE_API_KEY, ...)
    /// 2. Config file (~/.config/guru/config.toml or GURU_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load from an explicit path when given, otherwise the default location
    pub fn load_with_override(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Some(val) = env_var("DATA_DIR") {
            self.data_dir = PathBuf::from(val);
        }

        override_optional(&mut self.firebase_api_key, "FIREBASE_API_KEY");
        override_optional(&mut self.firebase_project_id, "FIREBASE_PROJECT_ID");
        override_optional(&mut self.firebase_app_id, "FIREBASE_APP_ID");
        override_optional(&mut self.api_secret_token, "API_SECRET_TOKEN");
        override_optional(&mut self.admin_password, "ADMIN_PASSWORD");

        if let Some(val) = env_var("SITE_URL").filter(|v| !v.is_empty()) {
            self.site_url = val;
        }
        if let Some(val) = env_var("BIND_ADDR").filter(|v| !v.is_empty()) {
            self.bind_addr = val;
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with GURU_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Some(path) = env_var("CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("guru")
            .join("config.toml")
    }

    /// Get the path to the SQLite cache
    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join("cache.db")
    }

    /// Remote store credentials, if all three values are present
    pub fn remote_credentials(&self) -> Option<RemoteCredentials> {
        Some(RemoteCredentials {
            api_key: non_empty(&self.firebase_api_key)?,
            project_id: non_empty(&self.firebase_project_id)?,
            app_id: non_empty(&self.firebase_app_id)?,
        })
    }

    /// Bearer secret for the ingestion endpoint
    pub fn api_secret(&self) -> &str {
        self.api_secret_token
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEV_API_SECRET)
    }

    /// Password for admin commands
    pub fn admin_password(&self) -> &str {
        self.admin_password
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEV_ADMIN_PASSWORD)
    }

    /// True when either secret falls back to its development default
    pub fn uses_dev_secrets(&self) -> bool {
        self.api_secret() == DEV_API_SECRET || self.admin_password() == DEV_ADMIN_PASSWORD
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(format!("{}_{}", ENV_PREFIX, name)).ok()
}

/// Empty strings clear the value
fn override_optional(field: &mut Option<String>, name: &str) {
    if let Some(val) = env_var(name) {
        *field = if val.is_empty() { None } else { Some(val) };
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("guru")
}

fn default_site_url() -> String {
    "https://thetravelguru.vercel.app".to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "GURU_DATA_DIR",
        "GURU_FIREBASE_API_KEY",
        "GURU_FIREBASE_PROJECT_ID",
        "GURU_FIREBASE_APP_ID",
        "GURU_API_SECRET_TOKEN",
        "GURU_ADMIN_PASSWORD",
        "GURU_SITE_URL",
        "GURU_BIND_ADDR",
    ];

    fn with_credentials() -> Config {
        Config {
            firebase_api_key: Some("key".to_string()),
            firebase_project_id: Some("project".to_string()),
            firebase_app_id: Some("app".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.data_dir.ends_with("guru"));
        assert!(config.remote_credentials().is_none());
        assert_eq!(config.site_url, "https://thetravelguru.vercel.app");
        assert!(config.cache_path().ends_with("cache.db"));
    }

    #[test]
    fn test_remote_credentials_require_all_values() {
        let config = with_credentials();
        assert_eq!(
            config.remote_credentials(),
            Some(RemoteCredentials {
                api_key: "key".to_string(),
                project_id: "project".to_string(),
                app_id: "app".to_string(),
            })
        );

        let missing = Config {
            firebase_app_id: Some("  ".to_string()),
            ..with_credentials()
        };
        assert!(missing.remote_credentials().is_none());
    }

    #[test]
    fn test_dev_secret_defaults() {
        let mut config = Config::default();
        assert_eq!(config.api_secret(), DEV_API_SECRET);
        assert_eq!(config.admin_password(), DEV_ADMIN_PASSWORD);
        assert!(config.uses_dev_secrets());

        config.api_secret_token = Some("s3cret".to_string());
        config.admin_password = Some("hunter2".to_string());
        assert_eq!(config.api_secret(), "s3cret");
        assert!(!config.uses_dev_secrets());
    }

    #[test]
    fn test_env_override_credentials() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("GURU_FIREBASE_API_KEY", "env-key");
        env::set_var("GURU_FIREBASE_PROJECT_ID", "env-project");
        env::set_var("GURU_FIREBASE_APP_ID", "env-app");
        config.apply_env_overrides();

        let credentials = config.remote_credentials().unwrap();
        assert_eq!(credentials.api_key, "env-key");
        assert_eq!(credentials.project_id, "env-project");

        // Empty string clears it
        env::set_var("GURU_FIREBASE_API_KEY", "");
        config.apply_env_overrides();
        assert!(config.firebase_api_key.is_none());
        assert!(config.remote_credentials().is_none());
    }

    #[test]
    fn test_env_override_data_dir_and_server() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("GURU_DATA_DIR", "/tmp/guru-test");
        env::set_var("GURU_BIND_ADDR", "0.0.0.0:8080");
        env::set_var("GURU_SITE_URL", "https://guru.example.com");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/guru-test"));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.site_url, "https://guru.example.com");
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            firebase_project_id = "from-file"
            admin_password = "file-pass"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.firebase_project_id, Some("from-file".to_string()));
        assert_eq!(config.admin_password(), "file-pass");
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
    }

    #[test]
    fn test_env_takes_precedence_over_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        env::set_var("GURU_ADMIN_PASSWORD", "from-env");

        let config = Config::load_from_str(r#"admin_password = "from-file""#).unwrap();
        assert_eq!(config.admin_password(), "from-env");
    }

    #[test]
    fn test_save_and_load_path() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            site_url: "https://example.org".to_string(),
            ..with_credentials()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.site_url, "https://example.org");
        assert_eq!(loaded.remote_credentials(), config.remote_credentials());
        assert!(loaded.data_dir.exists());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        env::set_var("GURU_DATA_DIR", temp_dir.path().join("data"));

        let config = Config::load_from_path(&temp_dir.path().join("missing.toml")).unwrap();
        assert!(config.remote_credentials().is_none());
        assert!(config.data_dir.exists());
    }
}
