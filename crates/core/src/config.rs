use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Settings file read when neither `--settings` nor `TRIAGE_SETTINGS_FILE` is given.
pub const DEFAULT_SETTINGS_FILE: &str = "local.settings.json";

pub const DEFAULT_API_VERSION: &str = "2024-05-01-preview";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// On-disk shape of the local settings file: `{ "Values": { "KEY": "value", ... } }`.
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(rename = "Values", default)]
    values: HashMap<String, serde_json::Value>,
}

/// Read the string entries of the settings file's `Values` object.
/// A missing or malformed file yields no values.
fn read_settings_file(path: &Path) -> HashMap<String, String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Settings file not readable, skipping");
            return HashMap::new();
        }
    };

    match serde_json::from_str::<SettingsFile>(&content) {
        Ok(file) => file
            .values
            .into_iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
            .collect(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Settings file is not valid JSON, ignoring");
            HashMap::new()
        }
    }
}

/// Environment first, settings file second. Empty values count as unset.
struct Layered<'a, F> {
    env_lookup: F,
    file: &'a HashMap<String, String>,
}

impl<F: Fn(&str) -> Option<String>> Layered<'_, F> {
    fn opt(&self, key: &str) -> Option<String> {
        (self.env_lookup)(key)
            .filter(|s| !s.is_empty())
            .or_else(|| self.file.get(key).filter(|s| !s.is_empty()).cloned())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.opt(key).unwrap_or_else(|| default.to_string())
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Settings file the values were layered from (may not exist).
    pub settings_path: PathBuf,
    pub azure_openai: AzureOpenAiConfig,
}

impl Config {
    /// Build config from the process environment (call `load_dotenv()` first).
    ///
    /// The settings file is `settings_path` if given, else `TRIAGE_SETTINGS_FILE`,
    /// else `local.settings.json` in the working directory.
    pub fn load(settings_path: Option<&Path>) -> Self {
        let path = settings_path
            .map(Path::to_path_buf)
            .or_else(|| env_opt("TRIAGE_SETTINGS_FILE").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
        Self::from_sources(path, env_opt)
    }

    /// Build config from an explicit settings file and env lookup function.
    pub fn from_sources<F>(settings_path: PathBuf, env_lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = read_settings_file(&settings_path);
        let layered = Layered {
            env_lookup,
            file: &file,
        };
        Self {
            azure_openai: AzureOpenAiConfig::from_layered(&layered),
            settings_path,
        }
    }

    /// Whether the narrative generator can be used.
    pub fn narrative_available(&self) -> bool {
        self.azure_openai.is_configured()
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (settings: {}):", self.settings_path.display());
        tracing::info!(
            "  azure_openai: endpoint={}, deployment={}, configured={}",
            self.azure_openai.endpoint.as_deref().unwrap_or("(none)"),
            self.azure_openai.chat_deployment.as_deref().unwrap_or("(none)"),
            self.azure_openai.is_configured()
        );
    }

    /// Return a redacted view safe to print (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "settings_path": self.settings_path,
            "azure_openai": {
                "endpoint": self.azure_openai.endpoint,
                "chat_deployment": self.azure_openai.chat_deployment,
                "api_version": self.azure_openai.api_version,
                "api_key_set": self.azure_openai.api_key.is_some(),
                "configured": self.azure_openai.is_configured(),
            },
        })
    }
}

// ── Azure OpenAI ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureOpenAiConfig {
    pub endpoint: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub chat_deployment: Option<String>,
    pub api_version: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl AzureOpenAiConfig {
    fn from_layered<F: Fn(&str) -> Option<String>>(l: &Layered<'_, F>) -> Self {
        Self {
            endpoint: l.opt("AZURE_OPENAI_ENDPOINT"),
            api_key: l.opt("AZURE_OPENAI_KEY"),
            chat_deployment: l.opt("AZURE_OPENAI_CHAT_DEPLOYMENT"),
            api_version: l.or("AZURE_OPENAI_API_VERSION", DEFAULT_API_VERSION),
            temperature: l.or("AZURE_OPENAI_TEMPERATURE", "0.2").parse().unwrap_or(0.2),
            max_tokens: l.or("AZURE_OPENAI_MAX_TOKENS", "800").parse().unwrap_or(800),
        }
    }

    /// True only when endpoint, key and chat deployment are all set.
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some() && self.api_key.is_some() && self.chat_deployment.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_settings(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("local.settings.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_settings_file_is_unconfigured() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_sources(dir.path().join("absent.json"), no_env);
        assert!(!config.narrative_available());
        assert_eq!(config.azure_openai.api_version, DEFAULT_API_VERSION);
        assert!((config.azure_openai.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn settings_file_values_are_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(
            &dir,
            r#"{"IsEncrypted": false, "Values": {
                "AZURE_OPENAI_ENDPOINT": "https://example.openai.azure.com",
                "AZURE_OPENAI_KEY": "file-key",
                "AZURE_OPENAI_CHAT_DEPLOYMENT": "gpt-4o",
                "FUNCTIONS_WORKER_RUNTIME": 3
            }}"#,
        );
        let config = Config::from_sources(path, no_env);
        assert!(config.narrative_available());
        assert_eq!(config.azure_openai.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn env_overrides_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(
            &dir,
            r#"{"Values": {"AZURE_OPENAI_KEY": "file-key", "AZURE_OPENAI_ENDPOINT": "https://file"}}"#,
        );
        let config = Config::from_sources(path, |key| match key {
            "AZURE_OPENAI_KEY" => Some("env-key".to_string()),
            "AZURE_OPENAI_ENDPOINT" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.azure_openai.api_key.as_deref(), Some("env-key"));
        // Empty env values fall through to the file.
        assert_eq!(config.azure_openai.endpoint.as_deref(), Some("https://file"));
        assert!(!config.narrative_available());
    }

    #[test]
    fn malformed_settings_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, "{ not json");
        let config = Config::from_sources(path, no_env);
        assert!(config.azure_openai.endpoint.is_none());
    }

    #[test]
    fn redacted_summary_hides_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_sources(dir.path().join("absent.json"), |key| {
            (key == "AZURE_OPENAI_KEY").then(|| "super-secret".to_string())
        });
        let summary = config.redacted_summary().to_string();
        assert!(!summary.contains("super-secret"));
        assert!(summary.contains("\"api_key_set\":true"));
    }
}
