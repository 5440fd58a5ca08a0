use serde::Deserialize;

use crate::error::{AppError, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub github: GitHubConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct GitHubConfig {
    pub token: String,
    pub webhook_secret: String,
    /// Path of the rules file on each repository's default branch.
    #[serde(default = "default_rules_path")]
    pub rules_path: String,
}

// Manual Debug impl to avoid leaking credentials
impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .field("rules_path", &self.rules_path)
            .finish()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_rules_path() -> String {
    ".github/lichen.yml".to_string()
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Load from file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        } else {
            builder = builder.add_source(config::File::with_name("lichen").required(false));
        }

        // Environment variable overrides with LICHEN_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("LICHEN")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn webhook_secret(&self) -> &str {
        &self.github.webhook_secret
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_from_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lichen.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[github]\ntoken = \"ghp_test\"\nwebhook_secret = \"hush\""
        )
        .unwrap();

        let config = AppConfig::load(path.to_str()).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.github.rules_path, ".github/lichen.yml");
        assert_eq!(config.webhook_secret(), "hush");
    }

    #[test]
    fn test_load_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lichen.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            concat!(
                "[server]\nhost = \"127.0.0.1\"\nport = 8080\n",
                "[github]\ntoken = \"ghp_test\"\nwebhook_secret = \"hush\"\n",
                "rules_path = \".github/labels.yml\"\n"
            )
        )
        .unwrap();

        let config = AppConfig::load(path.to_str()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.github.rules_path, ".github/labels.yml");
    }

    #[test]
    fn test_missing_github_section_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lichen.toml");
        std::fs::write(&path, "[server]\nport = 1\n").unwrap();

        assert!(matches!(
            AppConfig::load(path.to_str()),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = GitHubConfig {
            token: "ghp_secret".to_string(),
            webhook_secret: "hush".to_string(),
            rules_path: default_rules_path(),
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("ghp_secret"));
        assert!(!printed.contains("hush"));
        assert!(printed.contains("[REDACTED]"));
    }
}
