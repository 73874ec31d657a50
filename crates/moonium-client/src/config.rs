/*
[INPUT]:  Optional config file and MOONIUM_* environment variables
[OUTPUT]: Application configuration and project slug resolution
[POS]:    Configuration layer - client setup
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::{ClientConfig, MooniumError, Result};
use crate::i18n::Locale;

/// Project fetched when running against a development backend
pub const DEVELOPMENT_PROJECT_SLUG: &str = "moonia-dev";

const ENV_PREFIX: &str = "MOONIUM";

/// Deployment environment, mirrors the web app's node env
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    #[default]
    Production,
}

/// Top-level configuration for a Moonium client
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Base URL of the Moonium web service
    pub api_url: String,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub locale: Locale,
    /// Directory holding the persisted session; platform data dir when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Explicit project slug, overrides hostname resolution
    #[serde(default)]
    pub project_slug: Option<String>,
    /// Hostname the project is served under
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    /// Load from an optional file, then overlay `MOONIUM_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|err| MooniumError::Config(err.to_string()))
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    /// Slug of the project this client works on, if one can be determined
    pub fn project_slug(&self) -> Option<String> {
        if let Some(slug) = self.project_slug.as_deref().filter(|s| !s.is_empty()) {
            return Some(slug.to_string());
        }
        match (self.environment, self.hostname.as_deref()) {
            (Environment::Development, _) => Some(DEVELOPMENT_PROJECT_SLUG.to_string()),
            (env, Some(hostname)) => Some(resolve_project_slug(env, hostname)),
            (_, None) => None,
        }
    }
}

/// Derive the project slug from the serving hostname.
///
/// Staging hosts look like `<slug>.<domain>.<tld>`, production hosts like
/// `<sub>.<slug>.<tld>` where the slug may itself contain dots. Hostnames with
/// fewer than three labels are returned unchanged.
pub fn resolve_project_slug(environment: Environment, hostname: &str) -> String {
    if environment == Environment::Development {
        return DEVELOPMENT_PROJECT_SLUG.to_string();
    }

    let Some((first, rest)) = hostname.split_once('.') else {
        return hostname.to_string();
    };
    let Some((middle, _tld)) = rest.rsplit_once('.') else {
        return hostname.to_string();
    };

    match environment {
        Environment::Staging => first.to_string(),
        _ => middle.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(Environment::Development, "anything.example.com", "moonia-dev")]
    #[case(Environment::Staging, "acme.moonium.io", "acme")]
    #[case(Environment::Production, "app.acme.io", "acme")]
    #[case(Environment::Production, "app.acme.co.uk", "acme.co")]
    #[case(Environment::Production, "localhost", "localhost")]
    #[case(Environment::Staging, "moonium.io", "moonium.io")]
    fn test_resolve_project_slug(
        #[case] environment: Environment,
        #[case] hostname: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(resolve_project_slug(environment, hostname), expected);
    }

    fn config() -> AppConfig {
        AppConfig {
            api_url: "https://api.moonium.io".to_string(),
            environment: Environment::Production,
            locale: Locale::En,
            data_dir: None,
            project_slug: None,
            hostname: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }

    #[test]
    fn test_explicit_slug_wins() {
        let config = AppConfig {
            project_slug: Some("acme".to_string()),
            hostname: Some("app.other.io".to_string()),
            ..config()
        };
        assert_eq!(config.project_slug(), Some("acme".to_string()));
    }

    #[test]
    fn test_slug_needs_hostname_outside_development() {
        assert_eq!(config().project_slug(), None);

        let dev = AppConfig {
            environment: Environment::Development,
            ..config()
        };
        assert_eq!(dev.project_slug(), Some(DEVELOPMENT_PROJECT_SLUG.to_string()));
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("moonium-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("moonium.toml");
        std::fs::write(
            &path,
            "api_url = \"http://localhost:3001\"\nenvironment = \"staging\"\nlocale = \"it\"\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.api_url, "http://localhost:3001");
        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.locale, Locale::It);
        assert_eq!(config.client_config().timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout_secs, 10);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let path = std::env::temp_dir().join(format!("missing-{}.toml", uuid::Uuid::new_v4()));
        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, MooniumError::Config(_)));
    }
}
