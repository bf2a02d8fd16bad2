//! Credential resolution.
//!
//! Credentials are looked up in a fixed order: explicit arguments first,
//! then the `~/.now.json` config file, then process properties and the
//! environment. A config file that exists is authoritative; the environment
//! is only consulted when no config file is present at all.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

/// Name of the credential file in the home directory.
pub const NOW_JSON: &str = ".now.json";

/// Variable holding the API token.
pub const NOW_TOKEN: &str = "NOW_TOKEN";

/// Variable holding the team scope.
pub const NOW_TEAM: &str = "NOW_TEAM";

/// Resolved credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
    team: Option<String>,
}

impl Credentials {
    /// Creates credentials from an explicit token and optional team.
    ///
    /// A blank team is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or blank.
    pub fn new(token: impl Into<String>, team: Option<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::BlankToken.into());
        }
        Ok(Self {
            token,
            team: non_blank(team),
        })
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the team scope, if any.
    #[must_use]
    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("team", &self.team)
            .finish()
    }
}

/// Where a set of credentials came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// `~/.now.json`.
    ConfigFile,
    /// Process properties or environment variables.
    Environment,
}

/// Contents of `~/.now.json`.
#[derive(Debug, Default, Deserialize)]
struct NowJson {
    #[serde(default, deserialize_with = "scalar_as_string")]
    token: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    team: Option<String>,
}

/// Accepts any JSON value, rendering non-strings as their JSON text.
fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(value) => Some(value),
        other => Some(other.to_string()),
    })
}

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves credentials from the config file or the environment.
#[derive(Clone)]
pub struct CredentialResolver {
    /// Directory searched for `.now.json`.
    home_dir: Option<PathBuf>,
    /// In-process overrides, consulted before the environment.
    properties: HashMap<String, String>,
    /// Environment lookup.
    env: EnvLookup,
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("home_dir", &self.home_dir)
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl CredentialResolver {
    /// Creates a resolver using the user's home directory and process environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            home_dir: dirs::home_dir(),
            properties: HashMap::new(),
            env: Arc::new(|key: &str| std::env::var(key).ok()),
        }
    }

    /// Uses a custom directory in place of the home directory.
    #[must_use]
    pub fn with_home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(dir.into());
        self
    }

    /// Disables the config file lookup entirely.
    #[must_use]
    pub fn without_home_dir(mut self) -> Self {
        self.home_dir = None;
        self
    }

    /// Sets a process property, consulted before the environment.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Replaces the environment lookup.
    #[must_use]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    /// Returns the path of the config file, if a home directory is known.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> {
        self.home_dir.as_ref().map(|dir| dir.join(NOW_JSON))
    }

    /// Resolves credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if no token is found.
    pub fn resolve(&self) -> Result<Credentials> {
        let (token, team, source) = match self.config_path().filter(|p| p.exists()) {
            Some(path) => {
                let file = Self::read_config_file(&path)?;
                (file.token, file.team, CredentialSource::ConfigFile)
            }
            None => (
                self.lookup(NOW_TOKEN),
                self.lookup(NOW_TEAM),
                CredentialSource::Environment,
            ),
        };

        let token = non_blank(token).ok_or(ConfigError::MissingToken)?;
        let team = non_blank(team);
        info!(
            "Resolved Now credentials from {source:?} (team scoped: {})",
            team.is_some()
        );
        Ok(Credentials { token, team })
    }

    /// Looks a key up as a property first, then in the environment.
    fn lookup(&self, key: &str) -> Option<String> {
        non_blank(self.properties.get(key).cloned()).or_else(|| non_blank((self.env)(key)))
    }

    fn read_config_file(path: &Path) -> Result<NowJson> {
        debug!("Reading credentials from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| {
            ConfigError::parse(format!("JSON parse error: {e}"), path.display().to_string()).into()
        })
    }
}

/// Treats blank strings as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NowError;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn resolver_in(dir: &TempDir) -> CredentialResolver {
        CredentialResolver::new()
            .with_home_dir(dir.path())
            .with_env(no_env)
    }

    fn write_config(dir: &TempDir, content: &str) {
        std::fs::write(dir.path().join(NOW_JSON), content).expect("Failed to write config");
    }

    #[test]
    fn test_config_file_token_and_team() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        write_config(&dir, r#"{"token":"abc","team":"t1"}"#);

        let creds = resolver_in(&dir).resolve().expect("resolve failed");
        assert_eq!(creds.token(), "abc");
        assert_eq!(creds.team(), Some("t1"));
    }

    #[test]
    fn test_env_only() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let creds = resolver_in(&dir)
            .with_env(|key| (key == NOW_TOKEN).then(|| String::from("xyz")))
            .resolve()
            .expect("resolve failed");

        assert_eq!(creds.token(), "xyz");
        assert_eq!(creds.team(), None);
    }

    #[test]
    fn test_nothing_found() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let err = resolver_in(&dir).resolve().unwrap_err();
        assert!(matches!(err, NowError::Config(ConfigError::MissingToken)));
    }

    #[test]
    fn test_config_file_shadows_environment() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        write_config(&dir, r#"{"team":"from-file"}"#);

        let err = resolver_in(&dir)
            .with_env(|_| Some(String::from("from-env")))
            .resolve()
            .unwrap_err();
        assert!(matches!(err, NowError::Config(ConfigError::MissingToken)));
    }

    #[test]
    fn test_property_wins_over_environment() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let creds = resolver_in(&dir)
            .with_property(NOW_TOKEN, "prop-token")
            .with_property(NOW_TEAM, "  ")
            .with_env(|key| match key {
                NOW_TOKEN => Some(String::from("env-token")),
                NOW_TEAM => Some(String::from("env-team")),
                _ => None,
            })
            .resolve()
            .expect("resolve failed");

        assert_eq!(creds.token(), "prop-token");
        assert_eq!(creds.team(), Some("env-team"));
    }

    #[test]
    fn test_blank_values_are_missing() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        write_config(&dir, r#"{"token":"abc","team":"   "}"#);
        let creds = resolver_in(&dir).resolve().expect("resolve failed");
        assert_eq!(creds.team(), None);

        write_config(&dir, r#"{"token":" "}"#);
        assert!(resolver_in(&dir).resolve().is_err());
    }

    #[test]
    fn test_non_string_values_are_stringified() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        write_config(&dir, r#"{"token":12345,"team":true}"#);

        let creds = resolver_in(&dir).resolve().expect("resolve failed");
        assert_eq!(creds.token(), "12345");
        assert_eq!(creds.team(), Some("true"));

        write_config(&dir, r#"{"token":null}"#);
        assert!(resolver_in(&dir).resolve().is_err());
    }

    #[test]
    fn test_malformed_config_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        write_config(&dir, "{ not json");

        let err = resolver_in(&dir).resolve().unwrap_err();
        assert!(matches!(
            err,
            NowError::Config(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_explicit_blank_token_rejected() {
        assert!(Credentials::new("", None).is_err());
        assert!(Credentials::new("   ", Some(String::from("t"))).is_err());

        let creds = Credentials::new("tok", Some(String::new())).expect("valid token");
        assert_eq!(creds.team(), None);
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials::new("super-secret", None).expect("valid token");
        assert!(!format!("{creds:?}").contains("super-secret"));
    }
}
