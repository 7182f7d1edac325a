//! Configuration management

use std::{collections::HashMap, env, path::Path, time::Duration};

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::access::{PermissionKey, RoleCode};
use crate::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    /// Environment files to load before processing config.
    /// Paths support ~ expansion. Loaded in order, later files override earlier.
    #[serde(default)]
    pub env_files: Vec<String>,
    /// Server configuration
    pub server: ServerConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// FSS upstream configuration
    pub fss: FssConfig,
    /// Permission key -> allowed role codes
    pub authorization: AuthorizationConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Graceful shutdown timeout
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            request_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// OpenID discovery document URL, fetched once at startup
    pub discovery_url: String,

    /// Clock skew tolerance for token verification, in seconds
    pub leeway_secs: u64,

    /// Paths that bypass authentication (default: `["/health"]`)
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

fn default_public_paths() -> Vec<String> {
    vec!["/health".to_string()]
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            discovery_url:
                "http://localhost:3200/idp-stub/.well-known/openid-configuration".to_string(),
            leeway_secs: 60,
            public_paths: default_public_paths(),
        }
    }
}

/// FSS upstream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FssConfig {
    /// Base URL for the FSS API
    pub api_url: String,

    /// API key sent as `x-api-key` on every FSS call.
    /// Supports `env:VAR_NAME` indirection.
    pub api_key: String,
}

impl Default for FssConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3100".to_string(),
            api_key: "local-dev-key".to_string(),
        }
    }
}

impl FssConfig {
    /// Resolve the API key (expand `env:VAR_NAME` references)
    #[must_use]
    pub fn resolve_api_key(&self) -> String {
        if let Some(var_name) = self.api_key.strip_prefix("env:") {
            env::var(var_name).unwrap_or_else(|_| self.api_key.clone())
        } else {
            self.api_key.clone()
        }
    }
}

/// Permission policy: permission key -> allowed role codes.
///
/// Kept as a map rather than a fixed struct so a mapped route whose
/// permission key is missing here can be detected at request time and
/// degraded to deny instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationConfig(
    /// Permission key -> allowed role codes.
    pub HashMap<PermissionKey, Vec<RoleCode>>,
);

impl AuthorizationConfig {
    /// Allowed role codes for a permission key. `None` means the key is not
    /// configured at all (misconfiguration, callers must deny).
    #[must_use]
    pub fn allowed_roles(&self, key: PermissionKey) -> Option<&[RoleCode]> {
        self.0.get(&key).map(Vec::as_slice)
    }
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        use PermissionKey::{
            AccessFinanceDocument, ConfirmBankDetails, CreateBankDetails, ListFinanceDocuments,
            ViewFullBankDetails,
        };
        use RoleCode::{CEO, HOF, WO};

        Self(HashMap::from([
            (ViewFullBankDetails, vec![CEO]),
            (ConfirmBankDetails, vec![CEO, WO]),
            (CreateBankDetails, vec![CEO, HOF]),
            (ListFinanceDocuments, vec![CEO]),
            (AccessFinanceDocument, vec![CEO]),
        ]))
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if the config file does not exist or cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();

        // Load from file if provided
        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            figment = figment.merge(Yaml::file(p));
        }

        // Merge environment variables (LAPS_ prefix)
        figment = figment.merge(Env::prefixed("LAPS_").split("__"));

        let mut config: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        // Load env files into process environment (before env var expansion)
        config.load_env_files();

        // Expand ${VAR} in upstream settings
        config.expand_env_vars();

        Ok(config)
    }

    /// Load environment files into the process environment.
    /// Supports ~ expansion. Files that don't exist are silently skipped.
    fn load_env_files(&self) {
        for path_str in &self.env_files {
            let expanded = if path_str.starts_with('~') {
                if let Some(home) = dirs::home_dir() {
                    path_str.replacen('~', &home.display().to_string(), 1)
                } else {
                    path_str.clone()
                }
            } else {
                path_str.clone()
            };

            let path = Path::new(&expanded);
            if path.exists() {
                match dotenvy::from_path(path) {
                    Ok(()) => {
                        tracing::info!("Loaded env file: {expanded}");
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load env file {expanded}: {e}");
                    }
                }
            } else {
                tracing::debug!("Env file not found (skipped): {expanded}");
            }
        }
    }

    /// Expand ${VAR} and ${VAR:-default} patterns in config values
    fn expand_env_vars(&mut self) {
        // Pattern: ${VAR} or ${VAR:-default}
        let Ok(re) = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}") else {
            return;
        };

        self.fss.api_url = Self::expand_string(&re, &self.fss.api_url);
        self.fss.api_key = Self::expand_string(&re, &self.fss.api_key);
        self.auth.discovery_url = Self::expand_string(&re, &self.auth.discovery_url);
    }

    /// Expand environment variables in a string
    fn expand_string(re: &Regex, value: &str) -> String {
        re.replace_all(value, |caps: &regex::Captures| {
            let var_name = &caps[1];
            let default = caps.get(2).map_or("", |m| m.as_str());
            env::var(var_name).unwrap_or_else(|_| default.to_string())
        })
        .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_load_without_a_file() {
        // GIVEN/WHEN: no config file, no env overrides
        let config = Config::default();

        // THEN: sensible local-dev defaults
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.auth.public_paths, vec!["/health".to_string()]);
        assert_eq!(config.auth.leeway_secs, 60);
        assert!(config.fss.api_url.starts_with("http://localhost"));
    }

    #[test]
    fn default_policy_covers_all_permission_keys() {
        // GIVEN: default authorization config
        let authz = AuthorizationConfig::default();

        // THEN: every permission key has an allow-list and CEO is in each
        for key in [
            PermissionKey::ViewFullBankDetails,
            PermissionKey::ConfirmBankDetails,
            PermissionKey::CreateBankDetails,
            PermissionKey::ListFinanceDocuments,
            PermissionKey::AccessFinanceDocument,
        ] {
            let roles = authz.allowed_roles(key).expect("key configured");
            assert!(roles.contains(&RoleCode::CEO), "CEO missing for {key:?}");
        }
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        // GIVEN: a config file overriding the port and a permission list
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            "server:\n  port: 4001\nauthorization:\n  viewFullBankDetails: [CEO, HOF]\n"
        )
        .unwrap();

        // WHEN: load
        let config = Config::load(Some(file.path())).unwrap();

        // THEN: overridden values win, untouched values keep defaults
        assert_eq!(config.server.port, 4001);
        assert_eq!(
            config
                .authorization
                .allowed_roles(PermissionKey::ViewFullBankDetails),
            Some(&[RoleCode::CEO, RoleCode::HOF][..])
        );
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/laps.yaml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn literal_api_key_passes_through() {
        let fss = FssConfig::default();
        assert_eq!(fss.resolve_api_key(), fss.api_key);
    }

    #[test]
    fn api_key_env_indirection_falls_back_to_literal() {
        let fss = FssConfig {
            api_url: "http://localhost:3100".to_string(),
            api_key: "env:LAPS_TEST_UNSET_KEY".to_string(),
        };

        // Unset variable: the literal (including prefix) is kept, matching
        // the expand behavior for missing values elsewhere
        assert_eq!(fss.resolve_api_key(), "env:LAPS_TEST_UNSET_KEY");
    }

    #[test]
    fn dollar_brace_expansion_uses_default_when_unset() {
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}").unwrap();
        let expanded =
            Config::expand_string(&re, "https://${LAPS_TEST_UNSET_HOST:-fss.example.test}/api");
        assert_eq!(expanded, "https://fss.example.test/api");
    }
}
