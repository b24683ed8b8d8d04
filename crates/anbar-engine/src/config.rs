use std::path::Path;

use serde::Deserialize;

use anbar_core::ident::Role;
use anbar_core::policy::OverridePolicy;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub log: LogConfig,
    pub access: AccessConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Identity classes for resolution. Both sets are configuration so that
/// operational roles can be moved in or out without a code change.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub override_roles: Vec<Role>,
    pub excluded_roles: Vec<Role>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost:5432/anbar".to_string(),
            max_connections: 10,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
        }
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            override_roles: Vec::new(),
            excluded_roles: vec![Role::AssetManager],
        }
    }
}

fn parse_role_list(value: &str) -> Vec<Role> {
    value
        .split(',')
        .filter_map(|part| Role::parse(part.trim()))
        .collect()
}

impl AppConfig {
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::ReadFile(path.display().to_string(), e.to_string()))?;
            toml::from_str::<AppConfig>(&contents)
                .map_err(|e| ConfigError::ParseToml(e.to_string()))?
        } else {
            AppConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("ANBAR_DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = std::env::var("ANBAR_DATABASE_MAX_CONNECTIONS")
            && let Ok(n) = v.parse()
        {
            self.database.max_connections = n;
        }
        if let Ok(v) = std::env::var("ANBAR_LOG_LEVEL") {
            self.log.level = v;
        }
        if let Ok(v) = std::env::var("ANBAR_LOG_FORMAT") {
            match v.as_str() {
                "json" => self.log.format = LogFormat::Json,
                "pretty" => self.log.format = LogFormat::Pretty,
                _ => {}
            }
        }
        if let Ok(v) = std::env::var("ANBAR_ACCESS_OVERRIDE_ROLES") {
            self.access.override_roles = parse_role_list(&v);
        }
        if let Ok(v) = std::env::var("ANBAR_ACCESS_EXCLUDED_ROLES") {
            self.access.excluded_roles = parse_role_list(&v);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be non-zero".to_string(),
            ));
        }
        if let Some(role) = self
            .access
            .override_roles
            .iter()
            .find(|r| self.access.excluded_roles.contains(r))
        {
            return Err(ConfigError::Validation(format!(
                "role '{role}' cannot be both override and excluded"
            )));
        }
        Ok(())
    }

    pub fn to_override_policy(&self) -> OverridePolicy {
        OverridePolicy::new(
            self.access.override_roles.clone(),
            self.access.excluded_roles.clone(),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{0}': {1}")]
    ReadFile(String, String),

    #[error("failed to parse TOML config: {0}")]
    ParseToml(String),

    #[error("config validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_has_sensible_values() {
        let config = AppConfig::default();

        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.level, "info");
        assert!(config.access.override_roles.is_empty());
        assert_eq!(config.access.excluded_roles, vec![Role::AssetManager]);
    }

    #[test]
    fn load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[database]
url = "postgresql://db.internal:5432/anbar"
max_connections = 4

[log]
format = "pretty"
level = "debug"

[access]
override_roles = ["technician"]
excluded_roles = ["asset_manager"]
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(config.database.url, "postgresql://db.internal:5432/anbar");
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(config.access.override_roles, vec![Role::Technician]);
    }

    #[test]
    fn env_vars_override_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[database]
url = "postgresql://from-file:5432/anbar"
"#
        )
        .unwrap();

        // SAFETY: test runs single-threaded for this env var
        unsafe { std::env::set_var("ANBAR_DATABASE_URL", "postgresql://from-env:5432/anbar") };
        let config = AppConfig::load(Some(&path)).unwrap();
        unsafe { std::env::remove_var("ANBAR_DATABASE_URL") };

        assert_eq!(config.database.url, "postgresql://from-env:5432/anbar");
    }

    #[test]
    fn env_role_list_is_parsed_and_unknowns_dropped() {
        // SAFETY: test runs single-threaded for this env var
        unsafe {
            std::env::set_var("ANBAR_ACCESS_OVERRIDE_ROLES", "technician, bogus ,employee")
        };
        let config = AppConfig::load(None).unwrap();
        unsafe { std::env::remove_var("ANBAR_ACCESS_OVERRIDE_ROLES") };

        assert_eq!(
            config.access.override_roles,
            vec![Role::Technician, Role::Employee]
        );
    }

    #[test]
    fn validation_rejects_zero_max_connections() {
        let mut config = AppConfig::default();
        config.database.max_connections = 0;

        let result = config.validate();
        assert!(
            matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("max_connections"))
        );
    }

    #[test]
    fn validation_rejects_role_in_both_sets() {
        let mut config = AppConfig::default();
        config.access.override_roles = vec![Role::AssetManager];

        let result = config.validate();
        assert!(
            matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("asset_manager"))
        );
    }

    #[test]
    fn to_override_policy_reflects_config() {
        let mut config = AppConfig::default();
        config.access.override_roles = vec![Role::Technician];

        let policy = config.to_override_policy();

        let tech = anbar_core::ident::User::new(
            anbar_core::ident::UserId::new(uuid::Uuid::new_v4()),
            Role::Technician,
        );
        assert!(policy.is_override(&tech));
        assert!(policy.is_excluded(Role::AssetManager));
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/anbar.toml")));

        assert!(matches!(result, Err(ConfigError::ReadFile(_, _))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not toml [").unwrap();

        let result = AppConfig::load(Some(&path));

        assert!(matches!(result, Err(ConfigError::ParseToml(_))));
    }
}
