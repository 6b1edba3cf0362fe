use std::fmt;
use std::str::FromStr;

use see_core::{ConfigError, ConfigProperties, SeeConfig};

/// Storage engine behind the member repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Memory,
    Sqlite,
    Postgres,
    MySql,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(ProviderKind::Memory),
            "sqlite" => Ok(ProviderKind::Sqlite),
            "postgres" | "postgresql" => Ok(ProviderKind::Postgres),
            "mysql" => Ok(ProviderKind::MySql),
            other => Err(format!("unknown database provider '{other}'")),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::Memory => "memory",
            ProviderKind::Sqlite => "sqlite",
            ProviderKind::Postgres => "postgres",
            ProviderKind::MySql => "mysql",
        };
        f.write_str(name)
    }
}

/// `database.*` section.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub provider: ProviderKind,
    /// Required for every provider except `memory`.
    pub url: String,
    pub max_connections: u32,
}

impl ConfigProperties for DatabaseConfig {
    fn prefix() -> &'static str {
        "database"
    }

    fn from_config(config: &SeeConfig) -> Result<Self, ConfigError> {
        let provider_key = Self::key("provider");
        let provider: ProviderKind = config
            .get_or(&provider_key, "sqlite".to_string())
            .parse()
            .map_err(|_| ConfigError::TypeMismatch {
                key: provider_key,
                expected: "one of memory, sqlite, postgres, mysql",
            })?;
        let url = match provider {
            ProviderKind::Memory => config.get_or(&Self::key("url"), String::new()),
            _ => config.get(&Self::key("url"))?,
        };
        Ok(Self {
            provider,
            url,
            max_connections: config.get_or(&Self::key("max_connections"), 5),
        })
    }
}

/// `server.*` section.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
}

impl ConfigProperties for ServerConfig {
    fn prefix() -> &'static str {
        "server"
    }

    fn from_config(config: &SeeConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            addr: config.get_or(&Self::key("addr"), "0.0.0.0:3000".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_defaults() {
        let config = SeeConfig::from_yaml_str("database:\n  url: \"sqlite::memory:\"\n", "test").unwrap();
        let db: DatabaseConfig = config.section().unwrap();
        assert_eq!(db.provider, ProviderKind::Sqlite);
        assert_eq!(db.url, "sqlite::memory:");
        assert_eq!(db.max_connections, 5);
    }

    #[test]
    fn url_required_for_sql_providers() {
        let config = SeeConfig::from_yaml_str("database:\n  provider: postgres\n", "test").unwrap();
        let err = config.section::<DatabaseConfig>().unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn memory_needs_no_url() {
        let config = SeeConfig::from_yaml_str("database:\n  provider: Memory\n", "test").unwrap();
        let db: DatabaseConfig = config.section().unwrap();
        assert_eq!(db.provider, ProviderKind::Memory);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let config = SeeConfig::from_yaml_str("database:\n  provider: oracle\n", "test").unwrap();
        assert!(matches!(
            config.section::<DatabaseConfig>(),
            Err(ConfigError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn server_addr_default() {
        let server: ServerConfig = SeeConfig::empty().section().unwrap();
        assert_eq!(server.addr, "0.0.0.0:3000");
    }
}
