use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

fn default_max_connections() -> u32 {
    5
}

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Parse environment variables into Config struct
        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    let config = Config::load()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_connections_defaults_when_unset() {
        let config: Config = envy::from_iter(vec![(
            "DATABASE_URL".to_owned(),
            "postgres://localhost/clients".to_owned(),
        )])
        .expect("config should parse");

        assert_eq!(config.database_url(), "postgres://localhost/clients");
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn max_connections_reads_from_environment() {
        let config: Config = envy::from_iter(vec![
            (
                "DATABASE_URL".to_owned(),
                "postgres://localhost/clients".to_owned(),
            ),
            ("MAX_CONNECTIONS".to_owned(), "12".to_owned()),
        ])
        .expect("config should parse");

        assert_eq!(config.max_connections, 12);
    }
}
