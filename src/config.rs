use anyhow::{anyhow, Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub run_migrations: bool,
    pub nats_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = get("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;

        let port = get("PORT")
            .unwrap_or_else(|| "8083".to_string())
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let db_max_connections = get("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MAX_CONNECTIONS as u32")?;

        let run_migrations = match get("RUN_MIGRATIONS").as_deref().unwrap_or("true") {
            "true" | "1" => true,
            "false" | "0" => false,
            other => return Err(anyhow!("RUN_MIGRATIONS must be 'true' or 'false', got '{}'", other)),
        };

        let nats_url = get("NATS_URL").filter(|url| !url.trim().is_empty());

        Ok(Self { database_url, port, db_max_connections, run_migrations, nats_url })
    }
}
