use clap::Parser;

/// Process-wide configuration, loaded from CLI flags with environment
/// fallbacks — the environment variable names match spec §6 exactly so the
/// same `docker-compose` style deployment config works unmodified.
#[derive(Parser, Debug, Clone)]
#[command(name = "arbspread-node", about = "Cross-exchange arbitrage-spread discovery pipeline")]
pub struct Settings {
    /// Redis host for the cache layer (C4).
    #[arg(long, env = "REDIS_HOST", default_value = "redis")]
    pub redis_host: String,

    #[arg(long, env = "REDIS_PORT", default_value_t = 6379)]
    pub redis_port: u16,

    #[arg(long, env = "REDIS_DB", default_value_t = 0)]
    pub redis_db: u8,

    /// Postgres connection settings for the persistent catalog (C3).
    #[arg(long, env = "POSTGRES_DB", default_value = "postgres")]
    pub postgres_db: String,

    #[arg(long, env = "POSTGRES_USER", default_value = "postgres")]
    pub postgres_user: String,

    #[arg(long, env = "POSTGRES_PASSWORD", default_value = "root")]
    pub postgres_password: String,

    #[arg(long, env = "POSTGRES_HOST", default_value = "db")]
    pub postgres_host: String,

    #[arg(long, env = "DRIVER_NAME", default_value = "postgresql")]
    pub driver_name: String,

    /// HTTP listen port for the REST surface (§6).
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Display-time normalization for `SpreadMax.time`; purely a
    /// presentation concern, the stored timestamp stays UTC-epoch-ms.
    #[arg(long, env = "TIMEZONE")]
    pub timezone: Option<String>,

    /// Arbitrability threshold (§3): a pair needs support from at least this
    /// many exchanges to enter the universe.
    #[arg(long, default_value_t = 2)]
    pub arbitrability_threshold: i64,

    /// PE rows processed per concurrent fan-out chunk (§4.5).
    #[arg(long, default_value_t = 100)]
    pub chunk_size: usize,

    /// Pause between chunks, to pace external API calls (§4.5).
    #[arg(long, default_value = "500ms", value_parser = humantime_duration)]
    pub chunk_pause: std::time::Duration,
}

fn humantime_duration(s: &str) -> Result<std::time::Duration, String> {
    humantime_serde::re::humantime::parse_duration(s).map_err(|e| e.to_string())
}

impl Settings {
    pub fn postgres_url(&self) -> String {
        format!(
            "{}://{}:{}@{}/{}",
            self.driver_name, self.postgres_user, self.postgres_password, self.postgres_host, self.postgres_db
        )
    }

    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/{}", self.redis_host, self.redis_port, self.redis_db)
    }
}
