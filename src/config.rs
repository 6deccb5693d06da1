use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

/// Which persistence collaborator backs the profile store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // Persistence
    pub store: StoreBackend,

    // Redis (optional read cache)
    pub redis_url: Option<String>,
    pub redis_cache_ttl_seconds: u64,

    // CORS
    pub cors_allow_origins: Vec<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Environment::from_str(&var("ENV").unwrap_or_else(|| "dev".to_string()));
        let server_addr = var("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        // Persistence
        let store = match var("STORE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" => StoreBackend::Postgres {
                database_url: var("DATABASE_URL").context("DATABASE_URL must be set")?,
                max_connections: positive_var(&var, "DATABASE_MAX_CONNECTIONS", 10)?,
            },
            "memory" => StoreBackend::Memory,
            other => bail!("Unknown STORE_BACKEND '{other}' (expected postgres or memory)"),
        };

        // Redis
        let redis_url = var("REDIS_URL").filter(|s| !s.trim().is_empty());
        let redis_cache_ttl_seconds = positive_var(&var, "REDIS_CACHE_TTL_SECONDS", 3600)?;

        // CORS
        let cors_allow_origins = var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Settings {
            env,
            server_addr,
            store,
            redis_url,
            redis_cache_ttl_seconds,
            cors_allow_origins,
        })
    }
}

/// Settings for the profile client
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_url: Url,
    pub timeout: Duration,
}

impl ClientSettings {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw = var("PROFILE_API_URL").unwrap_or_else(|| "http://localhost:8080".to_string());
        let api_url = Url::parse(&raw).with_context(|| format!("Invalid PROFILE_API_URL '{raw}'"))?;
        let timeout_seconds: u64 = positive_var(&var, "PROFILE_API_TIMEOUT_SECONDS", 30)?;

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_seconds),
        })
    }
}

/// Unset means `default`; a set value must parse and be non-zero.
fn positive_var<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr + Default + PartialEq,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(raw) = var(key) else {
        return Ok(default);
    };
    let value: T = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid {key} '{raw}'"))?;
    if value == T::default() {
        bail!("{key} must be greater than zero");
    }
    Ok(value)
}
