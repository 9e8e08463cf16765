use std::env;
use std::fmt;

const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;
const DEFAULT_BCRYPT_COST: u32 = 10;
const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

/// `DATABASE_URL` value that selects the in-process store instead of PostgreSQL.
pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
    pub max_image_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed_or(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            )?,
            server_port: parsed_or("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            jwt_secret: required("JWT_SECRET")?,
            token_ttl_days: parsed_or("TOKEN_TTL_DAYS", DEFAULT_TOKEN_TTL_DAYS)?,
            bcrypt_cost: parsed_or("BCRYPT_COST", DEFAULT_BCRYPT_COST)?,
            max_image_bytes: parsed_or("MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn parsed_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
