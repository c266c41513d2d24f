use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub sweep_interval_secs: u64,
    pub default_block_minutes: i64, // used when a shop has no slot interval
    pub refresh_interval_secs: u64,
    pub refresh_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS").unwrap_or_else(|_| "300".to_string()).parse().expect("SWEEP_INTERVAL_SECS must be a number"),
            default_block_minutes: env::var("DEFAULT_BLOCK_MINUTES").unwrap_or_else(|_| "20".to_string()).parse().expect("DEFAULT_BLOCK_MINUTES must be a number"),
            refresh_interval_secs: env::var("REFRESH_INTERVAL_SECS").unwrap_or_else(|_| "120".to_string()).parse().expect("REFRESH_INTERVAL_SECS must be a number"),
            refresh_timeout_secs: env::var("REFRESH_TIMEOUT_SECS").unwrap_or_else(|_| "10".to_string()).parse().expect("REFRESH_TIMEOUT_SECS must be a number"),
        }
    }
}
