use anyhow::Context;
use std::{net::SocketAddr, time::Duration};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Static bearer token required by write endpoints
    pub api_token: String,
    pub export_ttl: Duration,
    pub export_wait_timeout: Option<Duration>,
    pub export_sweep_interval: Duration,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_u64(key: &str, default: u64) -> anyhow::Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("CQ_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid CQ_LISTEN_ADDR")?;
        let db_path = env_or("CQ_DB_PATH", "./db/app.db");
        let cors_allow = env_or("CQ_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms = env_u64("CQ_REQUEST_TIMEOUT_MS", 30_000)?;
        let api_token = env_or("CQ_API_TOKEN", "mysecrettoken");
        let export_ttl = Duration::from_secs(env_u64("CQ_EXPORT_TTL_SECS", 3600)?);
        let export_wait_timeout = match std::env::var("CQ_EXPORT_WAIT_TIMEOUT_MS") {
            Ok(_) => Some(Duration::from_millis(env_u64("CQ_EXPORT_WAIT_TIMEOUT_MS", 0)?)),
            Err(_) => None,
        };
        let export_sweep_interval =
            Duration::from_secs(env_u64("CQ_EXPORT_SWEEP_SECS", 300)?.max(1));

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            api_token,
            export_ttl,
            export_wait_timeout,
            export_sweep_interval,
        })
    }
}
