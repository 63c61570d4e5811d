use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://robot.db".into()),
            max_connections: parsed_var("DB_MAX_CONNECTIONS").unwrap_or(5),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parsed_var("APP_PORT").unwrap_or(5000),
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        bind_addr(&self.host, self.port)
    }
}

impl TelemetryConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: std::env::var("TELEMETRY_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parsed_var("TELEMETRY_PORT").unwrap_or(5001),
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        bind_addr(&self.host, self.port)
    }
}

fn parsed_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

fn bind_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", host, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_accepts_ipv4_host() {
        let cfg = TelemetryConfig {
            host: "127.0.0.1".into(),
            port: 5001,
        };
        assert_eq!(cfg.socket_addr().unwrap().port(), 5001);
    }

    #[test]
    fn bind_addr_rejects_garbage_host() {
        let cfg = AppConfig {
            database_url: "sqlite::memory:".into(),
            max_connections: 1,
            host: "not a host".into(),
            port: 5000,
        };
        let err = cfg.socket_addr().unwrap_err();
        assert!(err.to_string().contains("invalid bind address"));
    }
}
