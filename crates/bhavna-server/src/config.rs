//! Server configuration

use bhavna_classifiers::EngineConfig;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use crate::state::{SessionStore, DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS};

#[derive(Parser, Debug, Clone)]
#[command(name = "bhavna-server")]
#[command(about = "Bhavna code-mixed sentiment chat server", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "bhavna.yaml")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Hugging Face API token
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    pub hf_token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Complete server configuration: listener plus engine settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ListenConfig,

    #[serde(default)]
    pub sessions: SessionConfig,

    #[serde(flatten)]
    pub engine: EngineConfig,
}

/// Listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenConfig {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
        }
    }
}

/// Session lifetime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds without requests before a session is dropped
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Live sessions kept before the least recently used is evicted
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Seconds between background sweeps for expired sessions
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            max_sessions: default_max_sessions(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }

    /// Empty store with these limits
    pub fn store(&self) -> SessionStore {
        SessionStore::with_limits(self.idle_timeout(), self.max_sessions)
    }
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            tracing::info!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        if let Some(listen) = &cli.listen {
            config.server.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            config.server.port = port;
        }

        config.engine.validate()?;
        Ok(config)
    }

    /// Socket address to bind
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self.server.listen.parse()?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_idle_timeout_secs() -> u64 {
    DEFAULT_IDLE_TIMEOUT.as_secs()
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

fn default_cleanup_interval_secs() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("bhavna-server").chain(args.iter().copied()))
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let cli = cli(&[]);
        let config = ServerConfig::load("/nonexistent/bhavna.yaml", &cli).unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8000");
        assert!(config.engine.local.enabled);
        assert_eq!(config.sessions.idle_timeout(), DEFAULT_IDLE_TIMEOUT);
        assert_eq!(config.sessions.max_sessions, DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn test_session_limits_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bhavna.yaml");
        std::fs::write(
            &path,
            "sessions:\n  idle_timeout_secs: 120\n  max_sessions: 5\n",
        )
        .unwrap();

        let config = ServerConfig::load(&path.to_string_lossy(), &cli(&[])).unwrap();
        assert_eq!(config.sessions.idle_timeout(), Duration::from_secs(120));
        assert_eq!(config.sessions.max_sessions, 5);
        assert_eq!(config.sessions.cleanup_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_invalid_engine_settings_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bhavna.yaml");
        std::fs::write(&path, "remote:\n  timeout_ms: 0\n").unwrap();

        assert!(ServerConfig::load(&path.to_string_lossy(), &cli(&[])).is_err());
    }

    #[test]
    fn test_file_and_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bhavna.yaml");
        std::fs::write(
            &path,
            "server:\n  listen: 0.0.0.0\n  port: 9000\nremote:\n  timeout_ms: 500\nlocal:\n  enabled: false\n",
        )
        .unwrap();
        let path = path.to_string_lossy().to_string();

        let config = ServerConfig::load(&path, &cli(&[])).unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:9000");
        assert_eq!(config.engine.remote.timeout_ms, 500);
        assert!(!config.engine.local.enabled);

        let config = ServerConfig::load(&path, &cli(&["--port", "9100", "-l", "::1"])).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.socket_addr().unwrap().to_string(), "[::1]:9100");
    }
}
