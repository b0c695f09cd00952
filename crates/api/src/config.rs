use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Bearer-token verification settings.
    pub jwt: JwtConfig,
    /// A running timer with no heartbeat for this long is paused by the reaper.
    pub status_stale_secs: u64,
    /// How often the reaper scans for stale timers.
    pub status_reap_interval_secs: u64,
    /// Command line for the companion focus tracker, if one is installed.
    pub focus_tracker_cmd: Option<String>,
    /// Base URL the focus tracker uses to call back into this server.
    pub public_api_url: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                  |
    /// |-----------------------------|--------------------------|
    /// | `HOST`                      | `0.0.0.0`                |
    /// | `PORT`                      | `3000`                   |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                     |
    /// | `STATUS_STALE_SECS`         | `60`                     |
    /// | `STATUS_REAP_INTERVAL_SECS` | `15`                     |
    /// | `FOCUS_TRACKER_CMD`         | unset                    |
    /// | `PUBLIC_API_URL`            | `http://localhost:3000`  |
    ///
    /// See [`JwtConfig::from_env`] for the token settings.
    ///
    /// # Panics
    ///
    /// Panics on unparseable numbers; misconfiguration should fail at startup.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let status_stale_secs: u64 = env_or("STATUS_STALE_SECS", "60")
            .parse()
            .expect("STATUS_STALE_SECS must be a valid u64");

        let status_reap_interval_secs: u64 = env_or("STATUS_REAP_INTERVAL_SECS", "15")
            .parse()
            .expect("STATUS_REAP_INTERVAL_SECS must be a valid u64");
        assert!(
            status_reap_interval_secs > 0,
            "STATUS_REAP_INTERVAL_SECS must be greater than zero"
        );

        let focus_tracker_cmd = std::env::var("FOCUS_TRACKER_CMD")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let public_api_url = env_or("PUBLIC_API_URL", "http://localhost:3000");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            status_stale_secs,
            status_reap_interval_secs,
            focus_tracker_cmd,
            public_api_url,
        }
    }
}
