use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub backend_url: String,
    pub serve_backend: bool,
    pub backend_port: u16,
    pub database_url: String,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            serve_backend: env::var("SERVE_BACKEND")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            backend_port: env::var("BACKEND_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3001),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "servicemart.db".to_string()),
            request_timeout: Duration::from_secs(
                env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }
}
