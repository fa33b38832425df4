use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub reconcile_interval_secs: u64,
    pub auto_assign_enabled: bool,
    pub assign_backend_url: Option<String>,
    pub service_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://roomops.db?mode=rwc".to_string());

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let reconcile_interval_secs = env::var("RECONCILE_INTERVAL_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidReconcileInterval)?;

        let auto_assign_enabled = env::var("AUTO_ASSIGN_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        // When set, assignment attempts go to a remote instance instead of
        // the in-process service
        let assign_backend_url = env::var("ASSIGN_BACKEND_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let service_name = env::var("SERVICE_NAME").unwrap_or_else(|_| "roomops".to_string());

        Ok(Config {
            database_url,
            server_host,
            server_port,
            reconcile_interval_secs,
            auto_assign_enabled,
            assign_backend_url,
            service_name,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid reconcile interval")]
    InvalidReconcileInterval,
}
