use crate::auth::jwt::JwtConfig;

/// Which document store backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Some(Self::Postgres),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long background tasks get to drain on shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub store_backend: StoreBackend,
    /// Required when the backend is Postgres.
    pub database_url: Option<String>,
    /// Base URL of the file upload proxy. Uploads are disabled without it.
    pub upload_proxy_url: Option<String>,
    pub upload_proxy_api_key: Option<String>,
    /// Minimum password length for sign-up and password changes (default: `8`).
    pub password_min_length: usize,
    /// Lifetime of a password reset token in minutes (default: `60`).
    pub password_reset_expiry_mins: i64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                    |
    /// |------------------------------|----------------------------|
    /// | `HOST`                       | `0.0.0.0`                  |
    /// | `PORT`                       | `3000`                     |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`      | `30`                       |
    /// | `STORE_BACKEND`              | `postgres`                 |
    /// | `DATABASE_URL`               | --                         |
    /// | `UPLOAD_PROXY_URL`           | --                         |
    /// | `UPLOAD_PROXY_API_KEY`       | --                         |
    /// | `PASSWORD_MIN_LENGTH`        | `8`                        |
    /// | `PASSWORD_RESET_EXPIRY_MINS` | `60`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let store_backend = std::env::var("STORE_BACKEND")
            .map(|v| StoreBackend::parse(&v).expect("STORE_BACKEND must be 'postgres' or 'memory'"))
            .unwrap_or(StoreBackend::Postgres);

        let password_min_length: usize = std::env::var("PASSWORD_MIN_LENGTH")
            .unwrap_or_else(|_| "8".into())
            .parse()
            .expect("PASSWORD_MIN_LENGTH must be a valid usize");

        let password_reset_expiry_mins: i64 = std::env::var("PASSWORD_RESET_EXPIRY_MINS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("PASSWORD_RESET_EXPIRY_MINS must be a valid i64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            store_backend,
            database_url: non_empty_var("DATABASE_URL"),
            upload_proxy_url: non_empty_var("UPLOAD_PROXY_URL"),
            upload_proxy_api_key: non_empty_var("UPLOAD_PROXY_API_KEY"),
            password_min_length,
            password_reset_expiry_mins,
            jwt: JwtConfig::from_env(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
