use std::env;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Where the job catalog reads its records from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Hosted backend `jobs` collection, with the sample set as fallback.
    Remote,
    /// Fixed sample records only; no backend round-trip.
    Sample,
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog_source: CatalogSource,
    pub backend: Option<BackendConfig>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let backend = match env::var("BACKEND_URL") {
            Ok(base_url) => {
                let service_key =
                    env::var("BACKEND_SERVICE_KEY").map_err(|_| ConfigError::MissingServiceKey)?;
                let resume_bucket =
                    env::var("BACKEND_RESUME_BUCKET").unwrap_or_else(|_| "resumes".to_string());
                Some(BackendConfig {
                    base_url: base_url.trim_end_matches('/').to_string(),
                    service_key,
                    resume_bucket,
                })
            }
            Err(_) => None,
        };

        // The remote catalog is the default whenever a backend is configured;
        // APP_CATALOG_SOURCE can pin either variant explicitly.
        let catalog_source = match env::var("APP_CATALOG_SOURCE") {
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "remote" => CatalogSource::Remote,
                "sample" => CatalogSource::Sample,
                _ => return Err(ConfigError::InvalidCatalogSource { value: raw }),
            },
            Err(_) if backend.is_some() => CatalogSource::Remote,
            Err(_) => CatalogSource::Sample,
        };

        if catalog_source == CatalogSource::Remote && backend.is_none() {
            return Err(ConfigError::CatalogSourceRequiresBackend);
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog_source,
            backend,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Connection settings for the hosted data/auth/storage collaborator.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub service_key: String,
    pub resume_bucket: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("APP_CATALOG_SOURCE must be 'remote' or 'sample', got '{value}'")]
    InvalidCatalogSource { value: String },
    #[error("APP_CATALOG_SOURCE=remote requires BACKEND_URL to be set")]
    CatalogSourceRequiresBackend,
    #[error("BACKEND_URL is set but BACKEND_SERVICE_KEY is missing")]
    MissingServiceKey,
}
