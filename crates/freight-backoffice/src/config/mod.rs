use std::env;
use std::fmt;
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

/// Top-level configuration for the back-office service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub review: ReviewLinkConfig,
    pub email: EmailConfig,
    pub admin: AdminConfig,
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

        let public_base_url =
            env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let provider = EmailProvider::parse(
            &env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "resend".to_string()),
        )?;
        let from_address = env::var("FROM_EMAIL")
            .unwrap_or_else(|_| "BTFS Dispatch <operations@boxtruckfs.com>".to_string());

        let admin_email =
            env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@boxtruckfs.com".to_string());
        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "dispatch".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            review: ReviewLinkConfig { public_base_url },
            email: EmailConfig {
                provider,
                from_address,
                resend_api_key: env::var("RESEND_API_KEY").ok().filter(|key| !key.is_empty()),
                sendgrid_api_key: env::var("SENDGRID_API_KEY")
                    .ok()
                    .filter(|key| !key.is_empty()),
                disable_sending: flag("DISABLE_EMAIL_SENDING"),
                disable_endpoint_auth: flag("DISABLE_EMAIL_AUTH"),
            },
            admin: AdminConfig {
                email: admin_email,
                password: admin_password,
            },
        })
    }
}

fn flag(name: &str) -> bool {
    env::var(name)
        .map(|value| value.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
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

/// Base URL embedded in generated review links.
#[derive(Debug, Clone)]
pub struct ReviewLinkConfig {
    pub public_base_url: String,
}

/// Admin console credentials checked by the auth boundary.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

/// Which outbound email provider the dispatcher hands messages to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailProvider {
    Resend,
    SendGrid,
}

impl EmailProvider {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "resend" => Ok(Self::Resend),
            "sendgrid" => Ok(Self::SendGrid),
            other => Err(ConfigError::UnknownEmailProvider {
                value: other.to_string(),
            }),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Resend => "resend",
            Self::SendGrid => "sendgrid",
        }
    }
}

/// Outbound email settings shared by the dispatcher and the send endpoint.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub provider: EmailProvider,
    pub from_address: String,
    pub resend_api_key: Option<String>,
    pub sendgrid_api_key: Option<String>,
    pub disable_sending: bool,
    pub disable_endpoint_auth: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    UnknownEmailProvider { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::UnknownEmailProvider { value } => {
                write!(
                    f,
                    "EMAIL_PROVIDER must be 'resend' or 'sendgrid', got '{value}'"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::UnknownEmailProvider { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
