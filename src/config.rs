use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::sync::Arc;

use crate::render::{JsonRenderer, PlainTextRenderer, Renderer};
use crate::report::{ErrorReporter, TracingReporter};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub errors: ErrorConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ErrorConfig {
    pub environment: Environment,
    pub format: ErrorFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => bail!("unknown environment `{}`", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorFormat {
    #[default]
    Json,
    Text,
}

impl FromStr for ErrorFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "plain" => Ok(Self::Text),
            other => bail!("unknown error format `{}`", other),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("API_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .context("API_PORT must be a valid port number")?,
            },
            errors: ErrorConfig {
                environment: env::var("APP_ENV")
                    .unwrap_or_else(|_| "production".to_string())
                    .parse()
                    .context("APP_ENV must be `development` or `production`")?,
                format: env::var("ERROR_FORMAT")
                    .unwrap_or_else(|_| "json".to_string())
                    .parse()
                    .context("ERROR_FORMAT must be `json` or `text`")?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Configuration the internal-error strategy consults on every dispatch
pub trait AppConfig: Send + Sync {
    fn is_development(&self) -> bool;
    fn error_reporter(&self) -> &dyn ErrorReporter;
    fn renderer(&self) -> &dyn Renderer;
}

/// [`AppConfig`] backed by the environment settings
#[derive(Clone)]
pub struct ErrorHandling {
    development: bool,
    reporter: Arc<dyn ErrorReporter>,
    renderer: Arc<dyn Renderer>,
}

impl ErrorHandling {
    pub fn new(
        development: bool,
        reporter: Arc<dyn ErrorReporter>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            development,
            reporter,
            renderer,
        }
    }

    pub fn from_config(config: &ErrorConfig) -> Self {
        let renderer: Arc<dyn Renderer> = match config.format {
            ErrorFormat::Json => Arc::new(JsonRenderer),
            ErrorFormat::Text => Arc::new(PlainTextRenderer),
        };

        Self::new(
            config.environment == Environment::Development,
            Arc::new(TracingReporter),
            renderer,
        )
    }
}

impl AppConfig for ErrorHandling {
    fn is_development(&self) -> bool {
        self.development
    }

    fn error_reporter(&self) -> &dyn ErrorReporter {
        self.reporter.as_ref()
    }

    fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }
}
