//! # API Configuration Module
//!
//! This module loads configuration for the DevDesk API server from
//! environment variables, providing defaults where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `BOOKING_EXCLUSIVE_SLOTS`: Reject a booking when the slot is already held (default: true)
//! - `PUBLIC_BASE_URL`: Web client origin used for links in emails
//! - `EMAILJS_SERVICE_ID`, `EMAILJS_PUBLIC_KEY`, `EMAILJS_PRIVATE_KEY`,
//!   `EMAILJS_TEMPLATE_ADVISORY_REQUEST`, `EMAILJS_TEMPLATE_ADVISORY_RESPONSE`:
//!   primary email account
//! - `CONTACT_EMAILJS_SERVICE_ID`, `CONTACT_EMAILJS_TEMPLATE_ID`,
//!   `CONTACT_EMAILJS_PUBLIC_KEY`: contact form account
//! - `IMAGE_UPLOAD_URL`, `IMAGE_UPLOAD_PRESET`: image hosting endpoint

use eyre::{Result, WrapErr};
use std::env;
use tracing::Level;

/// Configuration for the DevDesk API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use devdesk_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Serialize bookings per slot and reject when the slot is held
    pub booking_exclusive_slots: bool,

    /// Origin of the web client, used for dashboard links in emails
    pub public_base_url: String,

    pub email: EmailConfig,

    pub image_upload: Option<ImageUploadConfig>,
}

/// Credentials for one EmailJS account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAccountConfig {
    pub service_id: String,
    pub public_key: String,
    pub private_key: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EmailConfig {
    /// Account used for advisory emails; `None` disables them.
    pub primary: Option<EmailAccountConfig>,
    pub advisory_request_template: String,
    pub advisory_response_template: String,

    /// Account used by the contact form; `None` disables it.
    pub contact: Option<EmailAccountConfig>,
    pub contact_template: String,
}

#[derive(Debug, Clone)]
pub struct ImageUploadConfig {
    pub url: String,
    pub preset: Option<String>,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        // Logging settings
        let log_level = match env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Booking policy
        let booking_exclusive_slots = env::var("BOOKING_EXCLUSIVE_SLOTS")
            .map(|value| parse_flag(&value))
            .unwrap_or(true);

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:4200".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            booking_exclusive_slots,
            public_base_url,
            email: EmailConfig::from_env(),
            image_upload: ImageUploadConfig::from_env(),
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl EmailConfig {
    fn from_env() -> Self {
        let primary = account_from_env(
            "EMAILJS_SERVICE_ID",
            "EMAILJS_PUBLIC_KEY",
            Some("EMAILJS_PRIVATE_KEY"),
        );
        let contact = account_from_env(
            "CONTACT_EMAILJS_SERVICE_ID",
            "CONTACT_EMAILJS_PUBLIC_KEY",
            None,
        );

        Self {
            primary,
            advisory_request_template: env::var("EMAILJS_TEMPLATE_ADVISORY_REQUEST")
                .unwrap_or_else(|_| "template_advisory_request".to_string()),
            advisory_response_template: env::var("EMAILJS_TEMPLATE_ADVISORY_RESPONSE")
                .unwrap_or_else(|_| "template_advisory_response".to_string()),
            contact,
            contact_template: env::var("CONTACT_EMAILJS_TEMPLATE_ID")
                .unwrap_or_else(|_| "template_contact".to_string()),
        }
    }
}

impl ImageUploadConfig {
    fn from_env() -> Option<Self> {
        let url = non_empty_var("IMAGE_UPLOAD_URL")?;
        Some(Self {
            url,
            preset: non_empty_var("IMAGE_UPLOAD_PRESET"),
        })
    }
}

fn account_from_env(
    service_var: &str,
    public_key_var: &str,
    private_key_var: Option<&str>,
) -> Option<EmailAccountConfig> {
    Some(EmailAccountConfig {
        service_id: non_empty_var(service_var)?,
        public_key: non_empty_var(public_key_var)?,
        private_key: private_key_var.and_then(non_empty_var),
    })
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
