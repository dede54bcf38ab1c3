//! # DevDesk API
//!
//! The API crate provides the web server for the DevDesk portfolio and
//! advisory booking service: accounts and roles, programmer portfolios,
//! weekly availability, advisory bookings with notifications, and the
//! contact form.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Parse requests, check access and shape responses
//! - **Booking**: The advisory workflow and its side steps
//! - **Middleware**: Authentication, role guards and error mapping
//! - **Email / Uploads**: Outbound HTTP integrations
//! - **Config**: Environment configuration
//!
//! Storage is reached only through [`devdesk_db::store::Store`], so the
//! whole router can be exercised against a mock store.

/// Advisory booking workflow
pub mod booking;
/// Configuration module for API settings
pub mod config;
/// Outbound email dispatch
pub mod email;
/// Request handlers
pub mod handlers;
/// Middleware for authentication, access control and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Image hosting
pub mod uploads;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use chrono::{NaiveDate, Utc};
use devdesk_db::{store::Store, DbPool, PgStore};
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::{
    email::{EmailJsMailer, Mailer},
    uploads::{HttpImageHost, ImageHost},
};

/// Source of the current calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// The server's UTC date.
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Utc::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// Reject a booking when a pending or approved advisory holds the slot.
    pub exclusive_slots: bool,
    /// Web client origin used for links in outgoing emails.
    pub public_base_url: String,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            exclusive_slots: true,
            public_base_url: "http://localhost:4200".to_string(),
        }
    }
}

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub store: Arc<dyn Store>,
    pub mailer: Arc<dyn Mailer>,
    pub images: Arc<dyn ImageHost>,
    pub booking: BookingPolicy,
    pub clock: Clock,
}

impl ApiState {
    /// Wires the production integrations around a Postgres pool.
    pub fn from_config(config: &config::ApiConfig, db_pool: DbPool) -> Self {
        Self {
            store: Arc::new(PgStore::new(db_pool)),
            mailer: Arc::new(EmailJsMailer::new(config.email.clone())),
            images: Arc::new(HttpImageHost::new(config.image_upload.clone())),
            booking: BookingPolicy {
                exclusive_slots: config.booking_exclusive_slots,
                public_base_url: config.public_base_url.clone(),
            },
            clock: Clock::System,
        }
    }
}

/// Builds the application router with all routes attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Sign-up, sign-in and session endpoints
        .merge(routes::auth::routes())
        // User directory and role management
        .merge(routes::users::routes())
        // Portfolio projects
        .merge(routes::projects::routes())
        // Programmer availability windows
        .merge(routes::schedule::routes())
        // Bookable slots
        .merge(routes::availability::routes())
        // Advisory bookings
        .merge(routes::advisory::routes())
        // In-app notifications
        .merge(routes::notifications::routes())
        // Route access decisions for the web client
        .merge(routes::navigation::routes())
        // Contact form and image uploads
        .merge(routes::contact::routes())
        .merge(routes::uploads::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration and database connection
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = devdesk_api::config::ApiConfig::from_env()?;
/// let db_pool = devdesk_db::create_pool(&config.database_url).await?;
/// devdesk_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if config.email.primary.is_none() {
        warn!("EmailJS is not configured; advisory emails will be skipped");
    }

    let state = Arc::new(ApiState::from_config(&config, db_pool));

    let app = app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
