//! LAPS Backend Library
//!
//! Backend-for-frontend for local authority payment statements. Proxies the
//! FSS finance service, adding OIDC token verification, role-based access
//! control, and audit logging for every sensitive data access.
//!
//! # Request pipeline
//!
//! ```text
//! Request arrives
//!   -> Token validation (RS256 signature, issuer, claim extraction)
//!   -> Access control   (route key -> permission key -> role allow-list)
//!   -> Handler          (masking / refusal decided by the access decision)
//!   -> Audit            (one record per outcome, fire-and-forget)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod access;
pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod fss;
pub mod gateway;

pub use error::{Error, Result};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        Some("json") => {
            subscriber.with(fmt::layer().json()).init();
        }
        _ => {
            subscriber.with(fmt::layer()).init();
        }
    }

    Ok(())
}
