//! Gateway server — startup, wiring, and graceful shutdown.
//!
//! Startup order matters: the OpenID discovery document is fetched before
//! the listener binds, so the process either starts with a complete
//! verification pipeline or not at all. Nothing mutates the discovery cache
//! afterwards.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::access::AccessPolicy;
use crate::auth::{DiscoveryCache, TokenValidator};
use crate::config::Config;
use crate::fss::FssClient;
use crate::{Error, Result};

use super::router::{AppState, create_router};

/// LAPS backend server
pub struct Server {
    /// Configuration
    config: Config,
}

impl Server {
    /// Create a new server
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the server until shutdown
    pub async fn run(self) -> Result<()> {
        let addr = SocketAddr::new(
            self.config
                .server
                .host
                .parse()
                .map_err(|e| Error::Config(format!("Invalid host: {e}")))?,
            self.config.server.port,
        );

        let http = reqwest::Client::builder()
            .timeout(self.config.server.request_timeout)
            .build()?;

        // Fetch the discovery document once; a failure here aborts startup
        let discovery = DiscoveryCache::load(&http, &self.config.auth.discovery_url)
            .await
            .map_err(|e| Error::Config(format!("OpenID discovery failed: {e}")))?;
        let discovery = Arc::new(discovery);

        let validator = TokenValidator::new(
            http.clone(),
            Arc::clone(&discovery),
            self.config.auth.leeway_secs,
        );
        let policy = AccessPolicy::new(self.config.authorization.clone());
        let fss = FssClient::new(http, &self.config.fss)?;

        let state = Arc::new(AppState {
            validator,
            policy,
            fss,
            public_paths: self.config.auth.public_paths.clone(),
            authorization: self.config.authorization.clone(),
        });

        let app = create_router(state);

        let listener = TcpListener::bind(addr).await?;

        info!("============================================================");
        info!("LAPS BACKEND v{}", env!("CARGO_PKG_VERSION"));
        info!("============================================================");
        info!(host = %self.config.server.host, port = %self.config.server.port, "Listening");
        info!(issuer = discovery.issuer().unwrap_or("<none>"), "Token issuer pinned");
        info!(fss = %self.config.fss.api_url, "FSS upstream");
        if self.config.authorization.0.is_empty() {
            warn!("AUTHORIZATION allow-lists are empty - every protected action will be denied");
        }
        info!("============================================================");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(())
    }
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
