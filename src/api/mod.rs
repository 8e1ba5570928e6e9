//! HTTP API server for the thermostat skill

pub mod health;
pub mod speechlet;

use std::sync::Arc;

use axum::{Router, routing::post};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::Result;
use crate::config::DeviceConfig;
use crate::dispatcher::IntentDispatcher;

/// Shared state for API handlers
pub struct ApiState {
    pub dispatcher: IntentDispatcher,
    pub device: DeviceConfig,
    /// Whether inbound application IDs are verified
    pub application_check: bool,
}

/// Configuration for building an API server
pub struct ApiServerBuilder {
    dispatcher: IntentDispatcher,
    device: DeviceConfig,
    application_check: bool,
    port: u16,
}

impl ApiServerBuilder {
    /// Create a new API server builder
    #[must_use]
    pub fn new(dispatcher: IntentDispatcher, port: u16) -> Self {
        Self {
            dispatcher,
            device: DeviceConfig::default(),
            application_check: false,
            port,
        }
    }

    /// Set the device configuration reported by `/api/status`
    #[must_use]
    pub fn device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }

    /// Record whether the dispatcher verifies application IDs
    #[must_use]
    pub fn application_check(mut self, enabled: bool) -> Self {
        self.application_check = enabled;
        self
    }

    /// Build the API server
    #[must_use]
    pub fn build(self) -> ApiServer {
        ApiServer {
            state: Arc::new(ApiState {
                dispatcher: self.dispatcher,
                device: self.device,
                application_check: self.application_check,
            }),
            port: self.port,
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Build the router with all routes
    #[must_use]
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener
    ///
    /// # Errors
    ///
    /// Returns error if the server fails while running
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let port = listener.local_addr().map(|a| a.port()).unwrap_or(self.port);
        tracing::info!(port, "API server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}

/// Build the full router over shared state
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/speechlet", post(speechlet::handle_invocation))
        .with_state(state.clone())
        .merge(health::router())
        .merge(health::status_router(state))
        .layer(CatchPanicLayer::custom(speechlet::panic_failure))
        .layer(TraceLayer::new_for_http())
}
