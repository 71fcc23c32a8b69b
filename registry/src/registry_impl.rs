//! Main registry server implementation
//!
//! Wires the descriptor store into the facade routes and serves them until a
//! shutdown future resolves.

use axum::{
    Router,
    routing::{get, post},
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use shared::{ProcessId, logging, process_info};

use crate::error::{RegistryError, RegistryResult};
use crate::state::RegistryState;
use crate::traits::DescriptorStore;
use crate::web::handlers::{
    self, GET_PATH, HEALTH_PATH, LIST_PATH, RegistryApp, SEARCH_PATH, TOOLS_PATH,
};

/// Registry server with an injected descriptor store
pub struct RegistryServer<S: DescriptorStore> {
    store: Arc<S>,
    bind_address: SocketAddr,
}

impl<S> RegistryServer<S>
where
    S: DescriptorStore + 'static,
{
    pub fn new(store: S, bind_address: SocketAddr) -> Self {
        Self {
            store: Arc::new(store),
            bind_address,
        }
    }

    /// Build the Axum router with all facade routes
    pub fn build_router(&self, state: Arc<RegistryState>) -> Router {
        let app = RegistryApp {
            store: Arc::clone(&self.store),
            state,
        };

        Router::new()
            .route(LIST_PATH, get(handlers::list_servers::<S>))
            .route(GET_PATH, get(handlers::get_server::<S>))
            .route(SEARCH_PATH, get(handlers::search_servers::<S>))
            .route(TOOLS_PATH, post(handlers::update_tools::<S>))
            .route(HEALTH_PATH, get(handlers::health_check::<S>))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(app)
    }

    /// Bind the listening socket. The returned address carries the real port
    /// when the configured port is 0.
    pub async fn bind(&self) -> RegistryResult<(TcpListener, SocketAddr)> {
        let listener = TcpListener::bind(self.bind_address).await.map_err(|e| {
            RegistryError::ServerStartup(format!("Failed to bind to {}: {}", self.bind_address, e))
        })?;
        let local_addr = listener.local_addr()?;
        Ok((listener, local_addr))
    }

    /// Serve on an already bound listener until `shutdown` resolves, then let
    /// in-flight requests finish.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> RegistryResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        let router = self.build_router(Arc::new(RegistryState::new(local_addr)));

        process_info!(ProcessId::current(), "🌐 Registry listening on http://{}", local_addr);
        process_info!(
            ProcessId::current(),
            "Health check: http://{}{}",
            local_addr,
            HEALTH_PATH
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RegistryError::InternalError(format!("Server error: {}", e)))?;

        logging::log_success(ProcessId::current(), "Registry stopped gracefully");
        Ok(())
    }
}
