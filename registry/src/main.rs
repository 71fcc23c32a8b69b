//! Registry process entry point

use clap::Parser;
use std::net::SocketAddr;

use registry::{InMemoryStore, RegistryError, RegistryResult, RegistryServer, fixtures};
use shared::{ProcessId, logging, process_info, signals};

/// Command line arguments, with environment fallbacks
#[derive(Parser, Debug)]
#[command(name = "registry")]
#[command(about = "MCP discovery registry serving the descriptor catalog")]
struct Args {
    /// Host to bind to
    #[arg(long, env = "REGISTRY_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "REGISTRY_PORT", default_value = "8848")]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Acknowledge tools updates for unknown names instead of answering 404
    #[arg(long)]
    permissive_tools_update: bool,
}

#[tokio::main]
async fn main() -> RegistryResult<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    ProcessId::init_registry();
    logging::init_tracing_with_level(Some(&args.log_level));
    logging::log_startup(ProcessId::current(), "MCP discovery registry");

    let bind_address: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|e| RegistryError::config(format!("Invalid bind address: {}", e)))?;

    let catalog = fixtures::fixture_catalog()?;
    process_info!(ProcessId::current(), "Loaded {} descriptors", catalog.len());

    let store = InMemoryStore::new(catalog).with_permissive_tools_update(args.permissive_tools_update);
    let server = RegistryServer::new(store, bind_address);

    let (listener, _) = server.bind().await.inspect_err(|e| {
        logging::log_error(ProcessId::current(), "Registry startup", e);
    })?;

    server.serve(listener, shutdown_signal()).await
}

/// Resolves on the first termination signal. If signal registration fails the
/// server keeps running rather than shutting down immediately.
async fn shutdown_signal() {
    match signals::wait_for_shutdown_signal().await {
        Ok(()) => logging::log_shutdown(ProcessId::current(), "termination signal received"),
        Err(err) => {
            logging::log_error(ProcessId::current(), "Signal handling", &err);
            std::future::pending::<()>().await;
        }
    }
}
