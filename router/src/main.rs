//! Router process entry point

use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use router::config::DEFAULT_REGISTRY_URL;
use router::{
    HttpRegistryClient, LifecycleConfig, LifecycleManager, Outcome, ProcessTerminator, Router,
    RouterConfig,
};
use shared::{ProcessId, logging, signals};

/// Command line arguments, with environment fallbacks
#[derive(Parser, Debug)]
#[command(name = "router")]
#[command(about = "MCP router that discovers services through the registry")]
struct Args {
    /// Base URL of the registry facade
    #[arg(long, env = "REGISTRY_URL", default_value = DEFAULT_REGISTRY_URL)]
    registry_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// How long to wait for the registry to answer on startup
    #[arg(long, default_value = "10000")]
    ready_timeout_ms: u64,

    /// Interval between registry refreshes
    #[arg(long, default_value = "30000")]
    refresh_interval_ms: u64,

    /// Delay between a fatal log line and process exit
    #[arg(long, default_value = "100")]
    grace_period_ms: u64,

    /// Upper bound on draining in-flight work at shutdown
    #[arg(long, default_value = "5000")]
    drain_timeout_ms: u64,
}

impl Args {
    fn router_config(&self) -> router::RouterResult<RouterConfig> {
        let mut config = RouterConfig::new(&self.registry_url)?;
        config.ready_timeout = Duration::from_millis(self.ready_timeout_ms);
        config.refresh_interval = Duration::from_millis(self.refresh_interval_ms);
        Ok(config)
    }

    fn lifecycle_config(&self) -> LifecycleConfig {
        LifecycleConfig {
            grace_period: Duration::from_millis(self.grace_period_ms),
            drain_timeout: Duration::from_millis(self.drain_timeout_ms),
            trap_panics: true,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    ProcessId::init_router();
    logging::init_tracing_with_level(Some(&args.log_level));

    let built = args.router_config().and_then(|config| {
        let client = HttpRegistryClient::new(&config.registry_url, config.request_timeout)?;
        Ok(Router::new(client, config))
    });
    let mut router = match built {
        Ok(router) => router,
        Err(err) => {
            logging::log_error(ProcessId::current(), "Router configuration", &err);
            return ExitCode::FAILURE;
        }
    };

    let manager = LifecycleManager::new(args.lifecycle_config(), Arc::new(ProcessTerminator));
    match manager.run(&mut router, shutdown_signal()).await {
        Outcome::Clean => ExitCode::SUCCESS,
        Outcome::Fatal => {
            // The fatal sink owns the exit; wait for its grace period to end
            std::future::pending::<()>().await;
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = signals::wait_for_shutdown_signal().await {
        logging::log_error(ProcessId::current(), "Signal handling", &err);
        std::future::pending::<()>().await;
    }
}
