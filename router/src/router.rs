//! A minimal router that consumes the registry's read operations
//!
//! Ranking candidates is left to callers of `resolve`; this component only
//! tracks registry readiness and narrows a query to an exact match or a list
//! of keyword matches.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

use shared::{
    PageRequest, ProcessId, ServiceDescriptor, logging, process_debug, process_info, process_warn,
};

use crate::config::RouterConfig;
use crate::error::{RouterError, RouterResult};
use crate::lifecycle::TaskContext;
use crate::traits::{DependentTask, RegistryClient};

const REFRESH_TASK: &str = "registry-refresh";

/// Result of resolving a caller's query against the registry
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The query named a registered service
    Exact(ServiceDescriptor),
    /// Keyword matches in registry order, possibly empty
    Candidates(Vec<ServiceDescriptor>),
}

pub struct Router<C: RegistryClient> {
    client: Arc<C>,
    config: RouterConfig,
    known_services: Arc<AtomicUsize>,
    accepting: AtomicBool,
}

impl<C> Router<C>
where
    C: RegistryClient + 'static,
{
    pub fn new(client: C, config: RouterConfig) -> Self {
        Self {
            client: Arc::new(client),
            config,
            known_services: Arc::new(AtomicUsize::new(0)),
            accepting: AtomicBool::new(true),
        }
    }

    /// Service count from the latest successful listing
    pub fn known_services(&self) -> usize {
        self.known_services.load(Ordering::SeqCst)
    }

    /// Probe the registry until it answers a one-item listing, giving up
    /// once another retry would run past `ready_timeout`.
    pub async fn wait_until_ready(&self) -> RouterResult<usize> {
        let started = Instant::now();
        let retry = self.config.ready_retry_interval;

        loop {
            match self.client.list(PageRequest::new(1, 1)).await {
                Ok(page) => return Ok(page.total_count),
                Err(err) => {
                    let waited = started.elapsed();
                    if waited + retry > self.config.ready_timeout {
                        return Err(RouterError::RegistryUnavailable {
                            waited,
                            source: Box::new(err),
                        });
                    }
                    process_debug!(
                        ProcessId::current(),
                        "Registry not ready ({}), retrying in {:?}",
                        err,
                        retry
                    );
                    tokio::time::sleep(retry).await;
                }
            }
        }
    }

    /// Exact name lookup first, keyword search on a miss
    pub async fn resolve(&self, query: &str) -> RouterResult<Resolution> {
        if !self.accepting.load(Ordering::SeqCst) {
            return Err(RouterError::Draining {
                task: "resolve".to_string(),
            });
        }

        let query = query.trim();
        if !query.is_empty() {
            if let Some(descriptor) = self.client.get(query).await? {
                return Ok(Resolution::Exact(descriptor));
            }
        }

        let candidates = self.client.search(query).await?;
        process_debug!(
            ProcessId::current(),
            "Query '{}' resolved to {} candidate(s)",
            query,
            candidates.len()
        );
        Ok(Resolution::Candidates(candidates))
    }
}

async fn refresh_loop<C: RegistryClient>(
    client: Arc<C>,
    known_services: Arc<AtomicUsize>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> RouterResult<()> {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while !*shutdown.borrow() {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => match client.list(PageRequest::new(1, 1)).await {
                Ok(page) => {
                    let previous = known_services.swap(page.total_count, Ordering::SeqCst);
                    if previous != page.total_count {
                        process_info!(
                            ProcessId::current(),
                            "Registry now lists {} service(s) (was {})",
                            page.total_count,
                            previous
                        );
                    }
                }
                Err(err) => {
                    process_warn!(ProcessId::current(), "⚠️ Registry refresh failed: {}", err);
                }
            },
        }
    }

    process_debug!(ProcessId::current(), "Registry refresh stopped");
    Ok(())
}

#[async_trait]
impl<C> DependentTask for Router<C>
where
    C: RegistryClient + 'static,
{
    async fn start(&mut self, ctx: &TaskContext) -> RouterResult<()> {
        logging::log_startup(ProcessId::current(), "nacos mcp router");

        let total = self.wait_until_ready().await?;
        self.known_services.store(total, Ordering::SeqCst);
        process_info!(
            ProcessId::current(),
            "Registry ready at {} with {} service(s)",
            self.config.registry_url,
            total
        );

        ctx.spawn(
            REFRESH_TASK,
            refresh_loop(
                Arc::clone(&self.client),
                Arc::clone(&self.known_services),
                self.config.refresh_interval,
                ctx.shutdown_requested(),
            ),
        )
    }

    async fn shutdown(&mut self) -> RouterResult<()> {
        self.accepting.store(false, Ordering::SeqCst);
        process_info!(ProcessId::current(), "Router no longer accepting queries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_REGISTRY_URL;
    use crate::lifecycle::{FatalSink, StateCell};
    use crate::traits::{MockRegistryClient, MockTerminator};
    use mockall::predicate::eq;
    use shared::{LocalServerConfig, PageData};

    fn config() -> RouterConfig {
        let mut config = RouterConfig::new(DEFAULT_REGISTRY_URL).unwrap();
        config.ready_timeout = Duration::from_secs(2);
        config.ready_retry_interval = Duration::from_millis(500);
        config.refresh_interval = Duration::from_secs(30);
        config
    }

    fn descriptor(name: &str) -> ServiceDescriptor {
        ServiceDescriptor::local(
            name,
            "test descriptor",
            LocalServerConfig::new("node", ["server.js"]),
            chrono::Utc::now(),
        )
    }

    fn page(total: usize) -> PageData {
        PageData {
            page_items: Vec::new(),
            total_count: total,
            page_no: 1,
            page_size: 1,
        }
    }

    fn quiet_context() -> TaskContext {
        let mut terminator = MockTerminator::new();
        terminator.expect_exit().times(0);
        TaskContext::new(Arc::new(FatalSink::new(
            Arc::new(StateCell::new()),
            Arc::new(terminator),
            Duration::ZERO,
        )))
    }

    #[tokio::test]
    async fn test_resolve_exact_match() {
        let mut client = MockRegistryClient::new();
        client
            .expect_get()
            .with(eq("file-server"))
            .returning(|name| Ok(Some(descriptor(name))));
        client.expect_search().times(0);
        let router = Router::new(client, config());

        let resolution = router.resolve("  file-server ").await.unwrap();

        assert!(matches!(resolution, Resolution::Exact(d) if d.name == "file-server"));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_search() {
        let mut client = MockRegistryClient::new();
        client.expect_get().returning(|_| Ok(None));
        client
            .expect_search()
            .with(eq("database"))
            .returning(|_| Ok(vec![descriptor("database-query-server")]));
        let router = Router::new(client, config());

        let resolution = router.resolve("database").await.unwrap();

        match resolution {
            Resolution::Candidates(found) => {
                let names: Vec<_> = found.iter().map(|d| d.name.as_str()).collect();
                assert_eq!(names, vec!["database-query-server"]);
            }
            other => panic!("expected candidates, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_empty_query_skips_lookup() {
        let mut client = MockRegistryClient::new();
        client.expect_get().times(0);
        client
            .expect_search()
            .with(eq(""))
            .returning(|_| Ok(Vec::new()));
        let router = Router::new(client, config());

        assert_eq!(router.resolve("   ").await.unwrap(), Resolution::Candidates(Vec::new()));
    }

    #[tokio::test]
    async fn test_resolve_propagates_registry_errors() {
        let mut client = MockRegistryClient::new();
        client
            .expect_get()
            .returning(|_| Err(RouterError::registry("503")));
        let router = Router::new(client, config());

        assert!(matches!(
            router.resolve("anything").await,
            Err(RouterError::Registry { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_probe_retries_until_registry_answers() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let mut client = MockRegistryClient::new();
        client
            .expect_list()
            .with(eq(PageRequest::new(1, 1)))
            .returning(move |_| {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(RouterError::registry("connection refused"))
                } else {
                    Ok(page(3))
                }
            });
        let router = Router::new(client, config());

        assert_eq!(router.wait_until_ready().await.unwrap(), 3);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_probe_gives_up_after_timeout() {
        let mut client = MockRegistryClient::new();
        client
            .expect_list()
            .returning(|_| Err(RouterError::registry("connection refused")));
        let router = Router::new(client, config());

        let err = router.wait_until_ready().await.unwrap_err();

        match err {
            RouterError::RegistryUnavailable { waited, source } => {
                assert!(waited <= Duration::from_secs(2));
                assert!(source.to_string().contains("connection refused"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_refreshes_until_drained() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut client = MockRegistryClient::new();
        client.expect_list().returning(move |_| {
            match counter.fetch_add(1, Ordering::SeqCst) {
                0 => Ok(page(3)),
                1 => Err(RouterError::registry("blip")),
                _ => Ok(page(5)),
            }
        });
        let mut router = Router::new(client, config());
        let ctx = quiet_context();

        router.start(&ctx).await.unwrap();
        assert_eq!(router.known_services(), 3);
        assert_eq!(ctx.in_flight(), 1);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(router.known_services(), 3);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(router.known_services(), 5);

        ctx.begin_drain();
        router.shutdown().await.unwrap();
        assert_eq!(ctx.wait_idle(Duration::from_secs(1)).await, 0);
        assert!(matches!(
            router.resolve("file-server").await,
            Err(RouterError::Draining { .. })
        ));
    }
}
