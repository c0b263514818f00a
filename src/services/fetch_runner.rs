//! Background fetch runner
//!
//! Executes catalog requests on a small tokio runtime and hands the
//! responses back to the UI thread through a channel, polled on every tick.

use super::catalog::{execute, CatalogClient, CatalogRequest, CatalogResponse};
use crate::error::CatalogError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

const WORKER_THREADS: usize = 2;

/// Runs catalog requests off the UI thread
pub struct FetchRunner {
    runtime: Runtime,
    client: Arc<dyn CatalogClient>,
    timeout: Duration,
    sender: Sender<CatalogResponse>,
    receiver: Receiver<CatalogResponse>,
    in_flight: AtomicUsize,
}

impl FetchRunner {
    pub fn new(client: Arc<dyn CatalogClient>, timeout: Duration) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(WORKER_THREADS)
            .thread_name("catalog-fetch")
            .enable_all()
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to start fetch runtime: {}", e))?;
        let (sender, receiver) = mpsc::channel();

        Ok(Self {
            runtime,
            client,
            timeout,
            sender,
            receiver,
            in_flight: AtomicUsize::new(0),
        })
    }

    /// Number of requests spawned but not yet returned by `poll`
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn spawn(&self, request: CatalogRequest) {
        let client = Arc::clone(&self.client);
        let tx = self.sender.clone();
        let timeout = self.timeout;

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        debug!(
            generation = request.generation,
            kind = request.query.kind(),
            "spawning catalog request"
        );

        self.runtime.spawn(async move {
            let CatalogRequest { generation, query } = request;
            let result =
                match tokio::time::timeout(timeout, execute(client.as_ref(), &query)).await {
                    Ok(result) => result,
                    Err(_) => Err(CatalogError::Timeout(timeout.as_secs())),
                };

            if let Err(ref err) = result {
                warn!(generation, kind = query.kind(), error = %err, "catalog request failed");
            }

            // Receiver gone means the app is shutting down
            let _ = tx.send(CatalogResponse {
                generation,
                query,
                result,
            });
        });
    }

    pub fn spawn_all(&self, requests: impl IntoIterator<Item = CatalogRequest>) {
        for request in requests {
            self.spawn(request);
        }
    }

    /// Drain every response that has arrived so far
    pub fn poll(&self) -> Vec<CatalogResponse> {
        let mut responses = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(response) => {
                    self.in_flight.fetch_sub(1, Ordering::SeqCst);
                    responses.push(response);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Family, Genus, GenusByLetter, Item, ItemQuery, Species};
    use crate::services::catalog::{CatalogPayload, CatalogQuery};
    use crate::services::memory::MemoryCatalog;
    use async_trait::async_trait;
    use std::time::Instant;
    use uuid::Uuid;

    fn wait_for(runner: &FetchRunner, count: usize) -> Vec<CatalogResponse> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut responses = Vec::new();
        while responses.len() < count && Instant::now() < deadline {
            responses.extend(runner.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        responses
    }

    struct StalledCatalog;

    #[async_trait]
    impl CatalogClient for StalledCatalog {
        async fn list_families(&self, _: Uuid) -> Result<Vec<Family>, CatalogError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Vec::new())
        }
        async fn list_genera(&self, _: Uuid, _: bool) -> Result<Vec<Genus>, CatalogError> {
            Ok(Vec::new())
        }
        async fn list_genera_by_letter(
            &self,
            _: char,
            _: bool,
        ) -> Result<Vec<GenusByLetter>, CatalogError> {
            Ok(Vec::new())
        }
        async fn list_species(&self, _: Uuid, _: bool) -> Result<Vec<Species>, CatalogError> {
            Ok(Vec::new())
        }
        async fn list_items(&self, _: &ItemQuery) -> Result<Vec<Item>, CatalogError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_response_keeps_request_generation() {
        let catalog = MemoryCatalog::demo();
        let catalog_id = catalog.catalog_id();
        let runner = FetchRunner::new(Arc::new(catalog), Duration::from_secs(5)).unwrap();

        runner.spawn(CatalogRequest {
            generation: 7,
            query: CatalogQuery::Families { catalog_id },
        });

        let responses = wait_for(&runner, 1);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].generation, 7);
        assert!(matches!(
            responses[0].result,
            Ok(CatalogPayload::Families(ref f)) if !f.is_empty()
        ));
        assert_eq!(runner.in_flight(), 0);
    }

    #[test]
    fn test_stalled_request_times_out() {
        let runner =
            FetchRunner::new(Arc::new(StalledCatalog), Duration::from_millis(50)).unwrap();

        runner.spawn(CatalogRequest {
            generation: 1,
            query: CatalogQuery::Families {
                catalog_id: Uuid::nil(),
            },
        });

        let responses = wait_for(&runner, 1);
        assert_eq!(responses.len(), 1);
        assert!(matches!(responses[0].result, Err(CatalogError::Timeout(_))));
    }

    #[test]
    fn test_in_flight_counts_until_polled() {
        let catalog = MemoryCatalog::demo();
        let catalog_id = catalog.catalog_id();
        let runner = FetchRunner::new(Arc::new(catalog), Duration::from_secs(5)).unwrap();

        runner.spawn_all((1..=3).map(|generation| CatalogRequest {
            generation,
            query: CatalogQuery::Families { catalog_id },
        }));
        assert_eq!(runner.in_flight(), 3);

        // Delivered but not yet polled responses still count
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(runner.in_flight(), 3);

        let responses = wait_for(&runner, 3);
        assert_eq!(responses.len(), 3);
        assert_eq!(runner.in_flight(), 0);
    }

    #[test]
    fn test_poll_without_requests_is_empty() {
        let runner =
            FetchRunner::new(Arc::new(MemoryCatalog::demo()), Duration::from_secs(1)).unwrap();
        assert!(runner.poll().is_empty());
        assert_eq!(runner.in_flight(), 0);
    }
}
