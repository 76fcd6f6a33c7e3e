//! Bounded click queue and the background worker draining it.
//!
//! Redirect handlers call [`ClickQueue::enqueue`], which never waits. When the
//! buffer is full the newest event is dropped and counted. The worker records
//! queued events with bounded concurrency; a failed recording is logged and
//! counted, never retried.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::application::services::ClickService;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::ClickRepository;

/// Sending half of the click pipeline, shared by all request handlers.
#[derive(Debug, Clone)]
pub struct ClickQueue {
    sender: mpsc::Sender<ClickEvent>,
    dropped: Arc<AtomicU64>,
}

impl ClickQueue {
    /// Creates a queue buffering at most `capacity` events.
    ///
    /// A zero capacity is raised to one.
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<ClickEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (
            Self {
                sender,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            receiver,
        )
    }

    /// Queues an event without waiting.
    ///
    /// Returns `false` if the event was dropped because the buffer is full or
    /// the worker has stopped.
    pub fn enqueue(&self, event: ClickEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => {
                metrics::counter!("clicks_enqueued_total").increment(1);
                true
            }
            Err(mpsc::error::TrySendError::Full(event)) => {
                self.record_drop();
                warn!(short_code = %event.short_code, "Click queue full, event dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                self.record_drop();
                warn!(short_code = %event.short_code, "Click queue closed, event dropped");
                false
            }
        }
    }

    /// Events dropped since the queue was created.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Maximum number of buffered events.
    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    /// Free slots right now.
    pub fn available(&self) -> usize {
        self.sender.capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn record_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("clicks_dropped_total").increment(1);
    }
}

/// Drains `rx`, recording up to `concurrency` clicks at once.
///
/// Returns once every sender is gone and in-flight recordings have finished.
pub async fn run_click_worker<C>(
    mut rx: mpsc::Receiver<ClickEvent>,
    service: Arc<ClickService<C>>,
    concurrency: usize,
) where
    C: ClickRepository + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    info!(concurrency, "Click worker started");

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let service = service.clone();
        tasks.spawn(async move {
            let _permit = permit;
            record_event(&service, event).await;
        });

        while let Some(result) = tasks.try_join_next() {
            log_join_error(result);
        }
    }

    while let Some(result) = tasks.join_next().await {
        log_join_error(result);
    }

    info!("Click worker stopped");
}

async fn record_event<C>(service: &ClickService<C>, event: ClickEvent)
where
    C: ClickRepository + ?Sized,
{
    let short_code = event.short_code.clone();

    match service.record(event.into()).await {
        Ok(_) => {
            metrics::counter!("clicks_recorded_total").increment(1);
        }
        Err(e) if e.is_not_found() => {
            metrics::counter!("clicks_failed_total").increment(1);
            debug!(short_code, "Click for unknown short code discarded");
        }
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            error!(short_code, error = %e, "Failed to record click");
        }
    }
}

fn log_join_error(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        error!(error = %e, "Click recording task panicked");
    }
}
