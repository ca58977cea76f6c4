//! View-count worker.
//!
//! Reads enqueue a post ID without waiting; a background task drains the
//! queue, coalesces increments per post and applies them in one update each.
//! Events are dropped when the queue is full or the process stops.

use std::collections::HashMap;

use quill_db::repositories::PostRepository;
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

/// Largest number of distinct posts flushed in one pass.
const MAX_BATCH: usize = 256;

/// Handle for recording views.
#[derive(Clone)]
pub struct ViewCounter {
    sender: mpsc::Sender<String>,
}

impl ViewCounter {
    /// Record one view of `post_id`. Never blocks.
    pub fn record(&self, post_id: &str) {
        match self.sender.try_send(post_id.to_string()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                debug!(post_id = %post_id, "View queue full, dropping view");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(post_id = %post_id, "View worker stopped, dropping view");
            }
        }
    }
}

/// Owns the queue until the worker is started.
pub struct ViewCountService {
    sender: mpsc::Sender<String>,
    receiver: mpsc::Receiver<String>,
}

impl ViewCountService {
    /// Create a queue holding up to `capacity` pending views.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self { sender, receiver }
    }

    /// Get a handle for recording views.
    #[must_use]
    pub fn counter(&self) -> ViewCounter {
        ViewCounter {
            sender: self.sender.clone(),
        }
    }

    /// Spawn the worker. It exits once every [`ViewCounter`] is dropped.
    pub fn start(self, post_repo: PostRepository) -> JoinHandle<()> {
        let Self { sender, receiver } = self;
        drop(sender);

        tokio::spawn(async move {
            info!("View counter worker starting");
            run_worker(receiver, post_repo).await;
            info!("View counter worker stopped");
        })
    }
}

async fn run_worker(mut receiver: mpsc::Receiver<String>, post_repo: PostRepository) {
    let mut pending: HashMap<String, i32> = HashMap::new();

    while let Some(post_id) = receiver.recv().await {
        *pending.entry(post_id).or_default() += 1;

        while pending.len() < MAX_BATCH {
            match receiver.try_recv() {
                Ok(post_id) => *pending.entry(post_id).or_default() += 1,
                Err(_) => break,
            }
        }

        flush(&post_repo, &mut pending).await;
    }
}

async fn flush(post_repo: &PostRepository, pending: &mut HashMap<String, i32>) {
    for (post_id, views) in pending.drain() {
        if let Err(e) = post_repo.add_views(&post_id, views).await {
            error!(post_id = %post_id, views, error = %e, "Failed to apply view increments");
        }
    }
}
