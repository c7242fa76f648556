//! Per-message page state for queue listings
//!
//! The bridge only tells us which message a navigation button belongs to,
//! so the current page is remembered per message id. Entries expire after
//! the pagination timeout; an unknown or expired message starts at page 0.

use cadence_core::MessageId;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct PageEntry {
    page: usize,
    touched_at: DateTime<Utc>,
}

/// In-memory page positions with a TTL
#[derive(Debug)]
pub struct PageStore {
    ttl: Duration,
    entries: Mutex<HashMap<MessageId, PageEntry>>,
}

impl PageStore {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::seconds(300)),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Current page of `message`, 0 when unknown or expired
    pub async fn current(&self, message: &MessageId) -> usize {
        self.current_at(message, Utc::now()).await
    }

    pub async fn store(&self, message: MessageId, page: usize) {
        self.store_at(message, page, Utc::now()).await;
    }

    /// Drop expired entries, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now()).await
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    async fn current_at(&self, message: &MessageId, now: DateTime<Utc>) -> usize {
        let entries = self.entries.lock().await;
        entries
            .get(message)
            .filter(|entry| now - entry.touched_at < self.ttl)
            .map(|entry| entry.page)
            .unwrap_or(0)
    }

    async fn store_at(&self, message: MessageId, page: usize, now: DateTime<Utc>) {
        self.entries.lock().await.insert(
            message,
            PageEntry {
                page,
                touched_at: now,
            },
        );
    }

    async fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| now - entry.touched_at < self.ttl);
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "Expired page state purged");
        }
        removed
    }
}
