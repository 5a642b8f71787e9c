//! In-process counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle shared by all request handlers
#[derive(Debug, Default)]
pub struct Metrics {
    downloads_requested: AtomicU64,
    downloads_succeeded: AtomicU64,
    downloads_failed: AtomicU64,
    profile_lookups: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn download_requested(&self) {
        self.downloads_requested.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "downloads_requested", "Metric incremented");
    }

    pub fn download_succeeded(&self) {
        self.downloads_succeeded.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "downloads_succeeded", "Metric incremented");
    }

    pub fn download_failed(&self) {
        self.downloads_failed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "downloads_failed", "Metric incremented");
    }

    pub fn profile_lookup(&self) {
        self.profile_lookups.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "profile_lookups", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            downloads_requested: self.downloads_requested.load(Ordering::Relaxed),
            downloads_succeeded: self.downloads_succeeded.load(Ordering::Relaxed),
            downloads_failed: self.downloads_failed.load(Ordering::Relaxed),
            profile_lookups: self.profile_lookups.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub downloads_requested: u64,
    pub downloads_succeeded: u64,
    pub downloads_failed: u64,
    pub profile_lookups: u64,
}
