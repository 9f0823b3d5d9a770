use std::sync::atomic::{AtomicI32, Ordering};

/// Process-wide counters, created once at startup and shared as `web::Data`
#[derive(Debug, Default)]
pub struct ApiMetrics {
    fileserver_hits: AtomicI32,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.fileserver_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> i32 {
        self.fileserver_hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.fileserver_hits.store(0, Ordering::Relaxed);
    }
}
