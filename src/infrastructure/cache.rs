use log::debug;

/// Downstream read-cache invalidation. Writers call this after every
/// successful mutation; failures are swallowed since the cache is a
/// freshness optimization, not a source of truth.
pub trait CacheSink: Send + Sync {
    /// Drops every cached entry whose key starts with `prefix`.
    fn invalidate(&self, prefix: &str);
}

/// Used when no external cache is wired in.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCache;

impl CacheSink for NoopCache {
    fn invalidate(&self, _prefix: &str) {}
}

/// Logs invalidations instead of performing them. Handy when tracing which
/// mutations would evict which keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogCache;

impl CacheSink for LogCache {
    fn invalidate(&self, prefix: &str) {
        debug!("cache invalidate prefix={prefix}");
    }
}
