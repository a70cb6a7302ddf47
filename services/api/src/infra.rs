use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tradehire::config::PipelineConfig;
use tradehire::workflows::hiring::{HiringPipeline, InMemoryHiringStore};

pub(crate) type MemoryPipeline = HiringPipeline<InMemoryHiringStore, InMemoryHiringStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// One in-memory store backs both the primary tables and the notification inbox.
pub(crate) fn in_memory_pipeline(config: &PipelineConfig) -> Arc<MemoryPipeline> {
    let store = Arc::new(InMemoryHiringStore::new());
    Arc::new(HiringPipeline::new(store.clone(), store, config))
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}
