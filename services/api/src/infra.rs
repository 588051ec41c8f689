use metrics_exporter_prometheus::PrometheusHandle;
use opportunity_match::applications::{ApplicationLifecycle, ReapplyPolicy};
use opportunity_match::store::MemoryStore;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Lifecycle backed by the process-local store. Records do not survive a restart.
pub(crate) fn in_memory_lifecycle(policy: ReapplyPolicy) -> Arc<ApplicationLifecycle<MemoryStore>> {
    let store = Arc::new(MemoryStore::default());
    Arc::new(ApplicationLifecycle::with_policy(store, policy))
}
