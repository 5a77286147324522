use lead_outreach::config::OutreachConfig;
use lead_outreach::workflows::outreach::{
    InMemoryLeadRepository, LeadIngestionService, SystemClock,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type OutreachService = LeadIngestionService<InMemoryLeadRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local pipeline on the wall clock. State is lost on restart.
pub(crate) fn in_memory_service(config: OutreachConfig) -> Arc<OutreachService> {
    Arc::new(LeadIngestionService::new(
        Arc::new(InMemoryLeadRepository::new()),
        Arc::new(SystemClock),
        config,
    ))
}
