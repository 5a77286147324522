use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::config::OutreachConfig;
use crate::workflows::outreach::{
    outreach_router, Clock, DataSource, InMemoryLeadRepository, InboundLead, LeadId, LeadIngestionService,
    ManualClock, MessageCta, MessageGenerationControls, MessageTemplate, MessageTone,
};

pub(super) type TestService = LeadIngestionService<InMemoryLeadRepository>;

pub(super) fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 12, 9, 30, 0).unwrap()
}

/// Clock that moves forward one second on every read.
#[derive(Debug, Default)]
pub(super) struct TickingClock {
    ticks: AtomicI64,
}

impl Clock for TickingClock {
    fn now(&self) -> DateTime<Utc> {
        start_time() + Duration::seconds(self.ticks.fetch_add(1, Ordering::SeqCst))
    }
}

/// Run `work` on eight threads, `per_worker` times each.
pub(super) fn run_concurrently<F>(per_worker: usize, work: F)
where
    F: Fn(u64) + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let handles: Vec<_> = (0..8u64)
        .map(|worker| {
            let work = Arc::clone(&work);
            std::thread::spawn(move || (0..per_worker).for_each(|_| work(worker)))
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker finished");
    }
}

pub(super) fn inbound_lead(full_name: &str, title: &str, company: &str) -> InboundLead {
    InboundLead {
        full_name: full_name.to_string(),
        title: title.to_string(),
        company: company.to_string(),
        profile_url: format!(
            "https://www.linkedin.com/in/{}",
            full_name.to_lowercase().replace(' ', "-")
        ),
        source: DataSource::OfficialApi,
    }
}

pub(super) fn icp_lead() -> InboundLead {
    inbound_lead("Jane Doe", "Head of Sales", "Acme B2B SaaS")
}

pub(super) fn controls() -> MessageGenerationControls {
    MessageGenerationControls {
        tone: MessageTone::Professional,
        template: MessageTemplate::Intro,
        cta: MessageCta::BookCall,
    }
}

pub(super) fn build_service() -> (TestService, Arc<InMemoryLeadRepository>, Arc<ManualClock>) {
    let repository = Arc::new(InMemoryLeadRepository::new());
    let clock = Arc::new(ManualClock::new(start_time()));
    let service = LeadIngestionService::new(
        repository.clone(),
        clock.clone(),
        OutreachConfig::default(),
    );
    (service, repository, clock)
}

/// Ingest one lead and return its id.
pub(super) fn ingest_one(service: &TestService, lead: InboundLead) -> LeadId {
    service
        .ingest("Vetted Data Co", vec![lead])
        .expect("ingest succeeds")
        .lead_ids[0]
}

/// Ingest, draft, submit and approve, leaving the lead ready to send.
pub(super) fn approved_lead(service: &TestService) -> LeadId {
    let lead_id = ingest_one(service, icp_lead());
    let draft = service
        .generate_message_draft(lead_id, controls())
        .expect("draft generated");
    let approval = service
        .submit_draft_for_approval(lead_id, draft)
        .expect("draft submitted");
    service
        .review_draft(approval.revision_id, "Morgan Lee", true, None)
        .expect("draft approved");
    lead_id
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    outreach_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
