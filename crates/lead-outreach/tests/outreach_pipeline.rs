use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use lead_outreach::config::OutreachConfig;
use lead_outreach::workflows::outreach::{
    DataSource, DeliveryEventType, InMemoryLeadRepository, InboundLead, LeadIngestionService,
    ManualClock, MessageCta, MessageGenerationControls, MessageTemplate, MessageTone,
    OutcomeStatus, OutreachError,
};

fn lead(full_name: &str, title: &str, company: &str) -> InboundLead {
    InboundLead {
        full_name: full_name.to_string(),
        title: title.to_string(),
        company: company.to_string(),
        profile_url: "https://www.linkedin.com/in/prospect".to_string(),
        source: DataSource::VettedProvider,
    }
}

#[test]
fn full_pipeline_from_ingest_to_feedback() {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 7, 1, 8, 0, 0).unwrap(),
    ));
    let service = LeadIngestionService::new(
        Arc::new(InMemoryLeadRepository::new()),
        clock.clone(),
        OutreachConfig {
            default_crm: "salesforce".to_string(),
            ..OutreachConfig::default()
        },
    );

    let ingested = service
        .ingest(
            "Vetted Data Co",
            vec![
                lead("Jane Doe", "Head of Sales", "Acme B2B SaaS"),
                lead("Lee Chan", "Office Manager", "Corner Bakery"),
            ],
        )
        .expect("batch accepted");
    let (strong, weak) = (ingested.lead_ids[0], ingested.lead_ids[1]);

    assert_eq!(service.score_lead(strong).expect("scored").score, 100);
    assert_eq!(service.score_lead(weak).expect("scored").score, 40);

    let controls = MessageGenerationControls {
        tone: MessageTone::Direct,
        template: MessageTemplate::Intro,
        cta: MessageCta::Reply,
    };
    let draft = service
        .generate_message_draft(strong, controls)
        .expect("draft generated");
    let revision = service
        .submit_draft_for_approval(strong, draft)
        .expect("submitted");

    assert!(matches!(
        service.send_approved_message(strong, "jane@acme.example"),
        Err(OutreachError::SendNotAllowed { .. })
    ));

    clock.advance(Duration::hours(2));
    service
        .review_draft(revision.revision_id, "Morgan Lee", true, Some("Ship it".to_string()))
        .expect("approved");

    let sent = service
        .send_approved_message(strong, "jane@acme.example")
        .expect("sent");
    assert_eq!(sent.subject, "Intro idea for Acme B2B SaaS");
    service
        .record_delivery_event(strong, DeliveryEventType::Delivered, "jane@acme.example")
        .expect("delivered");

    let outcome = service
        .sync_crm_outcome(strong, OutcomeStatus::Won, Some(24_000.0))
        .expect("synced");
    assert_eq!(outcome.crm_name, "salesforce");
    service
        .sync_crm_outcome(weak, OutcomeStatus::Lost, None)
        .expect("synced");

    let quality = service.get_scoring_quality_snapshot(None);
    assert_eq!(quality.total_labeled, 2);
    assert_eq!(quality.high_score_count, 1);
    assert!((quality.high_score_win_rate - 1.0).abs() < f64::EPSILON);

    let dashboard = service.get_manager_dashboard();
    assert_eq!(dashboard.funnel.leads_with_approved_draft, 1);
    assert_eq!(dashboard.funnel.messages_delivered, 1);

    let compliance = service.get_compliance_snapshot();
    assert_eq!(compliance.total_audit_events, 7);
    assert_eq!(compliance.pending_approvals, 0);
}
