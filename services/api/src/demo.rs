use chrono::{Duration, Utc};
use clap::Args;
use lead_outreach::config::OutreachConfig;
use lead_outreach::error::AppError;
use lead_outreach::workflows::outreach::{
    DataSource, DeliveryEventType, InMemoryLeadRepository, InboundLead, LeadIngestionService,
    ManagerDashboardSnapshot, ManualClock, MessageCta, MessageGenerationControls,
    MessageTemplate, MessageTone, OutcomeStatus,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Recipient used for the approved lead's send
    #[arg(long, default_value = "jane.doe@acme.example")]
    pub(crate) recipient: String,
    /// Print the dashboard and compliance snapshot as JSON
    #[arg(long)]
    pub(crate) json: bool,
    /// Stop after the send, skipping delivery and CRM feedback
    #[arg(long)]
    pub(crate) skip_feedback: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let service = LeadIngestionService::new(
        Arc::new(InMemoryLeadRepository::new()),
        clock.clone(),
        OutreachConfig::default(),
    );

    println!("Lead outreach demo");
    let ingested = service.ingest("Vetted Data Co", demo_leads())?;
    println!(
        "- Ingested {} leads from {} (ids {:?})",
        ingested.accepted,
        ingested.provider_name,
        ingested.lead_ids.iter().map(|id| id.0).collect::<Vec<_>>()
    );

    for lead in service.list_leads() {
        let score = service.score_lead(lead.id)?;
        println!(
            "  {} ({} @ {}) -> ICP score {}",
            lead.full_name, lead.title, lead.company, score.score
        );
        for item in score.breakdown.iter().filter(|item| item.matched) {
            println!("    + {} ({} pts)", item.rule, item.points);
        }
    }

    let controls = MessageGenerationControls {
        tone: MessageTone::Friendly,
        template: MessageTemplate::Intro,
        cta: MessageCta::BookCall,
    };
    let (approved_id, rejected_id) = (ingested.lead_ids[0], ingested.lead_ids[1]);

    let mut revisions = Vec::new();
    for lead_id in [approved_id, rejected_id] {
        let draft = service.generate_message_draft(lead_id, controls)?;
        println!("- Draft for lead {lead_id}: \"{}\"", draft.subject);
        revisions.push(service.submit_draft_for_approval(lead_id, draft)?);
    }

    if let Err(err) = service.send_approved_message(approved_id, &args.recipient) {
        println!("  Send before review refused: {err}");
    }

    clock.advance(Duration::minutes(45));
    for (revision, approve) in revisions.iter().zip([true, false]) {
        let reviewed = service.review_draft(
            revision.revision_id,
            "Morgan Lee",
            approve,
            (!approve).then(|| "Company is outside the current ICP".to_string()),
        )?;
        println!(
            "- Revision {} for lead {} -> {}",
            reviewed.revision_id,
            reviewed.lead_id,
            reviewed.status.label()
        );
    }

    let sent = service.send_approved_message(approved_id, &args.recipient)?;
    println!("- Sent \"{}\" to {}", sent.subject, sent.recipient);
    if let Err(err) = service.assert_send_allowed(rejected_id) {
        println!("  Lead {rejected_id} stays blocked: {err}");
    }

    if !args.skip_feedback {
        clock.advance(Duration::hours(6));
        service.record_delivery_event(approved_id, DeliveryEventType::Delivered, &args.recipient)?;
        clock.advance(Duration::days(9));
        let outcome = service.sync_crm_outcome(approved_id, OutcomeStatus::Won, Some(18_000.0))?;
        println!(
            "- CRM ({}) reports lead {} {}",
            outcome.crm_name,
            outcome.lead_id,
            outcome.status.label()
        );
        service.sync_crm_outcome(rejected_id, OutcomeStatus::Lost, None)?;

        let quality = service.get_scoring_quality_snapshot(None);
        println!(
            "- Scoring quality: {} labeled, {} high-score, win rate {:.0}%",
            quality.total_labeled,
            quality.high_score_count,
            quality.high_score_win_rate * 100.0
        );
    }

    let dashboard = service.get_manager_dashboard();
    let compliance = service.get_compliance_snapshot();
    if args.json {
        let payload = serde_json::json!({ "dashboard": dashboard, "compliance": compliance });
        match serde_json::to_string_pretty(&payload) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("  Snapshot unavailable: {err}"),
        }
    } else {
        render_dashboard(&dashboard);
        println!(
            "\nAudit trail: {} entries, {} pending approvals",
            compliance.total_audit_events, compliance.pending_approvals
        );
    }

    Ok(())
}

fn render_dashboard(dashboard: &ManagerDashboardSnapshot) {
    let activity = &dashboard.activity;
    let funnel = &dashboard.funnel;
    println!("\nManager dashboard");
    println!(
        "  Activity: {} leads, {} drafts submitted, {} reviewed ({} approved / {} rejected)",
        activity.leads_ingested,
        activity.drafts_submitted,
        activity.drafts_reviewed,
        activity.approved_drafts,
        activity.rejected_drafts
    );
    println!(
        "  Funnel: {} leads -> {} approved -> {} sent -> {} delivered ({} bounced, {} complaints)",
        funnel.leads_total,
        funnel.leads_with_approved_draft,
        funnel.messages_sent,
        funnel.messages_delivered,
        funnel.messages_bounced,
        funnel.complaints
    );
}

fn demo_leads() -> Vec<InboundLead> {
    vec![
        InboundLead {
            full_name: "Jane Doe".to_string(),
            title: "Head of Sales".to_string(),
            company: "Acme B2B SaaS".to_string(),
            profile_url: "https://www.linkedin.com/in/jane-doe".to_string(),
            source: DataSource::OfficialApi,
        },
        InboundLead {
            full_name: "Lee Chan".to_string(),
            title: "Office Manager".to_string(),
            company: "Corner Bakery".to_string(),
            profile_url: "https://corner-bakery.example/team/lee".to_string(),
            source: DataSource::VettedProvider,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_runs_end_to_end() {
        let args = DemoArgs {
            recipient: "jane.doe@acme.example".to_string(),
            json: true,
            skip_feedback: false,
        };
        assert!(run_demo(args).is_ok());
    }

    #[test]
    fn demo_surfaces_invalid_recipients() {
        let args = DemoArgs {
            recipient: "not-an-email".to_string(),
            json: false,
            skip_feedback: true,
        };
        assert!(matches!(run_demo(args), Err(AppError::Outreach(_))));
    }
}
