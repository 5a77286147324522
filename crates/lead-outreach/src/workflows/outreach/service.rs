use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::OutreachConfig;

use super::approval::{ApprovalError, ApprovalWorkflow, DraftApproval, RevisionId};
use super::audit::{actions, payload, AuditEvent, AuditLog};
use super::clock::Clock;
use super::crm::{
    CrmOutcomeRecord, CrmOutcomeSync, CrmSyncError, OutcomeStatus, ScoringQualitySnapshot,
};
use super::delivery::{
    DeliveryError, DeliveryEvent, DeliveryEventType, DeliveryTelemetry, OutboundChannel,
};
use super::domain::{InboundLead, IngestLeadsResponse, Lead, LeadId, LeadValidationError};
use super::messaging::{MessageDraft, MessageDraftGenerator, MessageGenerationControls};
use super::reporting::{
    ComplianceReporter, ComplianceSnapshot, ManagerDashboardBuilder, ManagerDashboardSnapshot,
};
use super::scoring::{IcpRuleConfig, LeadScoreResult, RuleBasedScorer};
use super::store::LeadRepository;

const MIN_PROVIDER_CHARS: usize = 2;
const MIN_REVIEWER_CHARS: usize = 2;

/// Error raised by the outreach service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OutreachError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    NotFound(String),
    #[error("revision_id {0} already reviewed")]
    AlreadyReviewed(RevisionId),
    #[error("lead_id {lead_id} has no approved draft revision")]
    SendNotAllowed { lead_id: LeadId },
}

impl OutreachError {
    fn lead_not_found(lead_id: LeadId) -> Self {
        Self::NotFound(format!("lead_id {lead_id} not found"))
    }
}

impl From<LeadValidationError> for OutreachError {
    fn from(value: LeadValidationError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

impl From<ApprovalError> for OutreachError {
    fn from(value: ApprovalError) -> Self {
        match value {
            ApprovalError::NotFound(_) => Self::NotFound(value.to_string()),
            ApprovalError::AlreadyReviewed { revision_id, .. } => {
                Self::AlreadyReviewed(revision_id)
            }
        }
    }
}

impl From<DeliveryError> for OutreachError {
    fn from(value: DeliveryError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

impl From<CrmSyncError> for OutreachError {
    fn from(value: CrmSyncError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

/// Counts removed by one retention run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetentionReport {
    pub max_age_days: u32,
    pub cutoff: DateTime<Utc>,
    pub delivery_events_purged: usize,
    pub crm_outcomes_purged: usize,
    pub audit_events_purged: usize,
}

/// Orchestrates the lead store and pipeline collaborators behind one audited API.
///
/// Each collaborator guards its own state. Operations touch them one at a time, so no call
/// ever holds two collaborator locks at once.
pub struct LeadIngestionService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    config: OutreachConfig,
    scorer: RwLock<RuleBasedScorer>,
    drafter: MessageDraftGenerator,
    approvals: ApprovalWorkflow,
    delivery: DeliveryTelemetry,
    crm: CrmOutcomeSync,
    audit: AuditLog,
    dashboard: ManagerDashboardBuilder,
    compliance: ComplianceReporter,
}

impl<R> LeadIngestionService<R>
where
    R: LeadRepository + 'static,
{
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>, config: OutreachConfig) -> Self {
        Self {
            repository,
            approvals: ApprovalWorkflow::new(clock.clone()),
            delivery: DeliveryTelemetry::new(clock.clone()),
            crm: CrmOutcomeSync::new(config.default_crm.clone(), clock.clone()),
            audit: AuditLog::new(clock.clone()),
            clock,
            config,
            scorer: RwLock::new(RuleBasedScorer::default()),
            drafter: MessageDraftGenerator,
            dashboard: ManagerDashboardBuilder,
            compliance: ComplianceReporter,
        }
    }

    /// Start with a custom ideal customer profile instead of the defaults.
    pub fn with_icp_config(self, icp: IcpRuleConfig) -> Self {
        Self {
            scorer: RwLock::new(RuleBasedScorer::new(icp)),
            ..self
        }
    }

    pub fn config(&self) -> &OutreachConfig {
        &self.config
    }

    /// Replace the scoring profile. Later scores, including scoring-quality snapshots, use it.
    pub fn configure_icp(&self, icp: IcpRuleConfig) -> IcpRuleConfig {
        let audit_payload = payload([
            ("title_keywords", json!(icp.title_keywords)),
            ("company_keywords", json!(icp.company_keywords)),
            ("min_score", json!(icp.min_score)),
            ("max_score", json!(icp.max_score)),
        ]);
        *self.scorer.write().unwrap_or_else(PoisonError::into_inner) =
            RuleBasedScorer::new(icp.clone());
        self.audit.append(actions::ICP_CONFIG_UPDATED, audit_payload);
        info!(
            title_keywords = icp.title_keywords.len(),
            company_keywords = icp.company_keywords.len(),
            "icp configuration updated"
        );
        icp
    }

    pub fn icp_config(&self) -> IcpRuleConfig {
        self.scorer().config().clone()
    }

    /// Validate and persist a provider batch. Any invalid lead rejects the whole batch.
    pub fn ingest(
        &self,
        provider_name: &str,
        leads: Vec<InboundLead>,
    ) -> Result<IngestLeadsResponse, OutreachError> {
        let provider_name = provider_name.trim();
        if provider_name.chars().count() < MIN_PROVIDER_CHARS {
            return Err(OutreachError::InvalidArgument(format!(
                "provider_name must be at least {MIN_PROVIDER_CHARS} characters"
            )));
        }
        if leads.is_empty() {
            return Err(OutreachError::InvalidArgument(
                "leads must contain at least one entry".to_string(),
            ));
        }

        for (index, lead) in leads.iter().enumerate() {
            lead.validate().map_err(|err| {
                warn!(provider = provider_name, index, error = %err, "lead batch rejected");
                OutreachError::InvalidArgument(format!("leads[{index}]: {err}"))
            })?;
        }

        let created = self.repository.add_many(leads, self.clock.now());
        let lead_ids: Vec<LeadId> = created.iter().map(|lead| lead.id).collect();

        self.audit.append(
            actions::LEAD_BATCH_INGESTED,
            payload([
                ("provider_name", json!(provider_name)),
                ("accepted", json!(lead_ids.len())),
                ("lead_ids", json!(lead_ids)),
            ]),
        );
        info!(provider = provider_name, accepted = lead_ids.len(), "lead batch ingested");

        Ok(IngestLeadsResponse {
            provider_name: provider_name.to_string(),
            accepted: lead_ids.len(),
            rejected: 0,
            lead_ids,
        })
    }

    pub fn list_leads(&self) -> Vec<Lead> {
        self.repository.list_all()
    }

    pub fn get_lead(&self, lead_id: LeadId) -> Result<Lead, OutreachError> {
        self.repository
            .get_by_id(lead_id)
            .ok_or_else(|| OutreachError::lead_not_found(lead_id))
    }

    pub fn score_lead(&self, lead_id: LeadId) -> Result<LeadScoreResult, OutreachError> {
        let lead = self.get_lead(lead_id)?;
        let result = self.scorer().score_lead(&lead.to_inbound());
        debug!(%lead_id, score = result.score, "lead scored");
        Ok(result)
    }

    /// Drafts are inert until submitted, so generating one is not audited.
    pub fn generate_message_draft(
        &self,
        lead_id: LeadId,
        controls: MessageGenerationControls,
    ) -> Result<MessageDraft, OutreachError> {
        let lead = self.get_lead(lead_id)?;
        Ok(self.drafter.generate(&lead, controls))
    }

    pub fn submit_draft_for_approval(
        &self,
        lead_id: LeadId,
        draft: MessageDraft,
    ) -> Result<DraftApproval, OutreachError> {
        self.get_lead(lead_id)?;
        let approval = self.approvals.submit(lead_id, draft);

        self.audit.append(
            actions::DRAFT_SUBMITTED,
            payload([
                ("lead_id", json!(lead_id)),
                ("revision_id", json!(approval.revision_id)),
            ]),
        );
        info!(%lead_id, revision_id = %approval.revision_id, "draft submitted for approval");
        Ok(approval)
    }

    pub fn review_draft(
        &self,
        revision_id: RevisionId,
        reviewer: &str,
        approve: bool,
        review_notes: Option<String>,
    ) -> Result<DraftApproval, OutreachError> {
        if reviewer.trim().chars().count() < MIN_REVIEWER_CHARS {
            return Err(OutreachError::InvalidArgument(format!(
                "reviewer must be at least {MIN_REVIEWER_CHARS} characters"
            )));
        }

        let reviewed = self
            .approvals
            .review(revision_id, reviewer, approve, review_notes)
            .map_err(|err| {
                warn!(%revision_id, error = %err, "draft review refused");
                OutreachError::from(err)
            })?;

        self.audit.append(
            actions::DRAFT_REVIEWED,
            payload([
                ("revision_id", json!(revision_id)),
                ("lead_id", json!(reviewed.lead_id)),
                ("status", json!(reviewed.status.label())),
                ("reviewer", json!(reviewed.reviewer)),
            ]),
        );
        info!(
            %revision_id,
            lead_id = %reviewed.lead_id,
            status = reviewed.status.label(),
            "draft reviewed"
        );
        Ok(reviewed)
    }

    pub fn list_approvals(&self) -> Vec<DraftApproval> {
        self.approvals.list_all()
    }

    /// Succeeds only when the lead exists and at least one of its revisions is approved.
    pub fn assert_send_allowed(&self, lead_id: LeadId) -> Result<(), OutreachError> {
        self.get_lead(lead_id)?;
        if !self.approvals.is_send_allowed(lead_id) {
            warn!(%lead_id, "send blocked without approved draft");
            return Err(OutreachError::SendNotAllowed { lead_id });
        }
        Ok(())
    }

    /// Send the latest approved revision's subject to `recipient_email`.
    pub fn send_approved_message(
        &self,
        lead_id: LeadId,
        recipient_email: &str,
    ) -> Result<DeliveryEvent, OutreachError> {
        self.assert_send_allowed(lead_id)?;
        let approved = self
            .approvals
            .get_latest_approved(lead_id)
            .ok_or(OutreachError::SendNotAllowed { lead_id })?;

        let event = self
            .delivery
            .send_email(lead_id, recipient_email, &approved.draft.subject)?;

        self.audit.append(
            actions::MESSAGE_SENT,
            payload([
                ("lead_id", json!(lead_id)),
                ("revision_id", json!(approved.revision_id)),
                ("event_id", json!(event.event_id)),
                ("recipient", json!(event.recipient)),
            ]),
        );
        info!(
            %lead_id,
            revision_id = %approved.revision_id,
            event_id = event.event_id,
            "message sent"
        );
        Ok(event)
    }

    /// Record downstream feedback for an approved message. The recipient is stored as given.
    pub fn record_delivery_event(
        &self,
        lead_id: LeadId,
        event_type: DeliveryEventType,
        recipient_email: &str,
    ) -> Result<DeliveryEvent, OutreachError> {
        let approved = self
            .approvals
            .get_latest_approved(lead_id)
            .ok_or(OutreachError::SendNotAllowed { lead_id })?;
        // Approvals outlive erased leads, so an erased lead reports NotFound here rather than
        // SendNotAllowed.
        self.get_lead(lead_id)?;

        let event = self.delivery.record_event(
            lead_id,
            OutboundChannel::Email,
            recipient_email,
            &approved.draft.subject,
            event_type,
        );

        self.audit.append(
            actions::DELIVERY_EVENT_RECORDED,
            payload([
                ("lead_id", json!(lead_id)),
                ("event_type", json!(event_type.label())),
                ("event_id", json!(event.event_id)),
            ]),
        );
        info!(%lead_id, event_type = event_type.label(), "delivery event recorded");
        Ok(event)
    }

    pub fn list_delivery_events(&self, lead_id: Option<LeadId>) -> Vec<DeliveryEvent> {
        self.delivery.list_events(lead_id)
    }

    pub fn sync_crm_outcome(
        &self,
        lead_id: LeadId,
        status: OutcomeStatus,
        deal_value: Option<f64>,
    ) -> Result<CrmOutcomeRecord, OutreachError> {
        self.get_lead(lead_id)?;
        let record = self.crm.sync_outcome(lead_id, status, deal_value, None)?;

        self.audit.append(
            actions::CRM_OUTCOME_SYNCED,
            payload([
                ("lead_id", json!(lead_id)),
                ("record_id", json!(record.record_id)),
                ("status", json!(status.label())),
                ("deal_value", json!(deal_value)),
                ("crm_name", json!(record.crm_name)),
            ]),
        );
        info!(%lead_id, status = status.label(), crm = %record.crm_name, "crm outcome synced");
        Ok(record)
    }

    pub fn list_crm_outcomes(&self, lead_id: Option<LeadId>) -> Vec<CrmOutcomeRecord> {
        self.crm.list_outcomes(lead_id)
    }

    /// Win rate among won/lost leads whose live score meets `threshold`
    /// (configured default when `None`).
    pub fn get_scoring_quality_snapshot(&self, threshold: Option<u32>) -> ScoringQualitySnapshot {
        let threshold = threshold.unwrap_or(self.config.high_score_threshold);
        let labeled: Vec<CrmOutcomeRecord> = self
            .crm
            .list_outcomes(None)
            .into_iter()
            .filter(|record| record.status.is_labeled())
            .collect();
        if labeled.is_empty() {
            return ScoringQualitySnapshot::empty();
        }

        let won_count = labeled
            .iter()
            .filter(|record| record.status == OutcomeStatus::Won)
            .count();

        let mut high_score_count = 0;
        let mut high_score_wins = 0;
        for record in &labeled {
            // Outcomes for erased leads are purged with them; a miss scores as zero.
            let score = self
                .score_lead(record.lead_id)
                .map(|result| result.score)
                .unwrap_or(0);
            if score >= threshold {
                high_score_count += 1;
                if record.status == OutcomeStatus::Won {
                    high_score_wins += 1;
                }
            }
        }

        let high_score_win_rate = if high_score_count == 0 {
            0.0
        } else {
            high_score_wins as f64 / high_score_count as f64
        };

        ScoringQualitySnapshot {
            total_labeled: labeled.len(),
            won_count,
            high_score_count,
            high_score_win_rate,
        }
    }

    pub fn get_manager_dashboard(&self) -> ManagerDashboardSnapshot {
        let leads = self.repository.list_all();
        let approvals = self.approvals.list_all();
        let events = self.delivery.list_events(None);
        self.dashboard.build(&leads, &approvals, &events)
    }

    pub fn get_compliance_snapshot(&self) -> ComplianceSnapshot {
        let leads = self.repository.list_all();
        let approvals = self.approvals.list_all();
        let events = self.delivery.list_events(None);
        let outcomes = self.crm.list_outcomes(None);
        let audit_events = self.audit.list_events();
        self.compliance
            .build(&leads, &approvals, &events, &outcomes, &audit_events)
    }

    pub fn list_audit_events(&self) -> Vec<AuditEvent> {
        self.audit.list_events()
    }

    /// Erase a lead on a data subject request, along with its delivery and CRM history.
    /// Approval revisions are kept as review history.
    pub fn delete_lead(&self, lead_id: LeadId) -> Result<(), OutreachError> {
        if !self.repository.delete_by_id(lead_id) {
            return Err(OutreachError::lead_not_found(lead_id));
        }
        let delivery_events_purged = self.delivery.purge_lead(lead_id);
        let crm_outcomes_purged = self.crm.purge_lead(lead_id);

        self.audit.append(
            actions::LEAD_DELETED,
            payload([
                ("lead_id", json!(lead_id)),
                ("delivery_events_purged", json!(delivery_events_purged)),
                ("crm_outcomes_purged", json!(crm_outcomes_purged)),
            ]),
        );
        info!(%lead_id, delivery_events_purged, crm_outcomes_purged, "lead deleted");
        Ok(())
    }

    /// Drop delivery events, CRM outcomes and audit entries older than `max_age_days`.
    /// The run itself is audited after the purge, so its entry always survives.
    pub fn enforce_retention(&self, max_age_days: u32) -> Result<RetentionReport, OutreachError> {
        if max_age_days == 0 {
            return Err(OutreachError::InvalidArgument(
                "max_age_days must be greater than zero".to_string(),
            ));
        }

        let cutoff = self.clock.now() - Duration::days(i64::from(max_age_days));
        let report = RetentionReport {
            max_age_days,
            cutoff,
            delivery_events_purged: self.delivery.purge_older_than(cutoff),
            crm_outcomes_purged: self.crm.purge_older_than(cutoff),
            audit_events_purged: self.audit.purge_older_than(cutoff),
        };

        self.audit.append(
            actions::RETENTION_ENFORCED,
            payload([
                ("max_age_days", json!(max_age_days)),
                ("cutoff", json!(cutoff.to_rfc3339())),
                ("delivery_events_purged", json!(report.delivery_events_purged)),
                ("crm_outcomes_purged", json!(report.crm_outcomes_purged)),
                ("audit_events_purged", json!(report.audit_events_purged)),
            ]),
        );
        info!(
            max_age_days,
            delivery_events_purged = report.delivery_events_purged,
            crm_outcomes_purged = report.crm_outcomes_purged,
            audit_events_purged = report.audit_events_purged,
            "retention policy enforced"
        );
        Ok(report)
    }

    /// Retention run using the configured window.
    pub fn enforce_default_retention(&self) -> Result<RetentionReport, OutreachError> {
        self.enforce_retention(self.config.retention_days)
    }

    fn scorer(&self) -> RwLockReadGuard<'_, RuleBasedScorer> {
        self.scorer.read().unwrap_or_else(PoisonError::into_inner)
    }
}
