//! Compliance-gated outreach pipeline.
//!
//! Leads arrive from vetted providers, are scored against the ideal customer profile, and get
//! templated drafts. Nothing is sent until a human approves a draft revision. Delivery and CRM
//! feedback flow back into reporting, and every state change lands in the audit log.

pub mod approval;
pub mod audit;
pub mod clock;
pub mod crm;
pub mod delivery;
pub mod domain;
pub mod messaging;
pub mod reporting;
pub mod router;
pub(crate) mod scoring;
pub(crate) mod sequence;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use approval::{ApprovalError, ApprovalStatus, ApprovalWorkflow, DraftApproval, RevisionId};
pub use audit::{AuditEvent, AuditLog, AuditPayload};
pub use clock::{Clock, ManualClock, SystemClock};
pub use crm::{
    CrmOutcomeRecord, CrmOutcomeSync, CrmSyncError, OutcomeStatus, ScoringQualitySnapshot,
};
pub use delivery::{
    DeliveryError, DeliveryEvent, DeliveryEventType, DeliveryTelemetry, OutboundChannel,
};
pub use domain::{DataSource, InboundLead, IngestLeadsResponse, Lead, LeadId, LeadValidationError};
pub use messaging::{
    MessageCta, MessageDraft, MessageDraftGenerator, MessageGenerationControls, MessageTemplate,
    MessageTone, PersonalizationEvidence,
};
pub use reporting::{ActivityMetrics, ComplianceSnapshot, FunnelMetrics, ManagerDashboardSnapshot};
pub use router::outreach_router;
pub use scoring::{IcpRuleConfig, LeadScoreResult, RuleBasedScorer, ScoreBreakdownItem};
pub use service::{LeadIngestionService, OutreachError, RetentionReport};
pub use store::{InMemoryLeadRepository, LeadRepository};
