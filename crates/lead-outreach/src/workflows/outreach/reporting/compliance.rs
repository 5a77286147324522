use serde::Serialize;

use super::super::approval::{ApprovalStatus, DraftApproval};
use super::super::audit::{actions, AuditEvent};
use super::super::crm::CrmOutcomeRecord;
use super::super::delivery::DeliveryEvent;
use super::super::domain::Lead;

/// Compliance posture for operational readiness checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceSnapshot {
    pub total_leads: usize,
    pub total_audit_events: usize,
    pub dsar_deletions_recorded: usize,
    pub retention_runs_recorded: usize,
    pub pending_approvals: usize,
    pub delivery_events_total: usize,
    pub crm_outcomes_total: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ComplianceReporter;

impl ComplianceReporter {
    pub fn build(
        &self,
        leads: &[Lead],
        approvals: &[DraftApproval],
        delivery_events: &[DeliveryEvent],
        crm_outcomes: &[CrmOutcomeRecord],
        audit_events: &[AuditEvent],
    ) -> ComplianceSnapshot {
        let count_action = |action: &str| {
            audit_events
                .iter()
                .filter(|event| event.action == action)
                .count()
        };

        ComplianceSnapshot {
            total_leads: leads.len(),
            total_audit_events: audit_events.len(),
            dsar_deletions_recorded: count_action(actions::LEAD_DELETED),
            retention_runs_recorded: count_action(actions::RETENTION_ENFORCED),
            pending_approvals: approvals
                .iter()
                .filter(|item| item.status == ApprovalStatus::Pending)
                .count(),
            delivery_events_total: delivery_events.len(),
            crm_outcomes_total: crm_outcomes.len(),
        }
    }
}
