use std::collections::HashSet;

use serde::Serialize;

use super::super::approval::{ApprovalStatus, DraftApproval};
use super::super::delivery::{DeliveryEvent, DeliveryEventType};
use super::super::domain::Lead;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityMetrics {
    pub leads_ingested: usize,
    pub drafts_submitted: usize,
    pub drafts_reviewed: usize,
    pub approved_drafts: usize,
    pub rejected_drafts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunnelMetrics {
    pub leads_total: usize,
    pub leads_with_approved_draft: usize,
    pub messages_sent: usize,
    pub messages_delivered: usize,
    pub messages_bounced: usize,
    pub complaints: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagerDashboardSnapshot {
    pub activity: ActivityMetrics,
    pub funnel: FunnelMetrics,
}

/// Activity and conversion funnel summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManagerDashboardBuilder;

impl ManagerDashboardBuilder {
    pub fn build(
        &self,
        leads: &[Lead],
        approvals: &[DraftApproval],
        delivery_events: &[DeliveryEvent],
    ) -> ManagerDashboardSnapshot {
        let count_status = |status: ApprovalStatus| {
            approvals
                .iter()
                .filter(|item| item.status == status)
                .count()
        };
        let count_events = |event_type: DeliveryEventType| {
            delivery_events
                .iter()
                .filter(|event| event.event_type == event_type)
                .count()
        };

        let approved_leads: HashSet<_> = approvals
            .iter()
            .filter(|item| item.status == ApprovalStatus::Approved)
            .map(|item| item.lead_id)
            .collect();

        let activity = ActivityMetrics {
            leads_ingested: leads.len(),
            drafts_submitted: approvals.len(),
            drafts_reviewed: approvals
                .iter()
                .filter(|item| item.status.is_terminal())
                .count(),
            approved_drafts: count_status(ApprovalStatus::Approved),
            rejected_drafts: count_status(ApprovalStatus::Rejected),
        };

        let funnel = FunnelMetrics {
            leads_total: leads.len(),
            leads_with_approved_draft: approved_leads.len(),
            messages_sent: count_events(DeliveryEventType::Sent),
            messages_delivered: count_events(DeliveryEventType::Delivered),
            messages_bounced: count_events(DeliveryEventType::Bounced),
            complaints: count_events(DeliveryEventType::Complaint),
        };

        ManagerDashboardSnapshot { activity, funnel }
    }
}
