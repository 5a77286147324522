use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::clock::Clock;
use super::sequence::IdAllocator;

pub type AuditPayload = BTreeMap<String, Value>;

/// Action names recorded by the pipeline.
pub mod actions {
    pub const LEAD_BATCH_INGESTED: &str = "lead_batch_ingested";
    pub const DRAFT_SUBMITTED: &str = "draft_submitted_for_approval";
    pub const DRAFT_REVIEWED: &str = "draft_reviewed";
    pub const MESSAGE_SENT: &str = "message_sent";
    pub const DELIVERY_EVENT_RECORDED: &str = "delivery_event_recorded";
    pub const CRM_OUTCOME_SYNCED: &str = "crm_outcome_synced";
    pub const ICP_CONFIG_UPDATED: &str = "icp_config_updated";
    pub const LEAD_DELETED: &str = "lead_deleted";
    pub const RETENTION_ENFORCED: &str = "retention_policy_enforced";
}

/// Immutable record of one state-changing action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: u64,
    pub action: String,
    pub payload: AuditPayload,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct AuditTrail {
    ids: IdAllocator,
    events: Vec<AuditEvent>,
}

/// Append-only audit trail. Entries leave only through the retention purge.
pub struct AuditLog {
    trail: Mutex<AuditTrail>,
    clock: Arc<dyn Clock>,
}

impl AuditLog {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            trail: Mutex::new(AuditTrail::default()),
            clock,
        }
    }

    pub fn append(&self, action: &str, payload: AuditPayload) -> AuditEvent {
        let mut trail = self.lock();
        // Stamped under the lock so ids and timestamps advance together.
        let created_at = self.clock.now();
        let event = AuditEvent {
            event_id: trail.ids.allocate(),
            action: action.to_string(),
            payload,
            created_at,
        };
        trail.events.push(event.clone());
        event
    }

    pub fn list_events(&self) -> Vec<AuditEvent> {
        self.lock().events.clone()
    }

    pub fn purge_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut trail = self.lock();
        let before = trail.events.len();
        trail.events.retain(|event| event.created_at >= cutoff);
        before - trail.events.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AuditTrail> {
        self.trail.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Build a payload from `(key, value)` pairs.
pub fn payload<const N: usize>(entries: [(&str, Value); N]) -> AuditPayload {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::outreach::clock::ManualClock;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    #[test]
    fn ids_and_timestamps_are_monotonic() {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
        ));
        let log = AuditLog::new(clock.clone());

        let first = log.append(actions::LEAD_BATCH_INGESTED, payload([("accepted", json!(2))]));
        clock.advance(Duration::seconds(5));
        let second = log.append(actions::MESSAGE_SENT, payload([("lead_id", json!(1))]));

        assert!(second.event_id > first.event_id);
        assert!(second.created_at > first.created_at);
        assert_eq!(first.payload.get("accepted"), Some(&json!(2)));
        assert_eq!(
            log.list_events()
                .iter()
                .map(|event| event.action.as_str())
                .collect::<Vec<_>>(),
            vec!["lead_batch_ingested", "message_sent"]
        );
    }

    #[test]
    fn listing_returns_copies() {
        let log = AuditLog::new(Arc::new(ManualClock::new(Utc::now())));
        log.append(actions::DRAFT_REVIEWED, AuditPayload::new());

        let mut copy = log.list_events();
        copy[0].action = "tampered".to_string();
        copy.clear();

        let stored = log.list_events();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].action, actions::DRAFT_REVIEWED);
    }
}
