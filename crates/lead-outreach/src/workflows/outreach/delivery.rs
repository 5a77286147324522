use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::domain::LeadId;
use super::sequence::IdAllocator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboundChannel {
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryEventType {
    Sent,
    Delivered,
    Bounced,
    Complaint,
}

impl DeliveryEventType {
    pub const fn label(self) -> &'static str {
        match self {
            DeliveryEventType::Sent => "sent",
            DeliveryEventType::Delivered => "delivered",
            DeliveryEventType::Bounced => "bounced",
            DeliveryEventType::Complaint => "complaint",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEvent {
    pub event_id: u64,
    pub lead_id: LeadId,
    pub channel: OutboundChannel,
    pub recipient: String,
    pub subject: String,
    pub event_type: DeliveryEventType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("recipient must be a valid email (found '{0}')")]
    InvalidRecipient(String),
}

/// Needs an `@` and a `.` somewhere after the last `@`.
pub fn is_plausible_email(recipient: &str) -> bool {
    match recipient.rsplit_once('@') {
        Some((_, domain)) => domain.contains('.'),
        None => false,
    }
}

#[derive(Debug, Default)]
struct EventLog {
    ids: IdAllocator,
    events: Vec<DeliveryEvent>,
}

/// Append-only record of send and delivery outcomes.
pub struct DeliveryTelemetry {
    log: Mutex<EventLog>,
    clock: Arc<dyn Clock>,
}

impl DeliveryTelemetry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            log: Mutex::new(EventLog::default()),
            clock,
        }
    }

    pub fn send_email(
        &self,
        lead_id: LeadId,
        recipient: &str,
        subject: &str,
    ) -> Result<DeliveryEvent, DeliveryError> {
        if !is_plausible_email(recipient) {
            return Err(DeliveryError::InvalidRecipient(recipient.to_string()));
        }
        Ok(self.record_event(
            lead_id,
            OutboundChannel::Email,
            recipient,
            subject,
            DeliveryEventType::Sent,
        ))
    }

    pub fn record_event(
        &self,
        lead_id: LeadId,
        channel: OutboundChannel,
        recipient: &str,
        subject: &str,
        event_type: DeliveryEventType,
    ) -> DeliveryEvent {
        let mut log = self.lock();
        let created_at = self.clock.now();
        let event = DeliveryEvent {
            event_id: log.ids.allocate(),
            lead_id,
            channel,
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            event_type,
            created_at,
        };
        log.events.push(event.clone());
        event
    }

    pub fn list_events(&self, lead_id: Option<LeadId>) -> Vec<DeliveryEvent> {
        self.lock()
            .events
            .iter()
            .filter(|event| lead_id.map_or(true, |id| event.lead_id == id))
            .cloned()
            .collect()
    }

    pub fn purge_lead(&self, lead_id: LeadId) -> usize {
        let mut log = self.lock();
        let before = log.events.len();
        log.events.retain(|event| event.lead_id != lead_id);
        before - log.events.len()
    }

    pub fn purge_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut log = self.lock();
        let before = log.events.len();
        log.events.retain(|event| event.created_at >= cutoff);
        before - log.events.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EventLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
