use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use super::domain::{InboundLead, Lead, LeadId};
use super::sequence::IdAllocator;

/// Storage abstraction for ingested leads so the service can be exercised in isolation.
pub trait LeadRepository: Send + Sync {
    /// Persist a validated batch, assigning ids in submission order.
    fn add_many(&self, leads: Vec<InboundLead>, created_at: DateTime<Utc>) -> Vec<Lead>;
    fn list_all(&self) -> Vec<Lead>;
    fn get_by_id(&self, id: LeadId) -> Option<Lead>;
    fn delete_by_id(&self, id: LeadId) -> bool;
}

#[derive(Debug, Default)]
struct LeadTable {
    ids: IdAllocator,
    rows: Vec<Lead>,
}

/// Process-local lead store.
#[derive(Debug, Default)]
pub struct InMemoryLeadRepository {
    table: Mutex<LeadTable>,
}

impl InMemoryLeadRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeadRepository for InMemoryLeadRepository {
    fn add_many(&self, leads: Vec<InboundLead>, created_at: DateTime<Utc>) -> Vec<Lead> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let mut created = Vec::with_capacity(leads.len());
        for inbound in leads {
            let id = LeadId(table.ids.allocate());
            let lead = Lead::from_inbound(id, inbound, created_at);
            table.rows.push(lead.clone());
            created.push(lead);
        }
        created
    }

    fn list_all(&self) -> Vec<Lead> {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .rows
            .clone()
    }

    fn get_by_id(&self, id: LeadId) -> Option<Lead> {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .rows
            .iter()
            .find(|lead| lead.id == id)
            .cloned()
    }

    fn delete_by_id(&self, id: LeadId) -> bool {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let before = table.rows.len();
        table.rows.retain(|lead| lead.id != id);
        table.rows.len() != before
    }
}
