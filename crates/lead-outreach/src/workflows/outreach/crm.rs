use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::domain::LeadId;
use super::sequence::IdAllocator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Won,
    Lost,
    Open,
}

impl OutcomeStatus {
    pub const fn label(self) -> &'static str {
        match self {
            OutcomeStatus::Won => "won",
            OutcomeStatus::Lost => "lost",
            OutcomeStatus::Open => "open",
        }
    }

    /// Won and lost deals are usable as scoring labels; open ones are not.
    pub const fn is_labeled(self) -> bool {
        matches!(self, OutcomeStatus::Won | OutcomeStatus::Lost)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmOutcomeRecord {
    pub record_id: u64,
    pub lead_id: LeadId,
    pub crm_name: String,
    pub status: OutcomeStatus,
    pub deal_value: Option<f64>,
    pub captured_at: DateTime<Utc>,
}

/// How well the current ICP score predicts closed-won deals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringQualitySnapshot {
    pub total_labeled: usize,
    pub won_count: usize,
    pub high_score_count: usize,
    pub high_score_win_rate: f64,
}

impl ScoringQualitySnapshot {
    pub fn empty() -> Self {
        Self {
            total_labeled: 0,
            won_count: 0,
            high_score_count: 0,
            high_score_win_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CrmSyncError {
    #[error("deal_value cannot be negative (found {0})")]
    NegativeDealValue(f64),
}

#[derive(Debug, Default)]
struct OutcomeLog {
    ids: IdAllocator,
    records: Vec<CrmOutcomeRecord>,
}

/// Append-only store of deal outcomes fed back from a single CRM.
pub struct CrmOutcomeSync {
    default_crm: String,
    log: Mutex<OutcomeLog>,
    clock: Arc<dyn Clock>,
}

impl CrmOutcomeSync {
    pub fn new(default_crm: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            default_crm: default_crm.into(),
            log: Mutex::new(OutcomeLog::default()),
            clock,
        }
    }

    pub fn default_crm(&self) -> &str {
        &self.default_crm
    }

    pub fn sync_outcome(
        &self,
        lead_id: LeadId,
        status: OutcomeStatus,
        deal_value: Option<f64>,
        crm_name: Option<&str>,
    ) -> Result<CrmOutcomeRecord, CrmSyncError> {
        if let Some(value) = deal_value {
            if value.is_nan() || value < 0.0 {
                return Err(CrmSyncError::NegativeDealValue(value));
            }
        }

        let crm_name = crm_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.default_crm.as_str())
            .to_string();

        let mut log = self.lock();
        let captured_at = self.clock.now();
        let record = CrmOutcomeRecord {
            record_id: log.ids.allocate(),
            lead_id,
            crm_name,
            status,
            deal_value,
            captured_at,
        };
        log.records.push(record.clone());
        Ok(record)
    }

    pub fn list_outcomes(&self, lead_id: Option<LeadId>) -> Vec<CrmOutcomeRecord> {
        self.lock()
            .records
            .iter()
            .filter(|record| lead_id.map_or(true, |id| record.lead_id == id))
            .cloned()
            .collect()
    }

    pub fn purge_lead(&self, lead_id: LeadId) -> usize {
        let mut log = self.lock();
        let before = log.records.len();
        log.records.retain(|record| record.lead_id != lead_id);
        before - log.records.len()
    }

    pub fn purge_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut log = self.lock();
        let before = log.records.len();
        log.records.retain(|record| record.captured_at >= cutoff);
        before - log.records.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, OutcomeLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
