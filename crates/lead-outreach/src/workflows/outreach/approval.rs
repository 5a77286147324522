//! Human review gate for outbound drafts.
//!
//! Every submitted draft becomes a revision with a process-wide, strictly increasing id. The id
//! doubles as the workflow's logical clock: when several revisions for the same lead are
//! approved, the highest id is authoritative, regardless of the order reviews were processed in.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::domain::LeadId;
use super::messaging::MessageDraft;
use super::sequence::IdAllocator;

/// Identifier of one submitted draft revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionId(pub u64);

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    /// Approved and rejected are absorbing.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, ApprovalStatus::Pending)
    }
}

/// One revision tracked through review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftApproval {
    pub lead_id: LeadId,
    pub revision_id: RevisionId,
    pub draft: MessageDraft,
    pub status: ApprovalStatus,
    pub reviewer: Option<String>,
    pub review_notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApprovalError {
    #[error("revision_id {0} not found")]
    NotFound(RevisionId),
    #[error("revision_id {revision_id} already reviewed")]
    AlreadyReviewed {
        revision_id: RevisionId,
        status: ApprovalStatus,
    },
}

#[derive(Debug, Default)]
struct RevisionLedger {
    ids: IdAllocator,
    revisions: BTreeMap<RevisionId, DraftApproval>,
}

/// Revision-keyed review state machine: `pending -> approved | rejected`, once.
pub struct ApprovalWorkflow {
    ledger: Mutex<RevisionLedger>,
    clock: Arc<dyn Clock>,
}

impl ApprovalWorkflow {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger: Mutex::new(RevisionLedger::default()),
            clock,
        }
    }

    pub fn submit(&self, lead_id: LeadId, draft: MessageDraft) -> DraftApproval {
        let mut ledger = self.lock();
        let submitted_at = self.clock.now();
        let revision_id = RevisionId(ledger.ids.allocate());
        let approval = DraftApproval {
            lead_id,
            revision_id,
            draft,
            status: ApprovalStatus::Pending,
            reviewer: None,
            review_notes: None,
            submitted_at,
            reviewed_at: None,
        };
        ledger.revisions.insert(revision_id, approval.clone());
        approval
    }

    /// Move a pending revision to its terminal state. Re-reviewing is an error, not a no-op.
    pub fn review(
        &self,
        revision_id: RevisionId,
        reviewer: &str,
        approve: bool,
        review_notes: Option<String>,
    ) -> Result<DraftApproval, ApprovalError> {
        let mut ledger = self.lock();
        let reviewed_at = self.clock.now();
        let item = ledger
            .revisions
            .get_mut(&revision_id)
            .ok_or(ApprovalError::NotFound(revision_id))?;

        if item.status.is_terminal() {
            return Err(ApprovalError::AlreadyReviewed {
                revision_id,
                status: item.status,
            });
        }

        item.status = if approve {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Rejected
        };
        item.reviewer = Some(reviewer.trim().to_string());
        item.review_notes = review_notes;
        item.reviewed_at = Some(reviewed_at);
        Ok(item.clone())
    }

    pub fn is_send_allowed(&self, lead_id: LeadId) -> bool {
        self.lock()
            .revisions
            .values()
            .any(|item| item.lead_id == lead_id && item.status == ApprovalStatus::Approved)
    }

    /// Highest-numbered approved revision for the lead. Review time plays no part.
    pub fn get_latest_approved(&self, lead_id: LeadId) -> Option<DraftApproval> {
        self.lock()
            .revisions
            .values()
            .rev()
            .find(|item| item.lead_id == lead_id && item.status == ApprovalStatus::Approved)
            .cloned()
    }

    pub fn get(&self, revision_id: RevisionId) -> Option<DraftApproval> {
        self.lock().revisions.get(&revision_id).cloned()
    }

    /// All revisions, ascending by revision id.
    pub fn list_all(&self) -> Vec<DraftApproval> {
        self.lock().revisions.values().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RevisionLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
