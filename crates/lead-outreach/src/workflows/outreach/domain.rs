use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Identifier assigned to a lead by the store, in ingestion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(pub u64);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provenance of a lead. Only vetted channels are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    OfficialApi,
    VettedProvider,
}

impl DataSource {
    pub const fn label(self) -> &'static str {
        match self {
            DataSource::OfficialApi => "official_api",
            DataSource::VettedProvider => "vetted_provider",
        }
    }
}

/// Candidate lead as received from a provider, before identity is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundLead {
    pub full_name: String,
    pub title: String,
    pub company: String,
    pub profile_url: String,
    pub source: DataSource,
}

const MIN_FIELD_CHARS: usize = 2;

impl InboundLead {
    pub fn validate(&self) -> Result<(), LeadValidationError> {
        check_length(&self.full_name, "full_name")?;
        check_length(&self.title, "title")?;
        check_length(&self.company, "company")?;

        let trimmed = self.profile_url.trim();
        if !has_authority_prefix(trimmed) {
            return Err(LeadValidationError::InvalidProfileUrl(
                self.profile_url.clone(),
            ));
        }
        let parsed = Url::parse(trimmed)
            .map_err(|_| LeadValidationError::InvalidProfileUrl(self.profile_url.clone()))?;
        let has_host = parsed.host_str().is_some_and(|host| !host.is_empty());
        if !matches!(parsed.scheme(), "http" | "https") || !has_host {
            return Err(LeadValidationError::InvalidProfileUrl(
                self.profile_url.clone(),
            ));
        }

        Ok(())
    }
}

/// `Url::parse` accepts `http:host` and `https:/host`; a profile link needs `//authority`.
fn has_authority_prefix(value: &str) -> bool {
    ["http://", "https://"].iter().any(|prefix| {
        value
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

fn check_length(value: &str, field: &'static str) -> Result<(), LeadValidationError> {
    if value.trim().chars().count() < MIN_FIELD_CHARS {
        return Err(LeadValidationError::FieldTooShort {
            field,
            min: MIN_FIELD_CHARS,
        });
    }
    Ok(())
}

/// Validation failures for an inbound lead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeadValidationError {
    #[error("{field} must be at least {min} characters")]
    FieldTooShort { field: &'static str, min: usize },
    #[error("profile_url must be a valid http(s) URL (found '{0}')")]
    InvalidProfileUrl(String),
}

/// A stored lead. Never mutated after ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub full_name: String,
    pub title: String,
    pub company: String,
    pub profile_url: String,
    pub source: DataSource,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    pub fn from_inbound(id: LeadId, inbound: InboundLead, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            full_name: inbound.full_name,
            title: inbound.title,
            company: inbound.company,
            profile_url: inbound.profile_url,
            source: inbound.source,
            created_at,
        }
    }

    /// Descriptive fields only, as consumed by the scorer.
    pub fn to_inbound(&self) -> InboundLead {
        InboundLead {
            full_name: self.full_name.clone(),
            title: self.title.clone(),
            company: self.company.clone(),
            profile_url: self.profile_url.clone(),
            source: self.source,
        }
    }
}

/// Batch ingestion result. Batches are all-or-nothing, so `rejected` is always zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestLeadsResponse {
    pub provider_name: String,
    pub accepted: usize,
    pub rejected: usize,
    pub lead_ids: Vec<LeadId>,
}
