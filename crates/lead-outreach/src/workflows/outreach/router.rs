use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::error::AppError;

use super::approval::{DraftApproval, RevisionId};
use super::audit::AuditEvent;
use super::crm::{CrmOutcomeRecord, OutcomeStatus, ScoringQualitySnapshot};
use super::delivery::{DeliveryEvent, DeliveryEventType};
use super::domain::{InboundLead, IngestLeadsResponse, Lead, LeadId};
use super::messaging::{MessageDraft, MessageGenerationControls};
use super::reporting::{ComplianceSnapshot, ManagerDashboardSnapshot};
use super::scoring::{IcpRuleConfig, LeadScoreResult};
use super::service::{LeadIngestionService, RetentionReport};
use super::store::LeadRepository;

type SharedService<R> = State<Arc<LeadIngestionService<R>>>;

#[derive(Debug, Deserialize)]
pub struct IngestLeadsRequest {
    pub provider_name: String,
    pub leads: Vec<InboundLead>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitDraftRequest {
    pub draft: MessageDraft,
}

#[derive(Debug, Deserialize)]
pub struct ReviewDraftRequest {
    pub reviewer: String,
    pub approve: bool,
    #[serde(default)]
    pub review_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub recipient_email: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordDeliveryEventRequest {
    pub event_type: DeliveryEventType,
    pub recipient_email: String,
}

#[derive(Debug, Deserialize)]
pub struct SyncCrmOutcomeRequest {
    pub status: OutcomeStatus,
    #[serde(default)]
    pub deal_value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RetentionRequest {
    #[serde(default)]
    pub max_age_days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeadFilter {
    pub lead_id: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScoringQualityQuery {
    pub threshold: Option<u32>,
}

/// Router exposing the outreach pipeline over JSON.
pub fn outreach_router<R>(service: Arc<LeadIngestionService<R>>) -> Router
where
    R: LeadRepository + 'static,
{
    Router::new()
        .route("/v1/leads", get(list_leads_handler::<R>))
        .route("/v1/leads/ingest", post(ingest_handler::<R>))
        .route("/v1/leads/:lead_id", delete(delete_lead_handler::<R>))
        .route("/v1/leads/:lead_id/score", get(score_handler::<R>))
        .route("/v1/leads/:lead_id/draft", post(draft_handler::<R>))
        .route(
            "/v1/leads/:lead_id/approvals",
            post(submit_approval_handler::<R>),
        )
        .route("/v1/leads/:lead_id/send", post(send_handler::<R>))
        .route(
            "/v1/leads/:lead_id/delivery-events",
            post(record_delivery_handler::<R>),
        )
        .route(
            "/v1/leads/:lead_id/crm-outcomes",
            post(sync_crm_handler::<R>),
        )
        .route("/v1/approvals", get(list_approvals_handler::<R>))
        .route(
            "/v1/approvals/:revision_id/review",
            post(review_handler::<R>),
        )
        .route("/v1/delivery-events", get(list_delivery_handler::<R>))
        .route("/v1/crm-outcomes", get(list_crm_handler::<R>))
        .route("/v1/audit-events", get(audit_handler::<R>))
        .route("/v1/reports/dashboard", get(dashboard_handler::<R>))
        .route(
            "/v1/reports/scoring-quality",
            get(scoring_quality_handler::<R>),
        )
        .route("/v1/reports/compliance", get(compliance_handler::<R>))
        .route("/v1/scoring/icp", put(configure_icp_handler::<R>))
        .route("/v1/governance/retention", post(retention_handler::<R>))
        .with_state(service)
}

pub(crate) async fn ingest_handler<R>(
    State(service): SharedService<R>,
    Json(request): Json<IngestLeadsRequest>,
) -> Result<Json<IngestLeadsResponse>, AppError>
where
    R: LeadRepository + 'static,
{
    let response = service.ingest(&request.provider_name, request.leads)?;
    Ok(Json(response))
}

async fn list_leads_handler<R>(State(service): SharedService<R>) -> Json<Vec<Lead>>
where
    R: LeadRepository + 'static,
{
    Json(service.list_leads())
}

async fn delete_lead_handler<R>(
    State(service): SharedService<R>,
    Path(lead_id): Path<u64>,
) -> Result<StatusCode, AppError>
where
    R: LeadRepository + 'static,
{
    service.delete_lead(LeadId(lead_id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn score_handler<R>(
    State(service): SharedService<R>,
    Path(lead_id): Path<u64>,
) -> Result<Json<LeadScoreResult>, AppError>
where
    R: LeadRepository + 'static,
{
    Ok(Json(service.score_lead(LeadId(lead_id))?))
}

pub(crate) async fn draft_handler<R>(
    State(service): SharedService<R>,
    Path(lead_id): Path<u64>,
    Json(controls): Json<MessageGenerationControls>,
) -> Result<Json<MessageDraft>, AppError>
where
    R: LeadRepository + 'static,
{
    Ok(Json(
        service.generate_message_draft(LeadId(lead_id), controls)?,
    ))
}

async fn submit_approval_handler<R>(
    State(service): SharedService<R>,
    Path(lead_id): Path<u64>,
    Json(request): Json<SubmitDraftRequest>,
) -> Result<(StatusCode, Json<DraftApproval>), AppError>
where
    R: LeadRepository + 'static,
{
    let approval = service.submit_draft_for_approval(LeadId(lead_id), request.draft)?;
    Ok((StatusCode::CREATED, Json(approval)))
}

async fn list_approvals_handler<R>(State(service): SharedService<R>) -> Json<Vec<DraftApproval>>
where
    R: LeadRepository + 'static,
{
    Json(service.list_approvals())
}

async fn review_handler<R>(
    State(service): SharedService<R>,
    Path(revision_id): Path<u64>,
    Json(request): Json<ReviewDraftRequest>,
) -> Result<Json<DraftApproval>, AppError>
where
    R: LeadRepository + 'static,
{
    let reviewed = service.review_draft(
        RevisionId(revision_id),
        &request.reviewer,
        request.approve,
        request.review_notes,
    )?;
    Ok(Json(reviewed))
}

async fn send_handler<R>(
    State(service): SharedService<R>,
    Path(lead_id): Path<u64>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<DeliveryEvent>, AppError>
where
    R: LeadRepository + 'static,
{
    let event = service.send_approved_message(LeadId(lead_id), &request.recipient_email)?;
    Ok(Json(event))
}

async fn record_delivery_handler<R>(
    State(service): SharedService<R>,
    Path(lead_id): Path<u64>,
    Json(request): Json<RecordDeliveryEventRequest>,
) -> Result<Json<DeliveryEvent>, AppError>
where
    R: LeadRepository + 'static,
{
    let event = service.record_delivery_event(
        LeadId(lead_id),
        request.event_type,
        &request.recipient_email,
    )?;
    Ok(Json(event))
}

async fn list_delivery_handler<R>(
    State(service): SharedService<R>,
    Query(filter): Query<LeadFilter>,
) -> Json<Vec<DeliveryEvent>>
where
    R: LeadRepository + 'static,
{
    Json(service.list_delivery_events(filter.lead_id.map(LeadId)))
}

async fn sync_crm_handler<R>(
    State(service): SharedService<R>,
    Path(lead_id): Path<u64>,
    Json(request): Json<SyncCrmOutcomeRequest>,
) -> Result<Json<CrmOutcomeRecord>, AppError>
where
    R: LeadRepository + 'static,
{
    let record = service.sync_crm_outcome(LeadId(lead_id), request.status, request.deal_value)?;
    Ok(Json(record))
}

async fn list_crm_handler<R>(
    State(service): SharedService<R>,
    Query(filter): Query<LeadFilter>,
) -> Json<Vec<CrmOutcomeRecord>>
where
    R: LeadRepository + 'static,
{
    Json(service.list_crm_outcomes(filter.lead_id.map(LeadId)))
}

async fn audit_handler<R>(State(service): SharedService<R>) -> Json<Vec<AuditEvent>>
where
    R: LeadRepository + 'static,
{
    Json(service.list_audit_events())
}

async fn dashboard_handler<R>(State(service): SharedService<R>) -> Json<ManagerDashboardSnapshot>
where
    R: LeadRepository + 'static,
{
    Json(service.get_manager_dashboard())
}

async fn scoring_quality_handler<R>(
    State(service): SharedService<R>,
    Query(query): Query<ScoringQualityQuery>,
) -> Json<ScoringQualitySnapshot>
where
    R: LeadRepository + 'static,
{
    Json(service.get_scoring_quality_snapshot(query.threshold))
}

async fn compliance_handler<R>(State(service): SharedService<R>) -> Json<ComplianceSnapshot>
where
    R: LeadRepository + 'static,
{
    Json(service.get_compliance_snapshot())
}

async fn configure_icp_handler<R>(
    State(service): SharedService<R>,
    Json(icp): Json<IcpRuleConfig>,
) -> Json<IcpRuleConfig>
where
    R: LeadRepository + 'static,
{
    Json(service.configure_icp(icp))
}

async fn retention_handler<R>(
    State(service): SharedService<R>,
    Json(request): Json<RetentionRequest>,
) -> Result<Json<RetentionReport>, AppError>
where
    R: LeadRepository + 'static,
{
    let report = match request.max_age_days {
        Some(days) => service.enforce_retention(days)?,
        None => service.enforce_default_retention()?,
    };
    Ok(Json(report))
}
