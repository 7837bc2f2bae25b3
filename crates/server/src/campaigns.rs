//! Campaign API endpoints

use api_types::campaign::{CampaignCreated, CampaignNew, CampaignStatus as ApiStatus, CampaignView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_status(status: ledger::CampaignStatus) -> ApiStatus {
    match status {
        ledger::CampaignStatus::Pending => ApiStatus::Pending,
        ledger::CampaignStatus::Active => ApiStatus::Active,
        ledger::CampaignStatus::Completed => ApiStatus::Completed,
        ledger::CampaignStatus::Rejected => ApiStatus::Rejected,
        ledger::CampaignStatus::Cancelled => ApiStatus::Cancelled,
    }
}

fn view(campaign: ledger::Campaign) -> CampaignView {
    CampaignView {
        id: campaign.id,
        title: campaign.title,
        target_amount: campaign.target_amount,
        current_amount: campaign.current_amount,
        status: map_status(campaign.status),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CampaignNew>,
) -> Result<(StatusCode, Json<CampaignCreated>), ServerError> {
    let campaign = state
        .ledger
        .create_campaign(&payload.title, payload.target_amount, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(CampaignCreated { id: campaign.id })))
}

pub async fn activate(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CampaignView>, ServerError> {
    let campaign = state.ledger.activate_campaign(id).await?;
    Ok(Json(view(campaign)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CampaignView>, ServerError> {
    let campaign = state.ledger.campaign(id).await?;
    Ok(Json(view(campaign)))
}
