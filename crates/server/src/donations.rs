//! Donation API endpoints
//!
//! Payment confirmation is stubbed: the external gateway callback is modeled
//! as an explicit `complete` call, which runs the whole atomic unit (status
//! flip, ledger entry, campaign total) in the ledger.

use api_types::donation::{
    DonationCreated, DonationNew, DonationStatus as ApiStatus, DonationView,
};
use api_types::transaction::TransactionCreated;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use ledger::DonationCmd;

fn map_status(status: ledger::DonationStatus) -> ApiStatus {
    match status {
        ledger::DonationStatus::Pending => ApiStatus::Pending,
        ledger::DonationStatus::Completed => ApiStatus::Completed,
        ledger::DonationStatus::Failed => ApiStatus::Failed,
    }
}

fn view(donation: ledger::Donation) -> DonationView {
    DonationView {
        id: donation.id,
        campaign_id: donation.campaign_id,
        amount: donation.amount,
        status: map_status(donation.status),
        is_anonymous: donation.is_anonymous,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DonationNew>,
) -> Result<(StatusCode, Json<DonationCreated>), ServerError> {
    let mut cmd = DonationCmd::new(payload.campaign_id, payload.amount, Utc::now());
    if let Some(user_id) = payload.user_id {
        cmd = cmd.user_id(user_id);
    }
    if let Some(payment_method) = payload.payment_method {
        cmd = cmd.payment_method(payment_method);
    }
    if let Some(message) = payload.message {
        cmd = cmd.message(message);
    }
    if payload.is_anonymous.unwrap_or(false) {
        cmd = cmd.anonymous();
    }

    let donation = state.ledger.create_donation(cmd).await?;
    Ok((StatusCode::CREATED, Json(DonationCreated { id: donation.id })))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DonationView>, ServerError> {
    let donation = state.ledger.donation(id).await?;
    Ok(Json(view(donation)))
}

pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionCreated>, ServerError> {
    let tx = state.ledger.complete_donation(id, Utc::now()).await?;
    Ok(Json(TransactionCreated { id: tx.id }))
}

pub async fn fail(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DonationView>, ServerError> {
    let donation = state.ledger.fail_donation(id).await?;
    Ok(Json(view(donation)))
}
