//! Disbursement and refund API endpoints

use api_types::transaction::{
    DisbursementNew, RefundNew, TransactionCategory as ApiCategory, TransactionCreated,
    TransactionKind as ApiKind, TransactionView,
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::{FixedOffset, Utc};

use crate::{ServerError, server::ServerState};
use ledger::{DisbursementCmd, RefundCmd};

pub(crate) fn map_kind(kind: ledger::TransactionKind) -> ApiKind {
    match kind {
        ledger::TransactionKind::Income => ApiKind::Income,
        ledger::TransactionKind::Expense => ApiKind::Expense,
    }
}

pub(crate) fn map_category(category: ledger::TransactionCategory) -> ApiCategory {
    match category {
        ledger::TransactionCategory::Donation => ApiCategory::Donation,
        ledger::TransactionCategory::Disbursement => ApiCategory::Disbursement,
        ledger::TransactionCategory::Refund => ApiCategory::Refund,
    }
}

pub(crate) fn map_transaction(
    tx: ledger::FinancialTransaction,
    offset: FixedOffset,
) -> TransactionView {
    TransactionView {
        id: tx.id,
        campaign_id: tx.campaign_id,
        kind: map_kind(tx.kind),
        category: map_category(tx.category),
        sub_category: tx.sub_category,
        amount: tx.amount,
        description: tx.description,
        created_at: tx.created_at.with_timezone(&offset),
    }
}

pub async fn disbursement_new(
    State(state): State<ServerState>,
    Json(payload): Json<DisbursementNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let mut cmd = DisbursementCmd::new(payload.campaign_id, payload.amount, Utc::now());
    if let Some(sub_category) = payload.sub_category {
        cmd = cmd.sub_category(sub_category);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(batch_id) = payload.batch_id {
        cmd = cmd.batch_id(batch_id);
    }

    let tx = state.ledger.record_disbursement(cmd).await?;
    Ok((StatusCode::CREATED, Json(TransactionCreated { id: tx.id })))
}

pub async fn refund_new(
    State(state): State<ServerState>,
    Json(payload): Json<RefundNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let mut cmd = RefundCmd::new(payload.donation_id, Utc::now());
    if let Some(sub_category) = payload.sub_category {
        cmd = cmd.sub_category(sub_category);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let tx = state.ledger.record_refund(cmd).await?;
    Ok((StatusCode::CREATED, Json(TransactionCreated { id: tx.id })))
}
