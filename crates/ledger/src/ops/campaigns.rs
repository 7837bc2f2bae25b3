use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{ActiveValue, ConnectionTrait, Statement, TransactionTrait, prelude::*};

use crate::{Campaign, CampaignStatus, DonationStatus, LedgerError, ResultLedger, campaigns};

use super::{Ledger, normalize_required_title, with_tx};

impl Ledger {
    /// Creates a campaign in `pending` status.
    pub async fn create_campaign(
        &self,
        title: &str,
        target_amount: i64,
        created_at: DateTime<Utc>,
    ) -> ResultLedger<Campaign> {
        let title = normalize_required_title(title)?;
        let campaign = Campaign::new(title, target_amount, created_at)?;
        campaigns::ActiveModel::from(&campaign)
            .insert(&self.database)
            .await?;
        Ok(campaign)
    }

    /// Moves a `pending` campaign to `active` so it can receive donations.
    pub async fn activate_campaign(&self, campaign_id: Uuid) -> ResultLedger<Campaign> {
        with_tx!(self, |db_tx| {
            let model = require_campaign(&db_tx, campaign_id).await?;
            let status = CampaignStatus::try_from(model.status.as_str())?;
            if status != CampaignStatus::Pending {
                return Err(LedgerError::InvalidStatus(format!(
                    "campaign is {}, expected pending",
                    status.as_str()
                )));
            }

            let active = campaigns::ActiveModel {
                id: ActiveValue::Set(campaign_id.to_string()),
                status: ActiveValue::Set(CampaignStatus::Active.as_str().to_string()),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await?;
            Campaign::try_from(updated)
        })
    }

    /// Return a [`Campaign`].
    pub async fn campaign(&self, campaign_id: Uuid) -> ResultLedger<Campaign> {
        let model = require_campaign(&self.database, campaign_id).await?;
        Campaign::try_from(model)
    }

    /// Rebuilds `current_amount` from completed donations.
    ///
    /// - Replays the donation table instead of trusting the denormalized
    ///   value.
    /// - Re-evaluates the completion flip, which stays one-way: a campaign
    ///   that already completed is never moved back to `active`.
    pub async fn recompute_campaign_totals(&self, campaign_id: Uuid) -> ResultLedger<Campaign> {
        with_tx!(self, |db_tx| {
            let model = require_campaign(&db_tx, campaign_id).await?;
            let status = CampaignStatus::try_from(model.status.as_str())?;
            let total = completed_donation_total(&db_tx, campaign_id).await?;

            let next_status = if status == CampaignStatus::Active && total >= model.target_amount
            {
                CampaignStatus::Completed
            } else {
                status
            };

            let update = campaigns::ActiveModel {
                id: ActiveValue::Set(campaign_id.to_string()),
                current_amount: ActiveValue::Set(total),
                status: ActiveValue::Set(next_status.as_str().to_string()),
                ..Default::default()
            };
            let updated = update.update(&db_tx).await?;
            Campaign::try_from(updated)
        })
    }
}

pub(super) async fn require_campaign<C: ConnectionTrait>(
    db: &C,
    campaign_id: Uuid,
) -> ResultLedger<campaigns::Model> {
    campaigns::Entity::find_by_id(campaign_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::KeyNotFound("campaign not exists".to_string()))
}

pub(super) async fn completed_donation_total<C: ConnectionTrait>(
    db: &C,
    campaign_id: Uuid,
) -> ResultLedger<i64> {
    let backend = db.get_database_backend();
    let stmt = Statement::from_sql_and_values(
        backend,
        "SELECT COALESCE(SUM(amount), 0) AS sum \
         FROM donations \
         WHERE campaign_id = ? AND status = ?",
        vec![
            campaign_id.to_string().into(),
            DonationStatus::Completed.as_str().into(),
        ],
    );
    let row = db.query_one(stmt).await?;
    Ok(row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0))
}
