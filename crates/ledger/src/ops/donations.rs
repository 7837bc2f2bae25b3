use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseTransaction, Statement, TransactionTrait, prelude::*,
};

use crate::{
    CampaignStatus, Donation, DonationCmd, DonationStatus, FinancialTransaction, LedgerError,
    ResultLedger, TransactionCategory, TransactionSource, campaigns, donations,
};

use super::campaigns::require_campaign;
use super::{Ledger, with_tx};

impl Ledger {
    /// Creates a pending donation toward an active campaign.
    pub async fn create_donation(&self, cmd: DonationCmd) -> ResultLedger<Donation> {
        with_tx!(self, |db_tx| {
            let campaign_model = require_campaign(&db_tx, cmd.campaign_id).await?;
            let status = CampaignStatus::try_from(campaign_model.status.as_str())?;
            if status != CampaignStatus::Active {
                return Err(LedgerError::InvalidStatus(format!(
                    "campaign is {}, donations require an active campaign",
                    status.as_str()
                )));
            }

            let donation = Donation::new(
                cmd.campaign_id,
                cmd.user_id,
                cmd.amount,
                cmd.payment_method,
                cmd.message,
                cmd.is_anonymous,
                cmd.created_at,
            )?;
            donations::ActiveModel::from(&donation).insert(&db_tx).await?;
            Ok(donation)
        })
    }

    /// Completes a pending donation: flips its status, records the income
    /// ledger entry and applies the amount to the campaign total, all in one
    /// DB transaction (either everything lands or nothing does).
    ///
    /// Repeat confirmations are no-ops returning the recorded transaction.
    /// A lost race on the campaign total is retried once with fresh state
    /// before `ConflictRetryExhausted` is surfaced.
    pub async fn complete_donation(
        &self,
        donation_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> ResultLedger<FinancialTransaction> {
        match self.complete_donation_once(donation_id, completed_at).await {
            Err(LedgerError::ConflictRetryExhausted(_)) => {
                self.complete_donation_once(donation_id, completed_at).await
            }
            other => other,
        }
    }

    async fn complete_donation_once(
        &self,
        donation_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> ResultLedger<FinancialTransaction> {
        with_tx!(self, |db_tx| {
            let mut donation = Donation::try_from(require_donation(&db_tx, donation_id).await?)?;
            match donation.status {
                DonationStatus::Completed => {
                    let source = TransactionSource::Donation { donation_id };
                    return super::recorder::find_source_transaction(
                        &db_tx,
                        source,
                        TransactionCategory::Donation,
                    )
                    .await?
                    .ok_or_else(|| {
                        LedgerError::KeyNotFound("transaction not exists".to_string())
                    });
                }
                DonationStatus::Failed => {
                    return Err(LedgerError::InvalidStatus(
                        "donation already failed".to_string(),
                    ));
                }
                DonationStatus::Pending => {}
            }

            let donation_update = donations::ActiveModel {
                id: ActiveValue::Set(donation_id.to_string()),
                status: ActiveValue::Set(DonationStatus::Completed.as_str().to_string()),
                ..Default::default()
            };
            donation_update.update(&db_tx).await?;
            donation.status = DonationStatus::Completed;

            let (tx, freshly_recorded) = self
                .record_donation_entry(&db_tx, &donation, completed_at)
                .await?;
            if !freshly_recorded {
                // A concurrent confirmation recorded and applied this
                // donation first; our status flip rolls back with the tx.
                return Ok(tx);
            }

            self.apply_donation(&db_tx, &donation).await?;
            Ok(tx)
        })
    }

    /// Applies a completed donation to its campaign aggregate.
    ///
    /// The increment is a compare-and-set against the total read in this
    /// attempt; zero affected rows means a concurrent completion won and the
    /// enclosing transaction must be retried from fresh state.
    async fn apply_donation(
        &self,
        db_tx: &DatabaseTransaction,
        donation: &Donation,
    ) -> ResultLedger<()> {
        let campaign_model = require_campaign(db_tx, donation.campaign_id).await?;
        let seen_amount = campaign_model.current_amount;

        let backend = db_tx.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "UPDATE campaigns SET current_amount = current_amount + ? \
             WHERE id = ? AND current_amount = ?",
            vec![
                donation.amount.into(),
                donation.campaign_id.to_string().into(),
                seen_amount.into(),
            ],
        );
        let result = db_tx.execute(stmt).await?;
        if result.rows_affected() == 0 {
            return Err(LedgerError::ConflictRetryExhausted(
                "campaign total changed concurrently".to_string(),
            ));
        }

        // One-way completion flip: reaching the target marks the campaign
        // completed; later expenses never revert it.
        let updated = require_campaign(db_tx, donation.campaign_id).await?;
        let status = CampaignStatus::try_from(updated.status.as_str())?;
        if status == CampaignStatus::Active && updated.current_amount >= updated.target_amount {
            let flip = campaigns::ActiveModel {
                id: ActiveValue::Set(donation.campaign_id.to_string()),
                status: ActiveValue::Set(CampaignStatus::Completed.as_str().to_string()),
                ..Default::default()
            };
            flip.update(db_tx).await?;
        }

        Ok(())
    }

    /// Marks a pending donation as failed. Terminal; nothing is recorded.
    pub async fn fail_donation(&self, donation_id: Uuid) -> ResultLedger<Donation> {
        with_tx!(self, |db_tx| {
            let donation = Donation::try_from(require_donation(&db_tx, donation_id).await?)?;
            match donation.status {
                DonationStatus::Failed => Ok(donation),
                DonationStatus::Completed => Err(LedgerError::InvalidStatus(
                    "donation already completed".to_string(),
                )),
                DonationStatus::Pending => {
                    let update = donations::ActiveModel {
                        id: ActiveValue::Set(donation_id.to_string()),
                        status: ActiveValue::Set(DonationStatus::Failed.as_str().to_string()),
                        ..Default::default()
                    };
                    let updated = update.update(&db_tx).await?;
                    Donation::try_from(updated)
                }
            }
        })
    }

    /// Return a [`Donation`].
    pub async fn donation(&self, donation_id: Uuid) -> ResultLedger<Donation> {
        let model = require_donation(&self.database, donation_id).await?;
        Donation::try_from(model)
    }
}

pub(super) async fn require_donation<C: ConnectionTrait>(
    db: &C,
    donation_id: Uuid,
) -> ResultLedger<donations::Model> {
    donations::Entity::find_by_id(donation_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::KeyNotFound("donation not exists".to_string()))
}
