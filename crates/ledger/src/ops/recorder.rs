use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*,
};

use crate::{
    DisbursementCmd, Donation, DonationStatus, FinancialTransaction, LedgerError, RefundCmd,
    ResultLedger, TransactionCategory, TransactionSource, TransactionStatus, transactions,
};

use super::campaigns::require_campaign;
use super::donations::require_donation;
use super::{Ledger, normalize_optional_text, with_tx};

impl Ledger {
    /// Records the income ledger entry for a donation already in `completed`
    /// status.
    ///
    /// Normally this happens inside [`Ledger::complete_donation`]; the
    /// standalone form exists for backfills and is just as idempotent.
    pub async fn record_donation_transaction(
        &self,
        donation_id: Uuid,
        recorded_at: DateTime<Utc>,
    ) -> ResultLedger<FinancialTransaction> {
        with_tx!(self, |db_tx| {
            let donation = Donation::try_from(require_donation(&db_tx, donation_id).await?)?;
            if donation.status != DonationStatus::Completed {
                return Err(LedgerError::InvalidStatus(
                    "donation is not completed".to_string(),
                ));
            }
            let (tx, _) = self
                .record_donation_entry(&db_tx, &donation, recorded_at)
                .await?;
            Ok(tx)
        })
    }

    /// Returns the ledger entry plus whether this call inserted it. `false`
    /// means a concurrent or earlier recording already exists; the caller
    /// must not apply side effects (aggregate updates) again.
    pub(super) async fn record_donation_entry(
        &self,
        db_tx: &DatabaseTransaction,
        donation: &Donation,
        recorded_at: DateTime<Utc>,
    ) -> ResultLedger<(FinancialTransaction, bool)> {
        // The entry copies the donor-submitted amount unmodified; nothing
        // between donation and ledger may deduct a fee.
        let tx = FinancialTransaction::new(
            Some(donation.campaign_id),
            TransactionCategory::Donation,
            donation.amount,
            None,
            donation.message.clone(),
            Some(TransactionSource::Donation {
                donation_id: donation.id,
            }),
            recorded_at,
        )?;
        record_entry(db_tx, tx).await
    }

    /// Records an admin-initiated disbursement (expense) for a campaign.
    pub async fn record_disbursement(
        &self,
        cmd: DisbursementCmd,
    ) -> ResultLedger<FinancialTransaction> {
        with_tx!(self, |db_tx| {
            require_campaign(&db_tx, cmd.campaign_id).await?;
            let tx = FinancialTransaction::new(
                Some(cmd.campaign_id),
                TransactionCategory::Disbursement,
                cmd.amount,
                normalize_optional_text(cmd.sub_category.as_deref()),
                normalize_optional_text(cmd.description.as_deref()),
                Some(TransactionSource::Disbursement {
                    batch_id: cmd.batch_id,
                }),
                cmd.created_at,
            )?;
            let (tx, _) = record_entry(&db_tx, tx).await?;
            Ok(tx)
        })
    }

    /// Records a refund (expense) returning a completed donation at face
    /// value.
    ///
    /// The campaign total is not decremented: funds returned are a ledger
    /// concern, not a reversal of fundraising success.
    pub async fn record_refund(&self, cmd: RefundCmd) -> ResultLedger<FinancialTransaction> {
        with_tx!(self, |db_tx| {
            let donation = Donation::try_from(require_donation(&db_tx, cmd.donation_id).await?)?;
            if donation.status != DonationStatus::Completed {
                return Err(LedgerError::InvalidStatus(
                    "only completed donations can be refunded".to_string(),
                ));
            }

            let tx = FinancialTransaction::new(
                Some(donation.campaign_id),
                TransactionCategory::Refund,
                donation.amount,
                normalize_optional_text(cmd.sub_category.as_deref()),
                normalize_optional_text(cmd.description.as_deref()),
                Some(TransactionSource::Refund {
                    donation_id: donation.id,
                }),
                cmd.created_at,
            )?;
            let (tx, _) = record_entry(&db_tx, tx).await?;
            Ok(tx)
        })
    }

    /// Corrects the status of a ledger row. This is the only mutation a
    /// recorded transaction ever sees.
    pub async fn correct_transaction_status(
        &self,
        transaction_id: Uuid,
        status: TransactionStatus,
    ) -> ResultLedger<FinancialTransaction> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::KeyNotFound("transaction not exists".to_string()))?;

            let current = TransactionStatus::try_from(model.status.as_str())?;
            if current == status {
                return FinancialTransaction::try_from(model);
            }

            let update = transactions::ActiveModel {
                id: ActiveValue::Set(transaction_id.to_string()),
                status: ActiveValue::Set(status.as_str().to_string()),
                ..Default::default()
            };
            let updated = update.update(&db_tx).await?;
            FinancialTransaction::try_from(updated)
        })
    }
}

pub(super) async fn find_source_transaction<C: ConnectionTrait>(
    db: &C,
    source: TransactionSource,
    category: TransactionCategory,
) -> ResultLedger<Option<FinancialTransaction>> {
    let model = transactions::Entity::find()
        .filter(transactions::Column::SourceKind.eq(source.kind().as_str()))
        .filter(transactions::Column::SourceId.eq(source.id().to_string()))
        .filter(transactions::Column::Category.eq(category.as_str()))
        .one(db)
        .await?;

    match model {
        Some(model) => Ok(Some(FinancialTransaction::try_from(model)?)),
        None => Ok(None),
    }
}

/// Inserts a ledger entry, enforcing at most one row per (source, category).
///
/// A duplicate recording is detected and resolved by returning the row that
/// is already stored, so retried confirmations and webhooks are safe. The
/// boolean is `true` when this call inserted the row.
async fn record_entry(
    db_tx: &DatabaseTransaction,
    tx: FinancialTransaction,
) -> ResultLedger<(FinancialTransaction, bool)> {
    match insert_unique(db_tx, &tx).await {
        Ok(()) => Ok((tx, true)),
        Err(LedgerError::DuplicateTransaction(_)) => {
            let source = tx
                .source
                .ok_or_else(|| LedgerError::KeyNotFound("transaction not exists".to_string()))?;
            let existing = find_source_transaction(db_tx, source, tx.category)
                .await?
                .ok_or_else(|| LedgerError::KeyNotFound("transaction not exists".to_string()))?;
            Ok((existing, false))
        }
        Err(err) => Err(err),
    }
}

async fn insert_unique(
    db_tx: &DatabaseTransaction,
    tx: &FinancialTransaction,
) -> ResultLedger<()> {
    let duplicate = |source: TransactionSource| {
        LedgerError::DuplicateTransaction(format!(
            "transaction already recorded for {} {}",
            source.kind().as_str(),
            source.id()
        ))
    };

    if let Some(source) = tx.source
        && find_source_transaction(db_tx, source, tx.category)
            .await?
            .is_some()
    {
        return Err(duplicate(source));
    }

    if let Err(err) = transactions::ActiveModel::from(tx).insert(db_tx).await {
        // Unique-index race: another writer inserted between the pre-check
        // and this insert.
        if let Some(source) = tx.source
            && find_source_transaction(db_tx, source, tx.category)
                .await?
                .is_some()
        {
            return Err(duplicate(source));
        }
        return Err(err.into());
    }

    Ok(())
}
