use std::collections::HashSet;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use sea_orm::{QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{
    FinancialReport, FinancialTransaction, LedgerError, ResultLedger, TransactionCategory,
    TransactionKind, TransactionStatus, policy, reports, transactions, utilization_rate,
};

use super::Ledger;
use super::reports::{completed_amount_sum, completed_category_sum};

/// Platform totals from January 1st of the `as_of` year up to `as_of`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YearToDate {
    pub total_donations: i64,
    pub total_disbursements: i64,
    /// Income minus all expenses (disbursements and refunds).
    pub available_funds: i64,
    pub utilization_rate: f64,
}

/// The public-facing projection of the ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransparencyView {
    /// Most recent public report per scope (platform-wide and per campaign).
    pub latest_reports: Vec<FinancialReport>,
    pub recent_transactions: Vec<FinancialTransaction>,
    pub year_to_date: YearToDate,
}

impl Ledger {
    /// Builds the transparency view as of a point in time.
    ///
    /// Fails closed on categories: only {donation, disbursement, refund} may
    /// appear in `recent_transactions`. The restriction is applied in the
    /// query *and* re-checked per decoded row, so a fee-like row sitting in
    /// storage could still never leak into the projection.
    pub async fn transparency_view(
        &self,
        as_of: DateTime<Utc>,
        recent_limit: u64,
    ) -> ResultLedger<TransparencyView> {
        let latest_reports = self.latest_public_reports().await?;

        let public_categories: Vec<&str> = policy::PUBLIC_CATEGORIES
            .iter()
            .map(|category| category.as_str())
            .collect();
        let rows = transactions::Entity::find()
            .filter(transactions::Column::Status.eq(TransactionStatus::Completed.as_str()))
            .filter(transactions::Column::Category.is_in(public_categories))
            .filter(transactions::Column::CreatedAt.lt(as_of))
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(recent_limit)
            .all(&self.database)
            .await?;

        let mut recent_transactions = Vec::with_capacity(rows.len());
        for model in rows {
            let tx = FinancialTransaction::try_from(model)?;
            if policy::is_public_category(tx.category) {
                recent_transactions.push(tx);
            }
        }

        let year_start = Utc
            .with_ymd_and_hms(as_of.year(), 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| {
                LedgerError::InvalidPeriod(format!("invalid year start for {as_of}"))
            })?;
        let window = Some((year_start, as_of));
        let total_donations =
            completed_amount_sum(&self.database, TransactionKind::Income, window, None).await?;
        let total_expenses =
            completed_amount_sum(&self.database, TransactionKind::Expense, window, None).await?;
        let total_disbursements = completed_category_sum(
            &self.database,
            TransactionCategory::Disbursement,
            window,
            None,
        )
        .await?;

        Ok(TransparencyView {
            latest_reports,
            recent_transactions,
            year_to_date: YearToDate {
                total_donations,
                total_disbursements,
                available_funds: total_donations - total_expenses,
                utilization_rate: utilization_rate(total_donations, total_expenses),
            },
        })
    }

    /// Newest public report for every scope, platform-wide scope included.
    async fn latest_public_reports(&self) -> ResultLedger<Vec<FinancialReport>> {
        let models = reports::Entity::find()
            .filter(reports::Column::IsPublic.eq(true))
            .order_by_desc(reports::Column::GeneratedAt)
            .all(&self.database)
            .await?;

        let mut seen: HashSet<Option<String>> = HashSet::new();
        let mut out = Vec::new();
        for model in models {
            if seen.insert(model.campaign_id.clone()) {
                out.push(FinancialReport::try_from(model)?);
            }
        }
        Ok(out)
    }
}
