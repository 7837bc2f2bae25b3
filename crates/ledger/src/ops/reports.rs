use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{
    ConnectionTrait, QueryOrder, Statement, TransactionTrait, Value, prelude::*,
};

use crate::{
    Campaign, CampaignStatus, FinancialReport, LedgerError, ReportCmd, ResultLedger,
    TransactionCategory, TransactionKind, TransactionStatus, campaigns, reports,
    utilization_rate,
};

use super::{Ledger, with_tx};

/// One month of aggregated ledger activity, oldest first in a trend series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    /// Label in `YYYY-MM` form.
    pub month: String,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub total_income: i64,
    pub total_expenses: i64,
    pub net_balance: i64,
}

/// All-time totals for a single campaign.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignBreakdown {
    pub campaign_id: Uuid,
    pub title: String,
    pub status: CampaignStatus,
    pub target_amount: i64,
    pub current_amount: i64,
    pub total_income: i64,
    pub total_expenses: i64,
    pub utilization_rate: f64,
}

impl Ledger {
    /// Generates a financial report over `[period_start, period_end)`.
    ///
    /// The report is persisted as a new immutable row; recomputing the same
    /// period later inserts another row instead of touching this one. An
    /// empty window is not an error and produces all-zero aggregates.
    pub async fn generate_report(&self, cmd: ReportCmd) -> ResultLedger<FinancialReport> {
        if cmd.period_end <= cmd.period_start {
            return Err(LedgerError::InvalidPeriod(
                "period_end must be after period_start".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let window = Some((cmd.period_start, cmd.period_end));
            let total_income =
                completed_amount_sum(&db_tx, TransactionKind::Income, window, cmd.campaign_id)
                    .await?;
            let total_expenses =
                completed_amount_sum(&db_tx, TransactionKind::Expense, window, cmd.campaign_id)
                    .await?;
            let donation_count = completed_category_count(
                &db_tx,
                TransactionCategory::Donation,
                window,
                cmd.campaign_id,
            )
            .await?;
            let total_donors = donor_count(&db_tx, window, cmd.campaign_id).await?;

            let average_donation = if donation_count == 0 {
                0.0
            } else {
                total_income as f64 / donation_count as f64
            };

            let report = FinancialReport {
                id: Uuid::new_v4(),
                campaign_id: cmd.campaign_id,
                period_start: cmd.period_start,
                period_end: cmd.period_end,
                total_income,
                total_expenses,
                net_balance: total_income - total_expenses,
                total_donors,
                average_donation,
                is_public: cmd.is_public,
                is_verified: false,
                generated_at: cmd.generated_at,
            };
            reports::ActiveModel::from(&report).insert(&db_tx).await?;
            Ok(report)
        })
    }

    /// Return a [`FinancialReport`].
    pub async fn report(&self, report_id: Uuid) -> ResultLedger<FinancialReport> {
        let model = reports::Entity::find_by_id(report_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound("report not exists".to_string()))?;
        FinancialReport::try_from(model)
    }

    /// All-time fund utilization, recomputed from the ledger at query time.
    pub async fn current_fund_utilization(
        &self,
        campaign_id: Option<Uuid>,
    ) -> ResultLedger<f64> {
        let income =
            completed_amount_sum(&self.database, TransactionKind::Income, None, campaign_id)
                .await?;
        let expenses =
            completed_amount_sum(&self.database, TransactionKind::Expense, None, campaign_id)
                .await?;
        Ok(utilization_rate(income, expenses))
    }

    /// Income/expense series for the `months` calendar months up to `as_of`,
    /// oldest first.
    pub async fn monthly_trend(
        &self,
        months: u32,
        as_of: DateTime<Utc>,
    ) -> ResultLedger<Vec<MonthlyTotals>> {
        use chrono::Datelike;

        let mut out = Vec::with_capacity(months as usize);
        for back in (0..months).rev() {
            let (year, month) = shift_month(as_of.year(), as_of.month(), back);
            let start = month_start(year, month)?;
            let (next_year, next_month) = next_of(year, month);
            let end = month_start(next_year, next_month)?;

            let window = Some((start, end));
            let total_income =
                completed_amount_sum(&self.database, TransactionKind::Income, window, None)
                    .await?;
            let total_expenses =
                completed_amount_sum(&self.database, TransactionKind::Expense, window, None)
                    .await?;

            out.push(MonthlyTotals {
                month: format!("{year}-{month:02}"),
                period_start: start,
                period_end: end,
                total_income,
                total_expenses,
                net_balance: total_income - total_expenses,
            });
        }
        Ok(out)
    }

    /// All-time totals per campaign, for dashboards.
    pub async fn campaign_breakdown(&self) -> ResultLedger<Vec<CampaignBreakdown>> {
        let models = campaigns::Entity::find()
            .order_by_asc(campaigns::Column::CreatedAt)
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let campaign = Campaign::try_from(model)?;
            let total_income = completed_amount_sum(
                &self.database,
                TransactionKind::Income,
                None,
                Some(campaign.id),
            )
            .await?;
            let total_expenses = completed_amount_sum(
                &self.database,
                TransactionKind::Expense,
                None,
                Some(campaign.id),
            )
            .await?;

            out.push(CampaignBreakdown {
                campaign_id: campaign.id,
                title: campaign.title,
                status: campaign.status,
                target_amount: campaign.target_amount,
                current_amount: campaign.current_amount,
                total_income,
                total_expenses,
                utilization_rate: utilization_rate(total_income, total_expenses),
            });
        }
        Ok(out)
    }
}

fn month_start(year: i32, month: u32) -> ResultLedger<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| LedgerError::InvalidPeriod(format!("invalid month: {year}-{month:02}")))
}

/// Shifts `back` months into the past.
fn shift_month(year: i32, month: u32, back: u32) -> (i32, u32) {
    let total = i64::from(year) * 12 + i64::from(month) - 1 - i64::from(back);
    (
        total.div_euclid(12) as i32,
        total.rem_euclid(12) as u32 + 1,
    )
}

fn next_of(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

fn push_window_and_campaign(
    sql: &mut String,
    values: &mut Vec<Value>,
    column_prefix: &str,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    campaign_id: Option<Uuid>,
) {
    if let Some((start, end)) = window {
        sql.push_str(&format!(
            " AND {column_prefix}created_at >= ? AND {column_prefix}created_at < ?"
        ));
        values.push(start.into());
        values.push(end.into());
    }
    if let Some(campaign_id) = campaign_id {
        sql.push_str(&format!(" AND {column_prefix}campaign_id = ?"));
        values.push(campaign_id.to_string().into());
    }
}

pub(super) async fn completed_amount_sum<C: ConnectionTrait>(
    db: &C,
    kind: TransactionKind,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    campaign_id: Option<Uuid>,
) -> ResultLedger<i64> {
    let backend = db.get_database_backend();
    let mut sql = String::from(
        "SELECT COALESCE(SUM(amount), 0) AS sum \
         FROM financial_transactions \
         WHERE status = ? AND kind = ?",
    );
    let mut values: Vec<Value> = vec![
        TransactionStatus::Completed.as_str().into(),
        kind.as_str().into(),
    ];
    push_window_and_campaign(&mut sql, &mut values, "", window, campaign_id);

    let row = db
        .query_one(Statement::from_sql_and_values(backend, sql, values))
        .await?;
    Ok(row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0))
}

pub(super) async fn completed_category_sum<C: ConnectionTrait>(
    db: &C,
    category: TransactionCategory,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    campaign_id: Option<Uuid>,
) -> ResultLedger<i64> {
    let backend = db.get_database_backend();
    let mut sql = String::from(
        "SELECT COALESCE(SUM(amount), 0) AS sum \
         FROM financial_transactions \
         WHERE status = ? AND category = ?",
    );
    let mut values: Vec<Value> = vec![
        TransactionStatus::Completed.as_str().into(),
        category.as_str().into(),
    ];
    push_window_and_campaign(&mut sql, &mut values, "", window, campaign_id);

    let row = db
        .query_one(Statement::from_sql_and_values(backend, sql, values))
        .await?;
    Ok(row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0))
}

async fn completed_category_count<C: ConnectionTrait>(
    db: &C,
    category: TransactionCategory,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    campaign_id: Option<Uuid>,
) -> ResultLedger<i64> {
    let backend = db.get_database_backend();
    let mut sql = String::from(
        "SELECT COUNT(*) AS cnt \
         FROM financial_transactions \
         WHERE status = ? AND category = ?",
    );
    let mut values: Vec<Value> = vec![
        TransactionStatus::Completed.as_str().into(),
        category.as_str().into(),
    ];
    push_window_and_campaign(&mut sql, &mut values, "", window, campaign_id);

    let row = db
        .query_one(Statement::from_sql_and_values(backend, sql, values))
        .await?;
    Ok(row.and_then(|r| r.try_get("", "cnt").ok()).unwrap_or(0))
}

/// Distinct donor identities behind the recorded donation entries in the
/// window. Named donors are deduplicated; every anonymous donation counts as
/// its own entry.
async fn donor_count<C: ConnectionTrait>(
    db: &C,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    campaign_id: Option<Uuid>,
) -> ResultLedger<i64> {
    let backend = db.get_database_backend();

    let named: i64 = {
        let mut sql = String::from(
            "SELECT COUNT(DISTINCT d.user_id) AS cnt \
             FROM donations d \
             INNER JOIN financial_transactions t \
             ON t.source_kind = ? AND t.source_id = d.id \
             WHERE t.status = ? AND t.category = ? \
             AND d.is_anonymous = ? AND d.user_id IS NOT NULL",
        );
        let mut values: Vec<Value> = vec![
            TransactionCategory::Donation.as_str().into(),
            TransactionStatus::Completed.as_str().into(),
            TransactionCategory::Donation.as_str().into(),
            false.into(),
        ];
        push_window_and_campaign(&mut sql, &mut values, "t.", window, campaign_id);
        let row = db
            .query_one(Statement::from_sql_and_values(backend, sql, values))
            .await?;
        row.and_then(|r| r.try_get("", "cnt").ok()).unwrap_or(0)
    };

    let anonymous: i64 = {
        let mut sql = String::from(
            "SELECT COUNT(*) AS cnt \
             FROM donations d \
             INNER JOIN financial_transactions t \
             ON t.source_kind = ? AND t.source_id = d.id \
             WHERE t.status = ? AND t.category = ? \
             AND (d.is_anonymous = ? OR d.user_id IS NULL)",
        );
        let mut values: Vec<Value> = vec![
            TransactionCategory::Donation.as_str().into(),
            TransactionStatus::Completed.as_str().into(),
            TransactionCategory::Donation.as_str().into(),
            true.into(),
        ];
        push_window_and_campaign(&mut sql, &mut values, "t.", window, campaign_id);
        let row = db
            .query_one(Statement::from_sql_and_values(backend, sql, values))
            .await?;
        row.and_then(|r| r.try_get("", "cnt").ok()).unwrap_or(0)
    };

    Ok(named + anonymous)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_month_crosses_year_boundaries() {
        assert_eq!(shift_month(2026, 3, 0), (2026, 3));
        assert_eq!(shift_month(2026, 3, 3), (2025, 12));
        assert_eq!(shift_month(2026, 1, 13), (2024, 12));
    }

    #[test]
    fn next_of_wraps_december() {
        assert_eq!(next_of(2026, 12), (2027, 1));
        assert_eq!(next_of(2026, 6), (2026, 7));
    }
}
