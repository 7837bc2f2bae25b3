//! Financial report snapshots.
//!
//! A `FinancialReport` is a read-optimized aggregate over the transaction
//! ledger for a half-open period `[period_start, period_end)`. Reports are
//! immutable once created; recomputing a period inserts a new row instead of
//! mutating the old one, so a report always reflects the ledger as of its
//! `generated_at` time.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::LedgerError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub id: Uuid,
    /// `None` means platform-wide scope.
    pub campaign_id: Option<Uuid>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub total_income: i64,
    pub total_expenses: i64,
    pub net_balance: i64,
    pub total_donors: i64,
    pub average_donation: f64,
    pub is_public: bool,
    pub is_verified: bool,
    pub generated_at: DateTime<Utc>,
}

impl FinancialReport {
    /// Fund utilization for this report, percent rounded to one decimal.
    ///
    /// 0 when the period had no income (never NaN).
    pub fn fund_utilization_rate(&self) -> f64 {
        utilization_rate(self.total_income, self.total_expenses)
    }
}

/// `round(expenses / income * 100, 1)`, 0 when income is 0.
pub fn utilization_rate(total_income: i64, total_expenses: i64) -> f64 {
    if total_income <= 0 {
        return 0.0;
    }
    let rate = total_expenses as f64 / total_income as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "financial_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub campaign_id: Option<String>,
    pub period_start: DateTimeUtc,
    pub period_end: DateTimeUtc,
    pub total_income: i64,
    pub total_expenses: i64,
    pub net_balance: i64,
    pub total_donors: i64,
    pub average_donation: f64,
    pub is_public: bool,
    pub is_verified: bool,
    pub generated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&FinancialReport> for ActiveModel {
    fn from(report: &FinancialReport) -> Self {
        Self {
            id: ActiveValue::Set(report.id.to_string()),
            campaign_id: ActiveValue::Set(report.campaign_id.map(|id| id.to_string())),
            period_start: ActiveValue::Set(report.period_start),
            period_end: ActiveValue::Set(report.period_end),
            total_income: ActiveValue::Set(report.total_income),
            total_expenses: ActiveValue::Set(report.total_expenses),
            net_balance: ActiveValue::Set(report.net_balance),
            total_donors: ActiveValue::Set(report.total_donors),
            average_donation: ActiveValue::Set(report.average_donation),
            is_public: ActiveValue::Set(report.is_public),
            is_verified: ActiveValue::Set(report.is_verified),
            generated_at: ActiveValue::Set(report.generated_at),
        }
    }
}

impl TryFrom<Model> for FinancialReport {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::KeyNotFound("report not exists".to_string()))?,
            campaign_id: model
                .campaign_id
                .as_deref()
                .and_then(|id| Uuid::parse_str(id).ok()),
            period_start: model.period_start,
            period_end: model.period_end,
            total_income: model.total_income,
            total_expenses: model.total_expenses,
            net_balance: model.net_balance,
            total_donors: model.total_donors,
            average_donation: model.average_donation,
            is_public: model.is_public,
            is_verified: model.is_verified,
            generated_at: model.generated_at,
        })
    }
}
