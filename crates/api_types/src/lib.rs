use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Standard `{success, data}` envelope for read endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { success: true, data }
    }
}

pub mod campaign {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CampaignStatus {
        Pending,
        Active,
        Completed,
        Rejected,
        Cancelled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CampaignNew {
        pub title: String,
        /// Whole currency units.
        pub target_amount: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CampaignCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CampaignView {
        pub id: Uuid,
        pub title: String,
        pub target_amount: i64,
        pub current_amount: i64,
        pub status: CampaignStatus,
    }
}

pub mod donation {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DonationStatus {
        Pending,
        Completed,
        Failed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationNew {
        pub campaign_id: Uuid,
        /// Donor account id; omit for anonymous donations.
        pub user_id: Option<String>,
        pub amount: i64,
        pub payment_method: Option<String>,
        pub message: Option<String>,
        pub is_anonymous: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationView {
        pub id: Uuid,
        pub campaign_id: Uuid,
        pub amount: i64,
        pub status: DonationStatus,
        pub is_anonymous: bool,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionCategory {
        Donation,
        Disbursement,
        Refund,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DisbursementNew {
        pub campaign_id: Uuid,
        pub amount: i64,
        pub sub_category: Option<String>,
        pub description: Option<String>,
        /// Idempotency handle; resending the same batch id returns the
        /// already-recorded transaction.
        pub batch_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RefundNew {
        pub donation_id: Uuid,
        pub sub_category: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub campaign_id: Option<Uuid>,
        pub kind: TransactionKind,
        pub category: TransactionCategory,
        pub sub_category: Option<String>,
        pub amount: i64,
        pub description: Option<String>,
        pub created_at: DateTime<FixedOffset>,
    }
}

pub mod report {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GenerateReport {
        pub period_start: DateTime<FixedOffset>,
        pub period_end: DateTime<FixedOffset>,
        /// Omit for a platform-wide report.
        pub campaign_id: Option<Uuid>,
        pub is_public: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportView {
        pub id: Uuid,
        pub campaign_id: Option<Uuid>,
        pub period_start: DateTime<FixedOffset>,
        pub period_end: DateTime<FixedOffset>,
        pub total_income: i64,
        pub total_expenses: i64,
        pub net_balance: i64,
        pub total_donors: i64,
        pub average_donation: f64,
        pub fund_utilization_rate: f64,
        pub is_public: bool,
        pub is_verified: bool,
        pub generated_at: DateTime<FixedOffset>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum InsightTrend {
        Positive,
        Neutral,
        Negative,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Insight {
        #[serde(rename = "type")]
        pub kind: String,
        pub value: f64,
        pub trend: InsightTrend,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportDetail {
        pub report: ReportView,
        pub insights: Vec<Insight>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TrendQuery {
        /// Number of calendar months to include, newest last.
        pub months: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyTrendPoint {
        pub month: String,
        pub total_income: i64,
        pub total_expenses: i64,
        pub net_balance: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CampaignBreakdownRow {
        pub campaign_id: Uuid,
        pub title: String,
        pub status: campaign::CampaignStatus,
        pub target_amount: i64,
        pub current_amount: i64,
        pub total_income: i64,
        pub total_expenses: i64,
        pub utilization_rate: f64,
    }

    /// Fixed policy rates; platform constants, not derived state.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransparencyMetrics {
        pub platform_fee_rate: f64,
        pub processing_fee_rate: f64,
        pub donation_efficiency: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct YearToDate {
        pub total_donations: i64,
        pub total_disbursements: i64,
        pub available_funds: i64,
        pub utilization_rate: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PlatformTotals {
        pub year_to_date: YearToDate,
        pub transparency_metrics: TransparencyMetrics,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransparencyData {
        pub latest_reports: Vec<ReportView>,
        pub recent_transactions: Vec<transaction::TransactionView>,
        pub platform_totals: PlatformTotals,
        pub fund_utilization: f64,
        pub transparency_note: String,
    }
}
