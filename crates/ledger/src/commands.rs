//! Command structs for ledger operations.
//!
//! These types group parameters for write operations (donations,
//! disbursements, refunds, report generation), keeping call sites readable
//! and avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Create a pending donation.
#[derive(Clone, Debug)]
pub struct DonationCmd {
    pub campaign_id: Uuid,
    pub user_id: Option<String>,
    pub amount: i64,
    pub payment_method: String,
    pub message: Option<String>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

impl DonationCmd {
    #[must_use]
    pub fn new(campaign_id: Uuid, amount: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            campaign_id,
            user_id: None,
            amount,
            payment_method: "manual".to_string(),
            message: None,
            is_anonymous: false,
            created_at,
        }
    }

    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = payment_method.into();
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.is_anonymous = true;
        self.user_id = None;
        self
    }
}

/// Record an admin-initiated disbursement (expense).
#[derive(Clone, Debug)]
pub struct DisbursementCmd {
    pub campaign_id: Uuid,
    pub amount: i64,
    pub sub_category: Option<String>,
    pub description: Option<String>,
    /// Caller-supplied idempotency handle; retries with the same batch id
    /// return the already-recorded transaction.
    pub batch_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl DisbursementCmd {
    #[must_use]
    pub fn new(campaign_id: Uuid, amount: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            campaign_id,
            amount,
            sub_category: None,
            description: None,
            batch_id: Uuid::new_v4(),
            created_at,
        }
    }

    #[must_use]
    pub fn sub_category(mut self, sub_category: impl Into<String>) -> Self {
        self.sub_category = Some(sub_category.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn batch_id(mut self, batch_id: Uuid) -> Self {
        self.batch_id = batch_id;
        self
    }
}

/// Record a refund (expense) for a completed donation.
#[derive(Clone, Debug)]
pub struct RefundCmd {
    pub donation_id: Uuid,
    pub sub_category: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RefundCmd {
    #[must_use]
    pub fn new(donation_id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            donation_id,
            sub_category: None,
            description: None,
            created_at,
        }
    }

    #[must_use]
    pub fn sub_category(mut self, sub_category: impl Into<String>) -> Self {
        self.sub_category = Some(sub_category.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Generate a financial report for a half-open period.
#[derive(Clone, Debug)]
pub struct ReportCmd {
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    /// `None` generates a platform-wide report.
    pub campaign_id: Option<Uuid>,
    pub is_public: bool,
    pub generated_at: DateTime<Utc>,
}

impl ReportCmd {
    #[must_use]
    pub fn new(
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            period_start,
            period_end,
            campaign_id: None,
            is_public: true,
            generated_at,
        }
    }

    #[must_use]
    pub fn campaign_id(mut self, campaign_id: Uuid) -> Self {
        self.campaign_id = Some(campaign_id);
        self
    }

    #[must_use]
    pub fn internal(mut self) -> Self {
        self.is_public = false;
        self
    }
}
