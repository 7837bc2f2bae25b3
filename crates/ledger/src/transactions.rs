//! Financial transaction primitives.
//!
//! A `FinancialTransaction` is an immutable ledger entry recording money
//! movement (income or expense) tied to a campaign. Rows are append-only:
//! after creation only the status may be corrected, nothing is ever deleted.
//!
//! The kind is not free-standing state; it is derived from the category
//! (donations are income, disbursements and refunds are expenses).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(LedgerError::InvalidStatus(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    Donation,
    Disbursement,
    Refund,
}

impl TransactionCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Donation => "donation",
            Self::Disbursement => "disbursement",
            Self::Refund => "refund",
        }
    }

    /// The kind implied by this category.
    pub fn kind(self) -> TransactionKind {
        match self {
            Self::Donation => TransactionKind::Income,
            Self::Disbursement | Self::Refund => TransactionKind::Expense,
        }
    }
}

impl TryFrom<&str> for TransactionCategory {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "donation" => Ok(Self::Donation),
            "disbursement" => Ok(Self::Disbursement),
            "refund" => Ok(Self::Refund),
            other => Err(LedgerError::InvalidStatus(format!(
                "invalid transaction category: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(LedgerError::InvalidStatus(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SourceKind {
    Donation,
    Disbursement,
    Refund,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Donation => "donation",
            Self::Disbursement => "disbursement",
            Self::Refund => "refund",
        }
    }
}

impl TryFrom<&str> for SourceKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "donation" => Ok(Self::Donation),
            "disbursement" => Ok(Self::Disbursement),
            "refund" => Ok(Self::Refund),
            other => Err(LedgerError::InvalidStatus(format!(
                "invalid transaction source kind: {other}"
            ))),
        }
    }
}

/// The event a transaction was recorded for.
///
/// A closed set of originating events, each carrying its own typed
/// reference. Together with the category this forms the natural key that
/// makes recording idempotent: at most one row may exist per
/// (source kind, source id, category).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TransactionSource {
    Donation { donation_id: Uuid },
    Disbursement { batch_id: Uuid },
    Refund { donation_id: Uuid },
}

impl TransactionSource {
    pub(crate) fn kind(self) -> SourceKind {
        match self {
            Self::Donation { .. } => SourceKind::Donation,
            Self::Disbursement { .. } => SourceKind::Disbursement,
            Self::Refund { .. } => SourceKind::Refund,
        }
    }

    pub(crate) fn id(self) -> Uuid {
        match self {
            Self::Donation { donation_id } => donation_id,
            Self::Disbursement { batch_id } => batch_id,
            Self::Refund { donation_id } => donation_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialTransaction {
    pub id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub kind: TransactionKind,
    pub category: TransactionCategory,
    pub sub_category: Option<String>,
    pub amount: i64,
    pub description: Option<String>,
    pub status: TransactionStatus,
    pub source: Option<TransactionSource>,
    pub created_at: DateTime<Utc>,
}

impl FinancialTransaction {
    pub fn new(
        campaign_id: Option<Uuid>,
        category: TransactionCategory,
        amount: i64,
        sub_category: Option<String>,
        description: Option<String>,
        source: Option<TransactionSource>,
        created_at: DateTime<Utc>,
    ) -> ResultLedger<Self> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            campaign_id,
            kind: category.kind(),
            category,
            sub_category,
            amount,
            description,
            status: TransactionStatus::Completed,
            source,
            created_at,
        })
    }

    fn source_kind(&self) -> Option<SourceKind> {
        self.source.map(TransactionSource::kind)
    }

    fn source_id(&self) -> Option<Uuid> {
        self.source.map(TransactionSource::id)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "financial_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub campaign_id: Option<String>,
    pub kind: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub amount: i64,
    pub description: Option<String>,
    pub status: String,
    pub source_kind: Option<String>,
    pub source_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campaigns::Entity",
        from = "Column::CampaignId",
        to = "super::campaigns::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Campaigns,
}

impl Related<super::campaigns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaigns.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&FinancialTransaction> for ActiveModel {
    fn from(tx: &FinancialTransaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            campaign_id: ActiveValue::Set(tx.campaign_id.map(|id| id.to_string())),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            category: ActiveValue::Set(tx.category.as_str().to_string()),
            sub_category: ActiveValue::Set(tx.sub_category.clone()),
            amount: ActiveValue::Set(tx.amount),
            description: ActiveValue::Set(tx.description.clone()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            source_kind: ActiveValue::Set(
                tx.source_kind().map(|kind| kind.as_str().to_string()),
            ),
            source_id: ActiveValue::Set(tx.source_id().map(|id| id.to_string())),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for FinancialTransaction {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let source = match (model.source_kind.as_deref(), model.source_id.as_deref()) {
            (Some(kind), Some(id)) => {
                let source_id = Uuid::parse_str(id).map_err(|_| {
                    LedgerError::InvalidStatus("invalid transaction source id".to_string())
                })?;
                Some(match SourceKind::try_from(kind)? {
                    SourceKind::Donation => TransactionSource::Donation {
                        donation_id: source_id,
                    },
                    SourceKind::Disbursement => TransactionSource::Disbursement {
                        batch_id: source_id,
                    },
                    SourceKind::Refund => TransactionSource::Refund {
                        donation_id: source_id,
                    },
                })
            }
            _ => None,
        };

        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::KeyNotFound("transaction not exists".to_string()))?,
            campaign_id: model
                .campaign_id
                .as_deref()
                .and_then(|id| Uuid::parse_str(id).ok()),
            kind: TransactionKind::try_from(model.kind.as_str())?,
            category: TransactionCategory::try_from(model.category.as_str())?,
            sub_category: model.sub_category,
            amount: model.amount,
            description: model.description,
            status: TransactionStatus::try_from(model.status.as_str())?,
            source,
            created_at: model.created_at,
        })
    }
}
