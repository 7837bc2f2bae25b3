//! Campaign primitives.
//!
//! A `Campaign` is a fundraising effort with a target amount and a running
//! total (`current_amount`) maintained from completed donations.
//!
//! Amounts are stored as **whole currency units** (the platform is
//! single-currency and never handles fractions).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Pending,
    Active,
    Completed,
    Rejected,
    Cancelled,
}

impl CampaignStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for CampaignStatus {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(LedgerError::InvalidStatus(format!(
                "invalid campaign status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub title: String,
    pub target_amount: i64,
    pub current_amount: i64,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    pub fn new(title: String, target_amount: i64, created_at: DateTime<Utc>) -> ResultLedger<Self> {
        if target_amount <= 0 {
            return Err(LedgerError::InvalidAmount(
                "target_amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            target_amount,
            current_amount: 0,
            status: CampaignStatus::Pending,
            created_at,
        })
    }

    /// Returns `true` once the running total has reached the target.
    pub fn is_funded(&self) -> bool {
        self.current_amount >= self.target_amount
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub target_amount: i64,
    pub current_amount: i64,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::donations::Entity")]
    Donations,
}

impl Related<super::donations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Campaign> for ActiveModel {
    fn from(campaign: &Campaign) -> Self {
        Self {
            id: ActiveValue::Set(campaign.id.to_string()),
            title: ActiveValue::Set(campaign.title.clone()),
            target_amount: ActiveValue::Set(campaign.target_amount),
            current_amount: ActiveValue::Set(campaign.current_amount),
            status: ActiveValue::Set(campaign.status.as_str().to_string()),
            created_at: ActiveValue::Set(campaign.created_at),
        }
    }
}

impl TryFrom<Model> for Campaign {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::KeyNotFound("campaign not exists".to_string()))?,
            title: model.title,
            target_amount: model.target_amount,
            current_amount: model.current_amount,
            status: CampaignStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
        })
    }
}
