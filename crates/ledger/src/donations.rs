//! Donation primitives.
//!
//! A `Donation` records a single contribution toward a campaign. The stored
//! amount is the literal donor-submitted amount: no platform or processing
//! fee is ever subtracted from it, here or anywhere downstream.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Pending,
    Completed,
    Failed,
}

impl DonationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl TryFrom<&str> for DonationStatus {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(LedgerError::InvalidStatus(format!(
                "invalid donation status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub campaign_id: Uuid,
    /// Donor account id; `None` for anonymous donations.
    pub user_id: Option<String>,
    pub amount: i64,
    pub payment_method: String,
    pub status: DonationStatus,
    pub message: Option<String>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

impl Donation {
    pub fn new(
        campaign_id: Uuid,
        user_id: Option<String>,
        amount: i64,
        payment_method: String,
        message: Option<String>,
        is_anonymous: bool,
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
            user_id: if is_anonymous { None } else { user_id },
            amount,
            payment_method,
            status: DonationStatus::Pending,
            message,
            is_anonymous,
            created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub campaign_id: String,
    pub user_id: Option<String>,
    pub amount: i64,
    pub payment_method: String,
    pub status: String,
    pub message: Option<String>,
    pub is_anonymous: bool,
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

impl From<&Donation> for ActiveModel {
    fn from(donation: &Donation) -> Self {
        Self {
            id: ActiveValue::Set(donation.id.to_string()),
            campaign_id: ActiveValue::Set(donation.campaign_id.to_string()),
            user_id: ActiveValue::Set(donation.user_id.clone()),
            amount: ActiveValue::Set(donation.amount),
            payment_method: ActiveValue::Set(donation.payment_method.clone()),
            status: ActiveValue::Set(donation.status.as_str().to_string()),
            message: ActiveValue::Set(donation.message.clone()),
            is_anonymous: ActiveValue::Set(donation.is_anonymous),
            created_at: ActiveValue::Set(donation.created_at),
        }
    }
}

impl TryFrom<Model> for Donation {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::KeyNotFound("donation not exists".to_string()))?,
            campaign_id: Uuid::parse_str(&model.campaign_id)
                .map_err(|_| LedgerError::KeyNotFound("campaign not exists".to_string()))?,
            user_id: model.user_id,
            amount: model.amount,
            payment_method: model.payment_method,
            status: DonationStatus::try_from(model.status.as_str())?,
            message: model.message,
            is_anonymous: model.is_anonymous,
            created_at: model.created_at,
        })
    }
}
