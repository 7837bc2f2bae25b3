use sea_orm_migration::prelude::*;

use crate::m20260310_000001_campaigns::Campaigns;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Donations {
    Table,
    Id,
    CampaignId,
    UserId,
    Amount,
    PaymentMethod,
    Status,
    Message,
    IsAnonymous,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Donations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Donations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Donations::CampaignId).string().not_null())
                    .col(ColumnDef::new(Donations::UserId).string())
                    .col(ColumnDef::new(Donations::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Donations::PaymentMethod)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Donations::Status).string().not_null())
                    .col(ColumnDef::new(Donations::Message).string())
                    .col(
                        ColumnDef::new(Donations::IsAnonymous)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Donations::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-donations-campaign_id")
                            .from(Donations::Table, Donations::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-donations-campaign_id-status")
                    .table(Donations::Table)
                    .col(Donations::CampaignId)
                    .col(Donations::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Donations::Table).to_owned())
            .await
    }
}
