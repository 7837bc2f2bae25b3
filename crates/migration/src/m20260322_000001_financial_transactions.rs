use sea_orm_migration::prelude::*;

use crate::m20260310_000001_campaigns::Campaigns;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum FinancialTransactions {
    Table,
    Id,
    CampaignId,
    Kind,
    Category,
    SubCategory,
    Amount,
    Description,
    Status,
    SourceKind,
    SourceId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FinancialTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FinancialTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FinancialTransactions::CampaignId).string())
                    .col(ColumnDef::new(FinancialTransactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(FinancialTransactions::Category)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FinancialTransactions::SubCategory).string())
                    .col(
                        ColumnDef::new(FinancialTransactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FinancialTransactions::Description).string())
                    .col(
                        ColumnDef::new(FinancialTransactions::Status)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FinancialTransactions::SourceKind).string())
                    .col(ColumnDef::new(FinancialTransactions::SourceId).string())
                    .col(
                        ColumnDef::new(FinancialTransactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-financial_transactions-campaign_id")
                            .from(
                                FinancialTransactions::Table,
                                FinancialTransactions::CampaignId,
                            )
                            .to(Campaigns::Table, Campaigns::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-financial_transactions-campaign_id-created_at")
                    .table(FinancialTransactions::Table)
                    .col(FinancialTransactions::CampaignId)
                    .col(FinancialTransactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-financial_transactions-status-kind-created_at")
                    .table(FinancialTransactions::Table)
                    .col(FinancialTransactions::Status)
                    .col(FinancialTransactions::Kind)
                    .col(FinancialTransactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FinancialTransactions::Table).to_owned())
            .await
    }
}
