use sea_orm_migration::prelude::*;

use crate::m20260310_000001_campaigns::Campaigns;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum FinancialReports {
    Table,
    Id,
    CampaignId,
    PeriodStart,
    PeriodEnd,
    TotalIncome,
    TotalExpenses,
    NetBalance,
    TotalDonors,
    AverageDonation,
    IsPublic,
    IsVerified,
    GeneratedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FinancialReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FinancialReports::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FinancialReports::CampaignId).string())
                    .col(
                        ColumnDef::new(FinancialReports::PeriodStart)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialReports::PeriodEnd)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialReports::TotalIncome)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialReports::TotalExpenses)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialReports::NetBalance)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialReports::TotalDonors)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialReports::AverageDonation)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialReports::IsPublic)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialReports::IsVerified)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialReports::GeneratedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-financial_reports-campaign_id")
                            .from(FinancialReports::Table, FinancialReports::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-financial_reports-campaign_id-generated_at")
                    .table(FinancialReports::Table)
                    .col(FinancialReports::CampaignId)
                    .col(FinancialReports::GeneratedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FinancialReports::Table).to_owned())
            .await
    }
}
