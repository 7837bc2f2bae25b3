use sea_orm_migration::prelude::*;

use crate::m20260322_000001_financial_transactions::FinancialTransactions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("uidx-financial_transactions-source_kind-source_id-category")
                    .table(FinancialTransactions::Table)
                    .col(FinancialTransactions::SourceKind)
                    .col(FinancialTransactions::SourceId)
                    .col(FinancialTransactions::Category)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uidx-financial_transactions-source_kind-source_id-category")
                    .table(FinancialTransactions::Table)
                    .to_owned(),
            )
            .await
    }
}
