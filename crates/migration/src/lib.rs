pub use sea_orm_migration::prelude::*;

mod m20260310_000001_campaigns;
mod m20260310_000002_donations;
mod m20260322_000001_financial_transactions;
mod m20260405_000001_financial_reports;
mod m20260418_000001_source_unique;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260310_000001_campaigns::Migration),
            Box::new(m20260310_000002_donations::Migration),
            Box::new(m20260322_000001_financial_transactions::Migration),
            Box::new(m20260405_000001_financial_reports::Migration),
            Box::new(m20260418_000001_source_unique::Migration),
        ]
    }
}
