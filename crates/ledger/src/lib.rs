pub use campaigns::{Campaign, CampaignStatus};
pub use commands::{DisbursementCmd, DonationCmd, RefundCmd, ReportCmd};
pub use donations::{Donation, DonationStatus};
pub use error::LedgerError;
pub use ops::{
    CampaignBreakdown, Ledger, LedgerBuilder, MonthlyTotals, TransparencyView, YearToDate,
};
pub use reports::{FinancialReport, utilization_rate};
pub use transactions::{
    FinancialTransaction, TransactionCategory, TransactionKind, TransactionSource,
    TransactionStatus,
};

mod campaigns;
mod commands;
mod donations;
mod error;
mod ops;
pub mod policy;
mod reports;
mod transactions;

type ResultLedger<T> = Result<T, LedgerError>;
