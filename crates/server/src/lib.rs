use axum::{Json, http::StatusCode, response::IntoResponse};
use ledger::LedgerError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod campaigns;
mod donations;
mod reports;
mod server;
mod transactions;

pub mod types {
    pub mod campaign {
        pub use api_types::campaign::{CampaignCreated, CampaignNew, CampaignStatus, CampaignView};
    }

    pub mod donation {
        pub use api_types::donation::{DonationCreated, DonationNew, DonationStatus, DonationView};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            DisbursementNew, RefundNew, TransactionCategory, TransactionCreated, TransactionKind,
            TransactionView,
        };
    }

    pub mod report {
        pub use api_types::report::{
            CampaignBreakdownRow, GenerateReport, Insight, InsightTrend, MonthlyTrendPoint,
            PlatformTotals, ReportDetail, ReportView, TransparencyData, TransparencyMetrics,
            YearToDate,
        };
    }
}

pub enum ServerError {
    Ledger(LedgerError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_ledger_error(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::ExistingKey(_)
        | LedgerError::DuplicateTransaction(_)
        | LedgerError::ConflictRetryExhausted(_) => StatusCode::CONFLICT,
        LedgerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        LedgerError::InvalidAmount(_)
        | LedgerError::InvalidStatus(_)
        | LedgerError::InvalidPeriod(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_ledger_error(err: LedgerError) -> String {
    match err {
        LedgerError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Ledger(err) => (status_for_ledger_error(&err), message_for_ledger_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}
