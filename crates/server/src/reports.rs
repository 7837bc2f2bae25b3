//! Financial report API endpoints
//!
//! Read endpoints answer with the `{success, data}` envelope consumed by the
//! public dashboards.

use api_types::Envelope;
use api_types::report::{
    CampaignBreakdownRow, GenerateReport, Insight, InsightTrend, MonthlyTrendPoint,
    PlatformTotals, ReportDetail, ReportView, TransparencyData, TransparencyMetrics, TrendQuery,
    YearToDate,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{FixedOffset, Utc};
use uuid::Uuid;

use crate::{ServerError, campaigns, server::ServerState, transactions};
use ledger::{ReportCmd, policy};

const RECENT_TRANSACTIONS_LIMIT: u64 = 20;
const TREND_DEFAULT_MONTHS: u32 = 6;
const TRANSPARENCY_NOTE: &str =
    "Donations are recorded at face value; the platform deducts no fees.";

fn utc_offset() -> Result<FixedOffset, ServerError> {
    FixedOffset::east_opt(0).ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))
}

fn map_report(report: &ledger::FinancialReport, offset: FixedOffset) -> ReportView {
    ReportView {
        id: report.id,
        campaign_id: report.campaign_id,
        period_start: report.period_start.with_timezone(&offset),
        period_end: report.period_end.with_timezone(&offset),
        total_income: report.total_income,
        total_expenses: report.total_expenses,
        net_balance: report.net_balance,
        total_donors: report.total_donors,
        average_donation: report.average_donation,
        fund_utilization_rate: report.fund_utilization_rate(),
        is_public: report.is_public,
        is_verified: report.is_verified,
        generated_at: report.generated_at.with_timezone(&offset),
    }
}

fn build_insights(report: &ledger::FinancialReport) -> Vec<Insight> {
    let rate = report.fund_utilization_rate();
    vec![
        Insight {
            kind: "utilization".to_string(),
            value: rate,
            trend: if rate > 100.0 {
                InsightTrend::Negative
            } else if rate > 0.0 {
                InsightTrend::Positive
            } else {
                InsightTrend::Neutral
            },
        },
        Insight {
            kind: "donors".to_string(),
            value: report.total_donors as f64,
            trend: InsightTrend::Neutral,
        },
        // Always present: the zero-fee policy is a constant, not a metric.
        Insight {
            kind: "transparency".to_string(),
            value: policy::DONATION_EFFICIENCY,
            trend: InsightTrend::Positive,
        },
    ]
}

pub async fn generate(
    State(state): State<ServerState>,
    Json(payload): Json<GenerateReport>,
) -> Result<(StatusCode, Json<Envelope<ReportView>>), ServerError> {
    let mut cmd = ReportCmd::new(
        payload.period_start.with_timezone(&Utc),
        payload.period_end.with_timezone(&Utc),
        Utc::now(),
    );
    if let Some(campaign_id) = payload.campaign_id {
        cmd = cmd.campaign_id(campaign_id);
    }
    if !payload.is_public.unwrap_or(true) {
        cmd = cmd.internal();
    }

    let report = state.ledger.generate_report(cmd).await?;
    let offset = utc_offset()?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(map_report(&report, offset))),
    ))
}

pub async fn get_detail(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<ReportDetail>>, ServerError> {
    let report = state.ledger.report(id).await?;
    let offset = utc_offset()?;
    let insights = build_insights(&report);

    Ok(Json(Envelope::new(ReportDetail {
        report: map_report(&report, offset),
        insights,
    })))
}

pub async fn transparency(
    State(state): State<ServerState>,
) -> Result<Json<Envelope<TransparencyData>>, ServerError> {
    let view = state
        .ledger
        .transparency_view(Utc::now(), RECENT_TRANSACTIONS_LIMIT)
        .await?;
    let fund_utilization = state.ledger.current_fund_utilization(None).await?;
    let offset = utc_offset()?;

    let latest_reports = view
        .latest_reports
        .iter()
        .map(|report| map_report(report, offset))
        .collect();
    let recent_transactions = view
        .recent_transactions
        .into_iter()
        .map(|tx| transactions::map_transaction(tx, offset))
        .collect();

    Ok(Json(Envelope::new(TransparencyData {
        latest_reports,
        recent_transactions,
        platform_totals: PlatformTotals {
            year_to_date: YearToDate {
                total_donations: view.year_to_date.total_donations,
                total_disbursements: view.year_to_date.total_disbursements,
                available_funds: view.year_to_date.available_funds,
                utilization_rate: view.year_to_date.utilization_rate,
            },
            transparency_metrics: TransparencyMetrics {
                platform_fee_rate: policy::PLATFORM_FEE_RATE,
                processing_fee_rate: policy::PROCESSING_FEE_RATE,
                donation_efficiency: policy::DONATION_EFFICIENCY,
            },
        },
        fund_utilization,
        transparency_note: TRANSPARENCY_NOTE.to_string(),
    })))
}

pub async fn monthly_trend(
    State(state): State<ServerState>,
    Query(params): Query<TrendQuery>,
) -> Result<Json<Envelope<Vec<MonthlyTrendPoint>>>, ServerError> {
    let months = params.months.unwrap_or(TREND_DEFAULT_MONTHS);
    let series = state.ledger.monthly_trend(months, Utc::now()).await?;

    let points = series
        .into_iter()
        .map(|totals| MonthlyTrendPoint {
            month: totals.month,
            total_income: totals.total_income,
            total_expenses: totals.total_expenses,
            net_balance: totals.net_balance,
        })
        .collect();

    Ok(Json(Envelope::new(points)))
}

pub async fn campaign_breakdown(
    State(state): State<ServerState>,
) -> Result<Json<Envelope<Vec<CampaignBreakdownRow>>>, ServerError> {
    let rows = state.ledger.campaign_breakdown().await?;

    let rows = rows
        .into_iter()
        .map(|row| CampaignBreakdownRow {
            campaign_id: row.campaign_id,
            title: row.title,
            status: campaigns::map_status(row.status),
            target_amount: row.target_amount,
            current_amount: row.current_amount,
            total_income: row.total_income,
            total_expenses: row.total_expenses,
            utilization_rate: row.utilization_rate,
        })
        .collect();

    Ok(Json(Envelope::new(rows)))
}
