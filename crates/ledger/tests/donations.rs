use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use ledger::{
    CampaignStatus, DisbursementCmd, DonationCmd, Ledger, LedgerError, RefundCmd,
    TransactionCategory, TransactionKind, TransactionStatus,
};
use migration::MigratorTrait;

async fn ledger_with_db() -> (Ledger, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let ledger = Ledger::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (ledger, db)
}

async fn active_campaign(ledger: &Ledger, target_amount: i64) -> Uuid {
    let campaign = ledger
        .create_campaign("Clean water for Lombok", target_amount, Utc::now())
        .await
        .unwrap();
    ledger.activate_campaign(campaign.id).await.unwrap();
    campaign.id
}

async fn pending_donation(
    ledger: &Ledger,
    campaign_id: Uuid,
    amount: i64,
    user_id: &str,
) -> Uuid {
    let donation = ledger
        .create_donation(DonationCmd::new(campaign_id, amount, Utc::now()).user_id(user_id))
        .await
        .unwrap();
    donation.id
}

async fn transaction_count(db: &DatabaseConnection) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT COUNT(*) AS cnt FROM financial_transactions".to_owned(),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "cnt").unwrap()
}

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

#[tokio::test]
async fn completion_records_face_value_and_updates_campaign() {
    let (ledger, _db) = ledger_with_db().await;
    let campaign_id = active_campaign(&ledger, 1_000_000).await;
    let donation_id = pending_donation(&ledger, campaign_id, 100_000, "alice").await;

    let tx = ledger
        .complete_donation(donation_id, Utc::now())
        .await
        .unwrap();

    // No fee: the ledger entry carries the donor-submitted amount exactly.
    assert_eq!(tx.amount, 100_000);
    assert_eq!(tx.kind, TransactionKind::Income);
    assert_eq!(tx.category, TransactionCategory::Donation);
    assert_eq!(tx.status, TransactionStatus::Completed);
    assert_eq!(tx.campaign_id, Some(campaign_id));

    let campaign = ledger.campaign(campaign_id).await.unwrap();
    assert_eq!(campaign.current_amount, 100_000);
    assert_eq!(campaign.status, CampaignStatus::Active);
}

#[tokio::test]
async fn repeated_completion_is_idempotent() {
    let (ledger, db) = ledger_with_db().await;
    let campaign_id = active_campaign(&ledger, 1_000_000).await;
    let donation_id = pending_donation(&ledger, campaign_id, 50_000, "alice").await;

    let first = ledger
        .complete_donation(donation_id, Utc::now())
        .await
        .unwrap();
    let second = ledger
        .complete_donation(donation_id, Utc::now())
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(transaction_count(&db).await, 1);

    // The campaign total was applied exactly once.
    let campaign = ledger.campaign(campaign_id).await.unwrap();
    assert_eq!(campaign.current_amount, 50_000);
}

#[tokio::test]
async fn standalone_recording_is_idempotent_too() {
    let (ledger, db) = ledger_with_db().await;
    let campaign_id = active_campaign(&ledger, 1_000_000).await;
    let donation_id = pending_donation(&ledger, campaign_id, 75_000, "bob").await;

    let recorded = ledger
        .complete_donation(donation_id, Utc::now())
        .await
        .unwrap();
    let again = ledger
        .record_donation_transaction(donation_id, Utc::now())
        .await
        .unwrap();

    assert_eq!(recorded.id, again.id);
    assert_eq!(transaction_count(&db).await, 1);
}

#[tokio::test]
async fn recording_rejects_pending_donations() {
    let (ledger, _db) = ledger_with_db().await;
    let campaign_id = active_campaign(&ledger, 1_000_000).await;
    let donation_id = pending_donation(&ledger, campaign_id, 10_000, "carol").await;

    let err = ledger
        .record_donation_transaction(donation_id, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidStatus(_)));
}

#[tokio::test]
async fn campaign_completes_at_target_and_stays_completed() {
    let (ledger, _db) = ledger_with_db().await;
    let campaign_id = active_campaign(&ledger, 1_000_000).await;

    let first = pending_donation(&ledger, campaign_id, 450_000, "alice").await;
    ledger.complete_donation(first, Utc::now()).await.unwrap();
    assert_eq!(
        ledger.campaign(campaign_id).await.unwrap().status,
        CampaignStatus::Active
    );

    let second = pending_donation(&ledger, campaign_id, 600_000, "bob").await;
    ledger.complete_donation(second, Utc::now()).await.unwrap();

    let campaign = ledger.campaign(campaign_id).await.unwrap();
    assert_eq!(campaign.current_amount, 1_050_000);
    assert_eq!(campaign.status, CampaignStatus::Completed);

    // Spending the funds never reverts the completion.
    ledger
        .record_disbursement(DisbursementCmd::new(campaign_id, 900_000, Utc::now()))
        .await
        .unwrap();
    ledger.recompute_campaign_totals(campaign_id).await.unwrap();
    assert_eq!(
        ledger.campaign(campaign_id).await.unwrap().status,
        CampaignStatus::Completed
    );
}

#[tokio::test]
async fn donations_require_an_active_campaign() {
    let (ledger, _db) = ledger_with_db().await;
    let campaign = ledger
        .create_campaign("Unreviewed campaign", 500_000, Utc::now())
        .await
        .unwrap();

    let err = ledger
        .create_donation(DonationCmd::new(campaign.id, 10_000, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidStatus(_)));
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let (ledger, _db) = ledger_with_db().await;
    let campaign_id = active_campaign(&ledger, 500_000).await;

    let err = ledger
        .create_donation(DonationCmd::new(campaign_id, 0, Utc::now()))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::InvalidAmount("amount must be > 0".to_string())
    );

    let err = ledger
        .record_disbursement(DisbursementCmd::new(campaign_id, -5, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
}

#[tokio::test]
async fn failed_donations_are_terminal_and_record_nothing() {
    let (ledger, db) = ledger_with_db().await;
    let campaign_id = active_campaign(&ledger, 500_000).await;
    let donation_id = pending_donation(&ledger, campaign_id, 20_000, "dewi").await;

    ledger.fail_donation(donation_id).await.unwrap();
    assert_eq!(transaction_count(&db).await, 0);

    let err = ledger
        .complete_donation(donation_id, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidStatus(_)));

    // Failing again is a no-op, failing a completed donation is not.
    ledger.fail_donation(donation_id).await.unwrap();
    let other = pending_donation(&ledger, campaign_id, 20_000, "eko").await;
    ledger.complete_donation(other, Utc::now()).await.unwrap();
    let err = ledger.fail_donation(other).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidStatus(_)));
}

#[tokio::test]
async fn aggregate_matches_sum_of_completed_donations() {
    let (ledger, _db) = ledger_with_db().await;
    let campaign_id = active_campaign(&ledger, 10_000_000).await;

    let amounts = [100_000, 150_000, 200_000, 40_000];
    for (i, amount) in amounts.iter().enumerate() {
        let donation_id =
            pending_donation(&ledger, campaign_id, *amount, &format!("user{i}")).await;
        ledger
            .complete_donation(donation_id, at(2026, 5, i as u32 + 1))
            .await
            .unwrap();
    }
    // Pending and failed donations do not count.
    pending_donation(&ledger, campaign_id, 999_999, "pending").await;
    let failed = pending_donation(&ledger, campaign_id, 888_888, "failed").await;
    ledger.fail_donation(failed).await.unwrap();

    let expected: i64 = amounts.iter().sum();
    let campaign = ledger.campaign(campaign_id).await.unwrap();
    assert_eq!(campaign.current_amount, expected);

    // Recomputing from the donation table lands on the same total.
    let recomputed = ledger.recompute_campaign_totals(campaign_id).await.unwrap();
    assert_eq!(recomputed.current_amount, expected);
}

#[tokio::test]
async fn refunds_are_expenses_and_leave_the_campaign_total_alone() {
    let (ledger, _db) = ledger_with_db().await;
    let campaign_id = active_campaign(&ledger, 1_000_000).await;
    let donation_id = pending_donation(&ledger, campaign_id, 120_000, "alice").await;
    ledger
        .complete_donation(donation_id, Utc::now())
        .await
        .unwrap();

    let refund = ledger
        .record_refund(RefundCmd::new(donation_id, Utc::now()).description("chargeback"))
        .await
        .unwrap();
    assert_eq!(refund.kind, TransactionKind::Expense);
    assert_eq!(refund.category, TransactionCategory::Refund);
    assert_eq!(refund.amount, 120_000);

    let campaign = ledger.campaign(campaign_id).await.unwrap();
    assert_eq!(campaign.current_amount, 120_000);
}

#[tokio::test]
async fn refunding_twice_returns_the_same_entry() {
    let (ledger, db) = ledger_with_db().await;
    let campaign_id = active_campaign(&ledger, 1_000_000).await;
    let donation_id = pending_donation(&ledger, campaign_id, 60_000, "alice").await;
    ledger
        .complete_donation(donation_id, Utc::now())
        .await
        .unwrap();

    let first = ledger
        .record_refund(RefundCmd::new(donation_id, Utc::now()))
        .await
        .unwrap();
    let second = ledger
        .record_refund(RefundCmd::new(donation_id, Utc::now()))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    // One donation entry plus one refund entry.
    assert_eq!(transaction_count(&db).await, 2);
}

#[tokio::test]
async fn disbursement_batch_id_makes_retries_safe() {
    let (ledger, db) = ledger_with_db().await;
    let campaign_id = active_campaign(&ledger, 1_000_000).await;
    let batch_id = Uuid::new_v4();

    let first = ledger
        .record_disbursement(
            DisbursementCmd::new(campaign_id, 300_000, Utc::now())
                .sub_category("logistics")
                .batch_id(batch_id),
        )
        .await
        .unwrap();
    let second = ledger
        .record_disbursement(
            DisbursementCmd::new(campaign_id, 300_000, Utc::now()).batch_id(batch_id),
        )
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(transaction_count(&db).await, 1);
}

#[tokio::test]
async fn disbursement_requires_an_existing_campaign() {
    let (ledger, _db) = ledger_with_db().await;

    let err = ledger
        .record_disbursement(DisbursementCmd::new(Uuid::new_v4(), 10_000, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::KeyNotFound(_)));
}

#[tokio::test]
async fn status_correction_is_the_only_mutation() {
    let (ledger, _db) = ledger_with_db().await;
    let campaign_id = active_campaign(&ledger, 1_000_000).await;
    let donation_id = pending_donation(&ledger, campaign_id, 30_000, "alice").await;
    let tx = ledger
        .complete_donation(donation_id, Utc::now())
        .await
        .unwrap();

    let corrected = ledger
        .correct_transaction_status(tx.id, TransactionStatus::Failed)
        .await
        .unwrap();
    assert_eq!(corrected.status, TransactionStatus::Failed);
    // Everything else is untouched.
    assert_eq!(corrected.amount, tx.amount);
    assert_eq!(corrected.category, tx.category);

    // Correcting to the current status is a no-op.
    let unchanged = ledger
        .correct_transaction_status(tx.id, TransactionStatus::Failed)
        .await
        .unwrap();
    assert_eq!(unchanged.status, TransactionStatus::Failed);
}
