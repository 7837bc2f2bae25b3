use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use ledger::{DisbursementCmd, Ledger, RefundCmd, ReportCmd};
use migration::MigratorTrait;
use sea_orm::Database;

#[derive(Parser, Debug)]
#[command(name = "peduli_admin")]
#[command(about = "Admin utilities for Peduli (campaigns, disbursements, reports)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./peduli.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Campaign(Campaign),
    Disbursement(Disbursement),
    Refund(Refund),
    Report(Report),
}

#[derive(Args, Debug)]
struct Campaign {
    #[command(subcommand)]
    command: CampaignCommand,
}

#[derive(Subcommand, Debug)]
enum CampaignCommand {
    Create(CampaignCreateArgs),
    Activate(CampaignIdArgs),
    /// Rebuild the campaign total from completed donations.
    Recompute(CampaignIdArgs),
}

#[derive(Args, Debug)]
struct CampaignCreateArgs {
    #[arg(long)]
    title: String,
    /// Target in whole currency units.
    #[arg(long)]
    target_amount: i64,
}

#[derive(Args, Debug)]
struct CampaignIdArgs {
    #[arg(long)]
    id: Uuid,
}

#[derive(Args, Debug)]
struct Disbursement {
    #[command(subcommand)]
    command: DisbursementCommand,
}

#[derive(Subcommand, Debug)]
enum DisbursementCommand {
    Record(DisbursementRecordArgs),
}

#[derive(Args, Debug)]
struct DisbursementRecordArgs {
    #[arg(long)]
    campaign_id: Uuid,
    #[arg(long)]
    amount: i64,
    #[arg(long)]
    sub_category: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Idempotency handle; repeating a batch id is a no-op.
    #[arg(long)]
    batch_id: Option<Uuid>,
}

#[derive(Args, Debug)]
struct Refund {
    #[command(subcommand)]
    command: RefundCommand,
}

#[derive(Subcommand, Debug)]
enum RefundCommand {
    Record(RefundRecordArgs),
}

#[derive(Args, Debug)]
struct RefundRecordArgs {
    #[arg(long)]
    donation_id: Uuid,
    #[arg(long)]
    sub_category: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct Report {
    #[command(subcommand)]
    command: ReportCommand,
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    Generate(ReportGenerateArgs),
}

#[derive(Args, Debug)]
struct ReportGenerateArgs {
    /// Period start (RFC 3339, inclusive).
    #[arg(long)]
    from: DateTime<Utc>,
    /// Period end (RFC 3339, exclusive).
    #[arg(long)]
    to: DateTime<Utc>,
    #[arg(long)]
    campaign_id: Option<Uuid>,
    /// Keep the report out of public projections.
    #[arg(long)]
    internal: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = Database::connect(&cli.database_url).await?;
    migration::Migrator::up(&db, None).await?;
    let ledger = Ledger::builder().database(db).build().await?;

    match cli.command {
        Command::Campaign(campaign) => match campaign.command {
            CampaignCommand::Create(args) => {
                let campaign = ledger
                    .create_campaign(&args.title, args.target_amount, Utc::now())
                    .await?;
                println!("created campaign {}", campaign.id);
            }
            CampaignCommand::Activate(args) => {
                let campaign = ledger.activate_campaign(args.id).await?;
                println!("campaign {} is {}", campaign.id, campaign.status.as_str());
            }
            CampaignCommand::Recompute(args) => {
                let campaign = ledger.recompute_campaign_totals(args.id).await?;
                println!(
                    "campaign {} total recomputed: {} / {}",
                    campaign.id, campaign.current_amount, campaign.target_amount
                );
            }
        },
        Command::Disbursement(disbursement) => match disbursement.command {
            DisbursementCommand::Record(args) => {
                let mut cmd = DisbursementCmd::new(args.campaign_id, args.amount, Utc::now());
                if let Some(sub_category) = args.sub_category {
                    cmd = cmd.sub_category(sub_category);
                }
                if let Some(description) = args.description {
                    cmd = cmd.description(description);
                }
                if let Some(batch_id) = args.batch_id {
                    cmd = cmd.batch_id(batch_id);
                }
                let tx = ledger.record_disbursement(cmd).await?;
                println!("recorded disbursement {}", tx.id);
            }
        },
        Command::Refund(refund) => match refund.command {
            RefundCommand::Record(args) => {
                let mut cmd = RefundCmd::new(args.donation_id, Utc::now());
                if let Some(sub_category) = args.sub_category {
                    cmd = cmd.sub_category(sub_category);
                }
                if let Some(description) = args.description {
                    cmd = cmd.description(description);
                }
                let tx = ledger.record_refund(cmd).await?;
                println!("recorded refund {}", tx.id);
            }
        },
        Command::Report(report) => match report.command {
            ReportCommand::Generate(args) => {
                let mut cmd = ReportCmd::new(args.from, args.to, Utc::now());
                if let Some(campaign_id) = args.campaign_id {
                    cmd = cmd.campaign_id(campaign_id);
                }
                if args.internal {
                    cmd = cmd.internal();
                }
                let report = ledger.generate_report(cmd).await?;
                println!(
                    "generated report {}: income {}, expenses {}, net {}, donors {}",
                    report.id,
                    report.total_income,
                    report.total_expenses,
                    report.net_balance,
                    report.total_donors
                );
            }
        },
    }

    Ok(())
}
