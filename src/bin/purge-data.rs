/// Purge expired health records based on retention policy
/// Run daily (e.g., via cron job: 0 2 * * * /app/purge-data)
///
/// Usage: purge-data [--days N] [--dry-run]
///   --days N    : Override DATA_RETENTION_DAYS and the stored retention
///   --dry-run   : Only report the cutoff date

use chrono::Utc;
use clap::Parser;

use pedulikecil_api::{
    config::Config,
    db::{self, PgStore},
    services::{
        health_records::HealthRecordService,
        settings::{self, SettingsService},
    },
};

#[derive(Parser)]
#[command(name = "purge-data", about = "Purge expired health records from the database")]
struct Args {
    /// Retention in days (defaults to DATA_RETENTION_DAYS, then the stored settings)
    #[arg(long)]
    days: Option<i64>,

    /// Print the cutoff without deleting anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    let store = PgStore::new(pool);

    let stored = SettingsService::load(&store).await?;
    let retention = settings::resolve_retention(args.days, config.data_retention_days, &stored);
    if retention <= 0 {
        anyhow::bail!("Retention must be a positive number of days, got {retention}");
    }
    let Some(cutoff) = settings::retention_cutoff(Utc::now().date_naive(), retention) else {
        anyhow::bail!("Retention of {retention} days reaches before the earliest supported date");
    };

    if args.dry_run {
        tracing::info!("Dry run: records dated before {cutoff} would be purged");
        return Ok(());
    }

    tracing::info!("Starting health record purge (retention {retention} days)...");
    let purged = HealthRecordService::purge_before(&store, cutoff).await?;
    tracing::info!("Data purge job completed: {purged} records removed");

    Ok(())
}
