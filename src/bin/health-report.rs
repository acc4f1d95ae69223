//! Print health reports from the command line.
//!
//! Usage:
//!   health-report student <SISWA_ID> [--timeframe bulan]
//!   health-report export <SISWA_ID> [--timeframe semua] [--out history.csv]
//!   health-report class <KELAS> [--timeframe minggu]

use std::{fs::File, io, path::PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use pedulikecil_api::{
    config::Config,
    db::{self, PgStore},
    models::{class::ClassCode, health_record::Timeframe},
    services::{
        export, health_records::HealthRecordService, reports::ReportService,
        settings::SettingsService,
        statistics::{self, BmiCategory, StatisticsService},
        students::StudentService,
    },
};

#[derive(Parser)]
#[command(name = "health-report", about = "Student and class health reports")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Statistics summary of one student
    Student {
        siswa_id: Uuid,
        #[arg(long, default_value = "bulan")]
        timeframe: Timeframe,
    },
    /// Write one student's health history as CSV
    Export {
        siswa_id: Uuid,
        #[arg(long, default_value = "semua")]
        timeframe: Timeframe,
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Latest-status overview of a class
    Class {
        kelas: ClassCode,
        #[arg(long, default_value = "minggu")]
        timeframe: Timeframe,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    let store = PgStore::new(pool);
    let school_name = match config.school_name {
        Some(name) => name,
        None => SettingsService::load(&store).await?.school_name,
    };
    let now = Utc::now();

    match args.command {
        Command::Student { siswa_id, timeframe } => {
            let student = StudentService::get(&store, siswa_id)
                .await?
                .with_context(|| format!("Student {siswa_id} not found"))?;
            let (summary, points) =
                StatisticsService::for_student(&store, siswa_id, timeframe, now).await?;

            println!("{} ({}) - {}", student.nama, student.kelas, school_name);
            println!("Records:          {}", summary.record_count);
            if summary.bmi_category == BmiCategory::NoData {
                println!("BMI:              {}", summary.bmi_category);
                return Ok(());
            }
            println!("Avg temperature:  {:.1} °C", summary.avg_suhu);
            println!("Avg weight:       {:.1} kg", summary.avg_berat);
            println!("Avg height:       {:.1} cm", summary.avg_tinggi);
            println!("Weight growth:    {:+.1} kg", summary.growth_berat);
            println!("Height growth:    {:+.1} cm", summary.growth_tinggi);
            println!(
                "BMI:              {} ({})",
                statistics::round1(summary.bmi),
                summary.bmi_category
            );
            for point in points {
                println!("  {}  {:>4.1} °C  {:>5.1} kg  {:>5.1} cm", point.tanggal, point.suhu, point.berat, point.tinggi);
            }
        }
        Command::Export { siswa_id, timeframe, out } => {
            let records =
                HealthRecordService::list_for_student(&store, siswa_id, timeframe, now, true).await?;
            let written = match out {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    export::write_history(file, &records)?
                }
                None => export::write_history(io::stdout().lock(), &records)?,
            };
            tracing::info!("Exported {written} records for {siswa_id}");
        }
        Command::Class { kelas, timeframe } => {
            let overview = ReportService::class_overview(&store, kelas, timeframe, now).await?;
            println!("Class {} - {}", overview.kelas, school_name);
            println!("Students:           {}", overview.total_students);
            println!("Healthy:            {} ({}%)", overview.healthy, overview.healthy_percentage());
            println!("Unwell:             {} ({}%)", overview.unwell, overview.unwell_percentage());
            println!("No data:            {} ({}%)", overview.no_data, overview.no_data_percentage());
            println!("Pending complaints: {}", overview.pending_complaints);
            for (category, count) in &overview.bmi.counts {
                println!("  {:<16} {} ({}%)", category.label(), count, overview.bmi.percentage(category));
            }
        }
    }

    Ok(())
}
