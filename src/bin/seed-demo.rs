//! Demo data seed script
//!
//! Seeds a fresh database with a small school:
//! - 12 students spread over classes 4A..6B
//! - 3 teachers, two of them homeroom teachers
//! - 5 educational videos, one per category
//! - Randomized daily health records for the last N school days
//! - A few complaints, one of them already answered
//! - The school settings, unless already saved
//!
//! Usage:
//!   DATABASE_URL=... ./seed-demo [--days 20] [--reset]

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use clap::Parser;
use rand::Rng;
use uuid::Uuid;

use pedulikecil_api::{
    config::Config,
    db::{self, PgStore, RowStore},
    models::{
        class::ClassCode,
        health_record::{HealthRecordFields, HealthStatus},
        student::StudentFields,
        teacher::TeacherFields,
        video::{VideoCategory, VideoFields},
        AccountRef,
    },
    services::{
        complaints::ComplaintService, health_records::HealthRecordService,
        settings::SettingsService, students::StudentService, teachers::TeacherService,
        videos::VideoService,
    },
};

#[derive(Parser)]
#[command(name = "seed-demo", about = "Seed the health database with demo data")]
struct Args {
    /// School days of health records to generate per student
    #[arg(long, default_value_t = 20)]
    days: u32,

    /// Delete existing rows before seeding
    #[arg(long)]
    reset: bool,
}

const STUDENTS: &[(&str, ClassCode, &str)] = &[
    ("Budi Santoso", ClassCode::Kelas6A, "Bapak Santoso"),
    ("Ani Lestari", ClassCode::Kelas6A, "Ibu Lestari"),
    ("Citra Dewi", ClassCode::Kelas6A, "Ibu Dewi"),
    ("Dimas Pratama", ClassCode::Kelas6B, "Bapak Pratama"),
    ("Eka Putri", ClassCode::Kelas6B, "Ibu Putri"),
    ("Fajar Nugroho", ClassCode::Kelas5A, "Bapak Nugroho"),
    ("Gita Ayu", ClassCode::Kelas5A, "Ibu Ayu"),
    ("Hadi Wijaya", ClassCode::Kelas5B, "Bapak Wijaya"),
    ("Indah Sari", ClassCode::Kelas5B, "Ibu Sari"),
    ("Joko Susilo", ClassCode::Kelas4A, "Bapak Susilo"),
    ("Kartika Rahma", ClassCode::Kelas4A, "Ibu Rahma"),
    ("Lukman Hakim", ClassCode::Kelas4B, "Bapak Hakim"),
];

const VIDEOS: &[(&str, &str, VideoCategory, &str)] = &[
    ("Cara Mencuci Tangan", "https://www.youtube.com/watch?v=seA1wbXUQTs", VideoCategory::Kebersihan, "3:12"),
    ("Isi Piringku", "https://youtu.be/E7nVw0Yv1ZI", VideoCategory::Gizi, "5:40"),
    ("Senam Anak Indonesia", "https://www.youtube.com/watch?v=1g7sO8Kn3Xc", VideoCategory::Olahraga, "8:05"),
    ("Mengenal Demam", "https://www.youtube.com/embed/Xo1yLrZ9Q2k", VideoCategory::Kesehatan, "4:20"),
    ("Hidup Sehat Setiap Hari", "https://youtu.be/pQ7mV3n0aRk", VideoCategory::Umum, "6:00"),
];

/// The last `n` weekdays up to and including `today`, oldest first.
fn school_days(today: NaiveDate, n: u32) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut date = today;
    while days.len() < n as usize {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(date);
        }
        date -= Duration::days(1);
    }
    days.reverse();
    days
}

async fn reset(store: &PgStore) -> Result<()> {
    sqlx::raw_sql("DELETE FROM keluhan; DELETE FROM kesehatan_harian; DELETE FROM videos; DELETE FROM guru; DELETE FROM siswa; DELETE FROM settings;")
        .execute(store.pool())
        .await
        .context("Failed to clear existing rows")?;
    println!("  Cleared existing rows");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    db::run_migrations(&pool).await.context("Failed to run migrations")?;
    let store = PgStore::new(pool);

    if args.reset {
        reset(&store).await?;
    }

    let mut settings = SettingsService::load(&store).await?;
    if let Some(name) = &config.school_name {
        settings.school_name = name.clone();
    }
    SettingsService::save(&store, &settings).await?;
    println!("=== Seed Demo: {} ===", settings.school_name);

    // 1. Students
    for (nama, kelas, wali) in STUDENTS {
        let mut fields = StudentFields::new(*nama, *kelas);
        fields.orang_tua_wali = Some(wali.to_string());
        fields.alamat = Some("Jl. Melati No. 12".into());
        StudentService::create(&store, AccountRef(Uuid::new_v4()), &fields).await?;
    }
    println!("  Created {} students", STUDENTS.len());

    // 2. Teachers
    let mut heni = TeacherFields::new("Ibu Heni Kusuma");
    heni.wali_kelas = Some(ClassCode::Kelas6A);
    heni.bidang_studi = Some("Matematika".into());
    let mut dedi = TeacherFields::new("Bapak Dedi Saputra");
    dedi.wali_kelas = Some(ClassCode::Kelas5A);
    dedi.bidang_studi = Some("IPA".into());
    let mut rina = TeacherFields::new("Ibu Rina Marlina");
    rina.bidang_studi = Some("Pendidikan Jasmani".into());
    for fields in [&heni, &dedi, &rina] {
        TeacherService::create(&store, AccountRef(Uuid::new_v4()), fields).await?;
    }
    println!("  Created 3 teachers");

    // 3. Videos
    for (judul, url, kategori, durasi) in VIDEOS {
        let fields = VideoFields {
            judul: judul.to_string(),
            deskripsi: format!("Video edukasi: {judul}"),
            url: url.to_string(),
            thumbnail: None,
            kategori: *kategori,
            durasi: Some(durasi.to_string()),
        };
        VideoService::create(&store, &fields).await?;
    }
    println!("  Created {} videos", VIDEOS.len());

    // 4. Health records
    let students = StudentService::list(&store).await?;
    let days = school_days(Utc::now().date_naive(), args.days);
    let mut rng = rand::thread_rng();
    let mut record_count = 0;
    for student in &students {
        let mut berat: f64 = rng.gen_range(22.0..40.0);
        let mut tinggi: f64 = rng.gen_range(120.0..145.0);
        for tanggal in &days {
            berat += rng.gen_range(-0.1..0.2);
            tinggi += rng.gen_range(0.0..0.1);
            let sick = rng.gen_bool(0.1);
            let fields = HealthRecordFields {
                suhu_tubuh: if sick { rng.gen_range(37.8..39.2) } else { rng.gen_range(36.2..37.1) },
                berat_badan: (berat * 10.0).round() / 10.0,
                tinggi_badan: (tinggi * 10.0).round() / 10.0,
                status: if sick { HealthStatus::Sakit } else { HealthStatus::Sehat },
                keluhan: sick.then(|| "Demam dan pusing".to_string()),
                tanggal: *tanggal,
            };
            HealthRecordService::submit(&store, student.id, &fields).await?;
            record_count += 1;
        }
    }
    println!("  Created {record_count} health records over {} days", days.len());

    // 5. Complaints
    let mut complaint_count = 0;
    for student in students.iter().filter(|s| s.kelas == ClassCode::Kelas6A) {
        ComplaintService::submit(&store, student.id, "Perut terasa sakit setelah jam istirahat")
            .await?;
        complaint_count += 1;
    }
    if let Some(first) = students.iter().find(|s| s.kelas == ClassCode::Kelas6A) {
        if let Some(complaint) = ComplaintService::list_for_student(&store, first.id).await?.first() {
            ComplaintService::respond(&store, complaint.id, "Silakan ke UKS dan minum air hangat")
                .await?;
        }
    }
    println!("  Created {complaint_count} complaints");

    let total = store.select("siswa", &[], &[]).await?.len();
    println!("=== Done: {total} students in database ===");
    Ok(())
}
