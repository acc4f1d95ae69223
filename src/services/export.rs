//! CSV export of a student's health history.

use std::io::Write;

use serde::Serialize;

use super::statistics::{self, BmiCategory};
use crate::models::health_record::HealthRecord;

#[derive(Debug, Serialize)]
struct HistoryRow<'a> {
    tanggal: String,
    suhu_tubuh: f64,
    berat_badan: f64,
    tinggi_badan: f64,
    imt: f64,
    kategori_imt: &'static str,
    status: &'static str,
    keluhan: &'a str,
}

impl<'a> From<&'a HealthRecord> for HistoryRow<'a> {
    fn from(record: &'a HealthRecord) -> Self {
        let imt = statistics::bmi(record.berat_badan, record.tinggi_badan);
        let kategori = BmiCategory::of(record.berat_badan, record.tinggi_badan);
        Self {
            tanggal: record.tanggal.format("%Y-%m-%d").to_string(),
            suhu_tubuh: record.suhu_tubuh,
            berat_badan: record.berat_badan,
            tinggi_badan: record.tinggi_badan,
            imt: statistics::round1(imt),
            kategori_imt: kategori.label(),
            status: record.status.as_str(),
            keluhan: record.keluhan.as_deref().unwrap_or(""),
        }
    }
}

/// Write `records` oldest first, one row each, with a header row.
/// Returns the number of data rows written.
pub fn write_history<W: Write>(writer: W, records: &[HealthRecord]) -> Result<usize, csv::Error> {
    let mut sorted: Vec<&HealthRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.chronology());

    let mut csv = csv::Writer::from_writer(writer);
    if sorted.is_empty() {
        csv.write_record([
            "tanggal",
            "suhu_tubuh",
            "berat_badan",
            "tinggi_badan",
            "imt",
            "kategori_imt",
            "status",
            "keluhan",
        ])?;
    }
    for record in &sorted {
        csv.serialize(HistoryRow::from(*record))?;
    }
    csv.flush()?;
    Ok(sorted.len())
}
