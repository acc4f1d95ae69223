//! Health statistics over a student's records.
//!
//! Everything here is a pure reduction and never fails: empty or degenerate
//! input produces zeroed figures and [`BmiCategory::NoData`].

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::health_records::HealthRecordService;
use crate::{
    db::RowStore,
    error::DataAccessError,
    models::health_record::{HealthRecord, Timeframe},
};

/// Child BMI bands as shown on the statistics page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BmiCategory {
    Kurus,
    Normal,
    Gemuk,
    Obesitas,
    NoData,
}

impl BmiCategory {
    /// Lower bounds are inclusive: 18.5 is Normal, 25 is Gemuk, 30 is Obesitas.
    pub fn classify(bmi: f64) -> Self {
        if !bmi.is_finite() {
            BmiCategory::NoData
        } else if bmi < 18.5 {
            BmiCategory::Kurus
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Gemuk
        } else {
            BmiCategory::Obesitas
        }
    }

    /// Category of a measurement pair; `NoData` without a positive height.
    pub fn of(berat_kg: f64, tinggi_cm: f64) -> Self {
        if tinggi_cm > 0.0 {
            BmiCategory::classify(bmi(berat_kg, tinggi_cm))
        } else {
            BmiCategory::NoData
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Kurus => "Kurus",
            BmiCategory::Normal => "Normal",
            BmiCategory::Gemuk => "Gemuk",
            BmiCategory::Obesitas => "Obesitas",
            BmiCategory::NoData => "Tidak Ada Data",
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// weight (kg) / height (m)²; zero when the height is not positive.
pub fn bmi(berat_kg: f64, tinggi_cm: f64) -> f64 {
    if tinggi_cm <= 0.0 || !tinggi_cm.is_finite() {
        return 0.0;
    }
    let meters = tinggi_cm / 100.0;
    berat_kg / (meters * meters)
}

/// One-decimal rounding for display only.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSummary {
    pub record_count: usize,
    pub avg_suhu: f64,
    pub avg_berat: f64,
    pub avg_tinggi: f64,
    /// Latest minus earliest weight, zero with fewer than two records.
    pub growth_berat: f64,
    pub growth_tinggi: f64,
    /// From the chronologically latest record.
    pub bmi: f64,
    pub bmi_category: BmiCategory,
}

impl HealthSummary {
    pub fn empty() -> Self {
        Self {
            record_count: 0,
            avg_suhu: 0.0,
            avg_berat: 0.0,
            avg_tinggi: 0.0,
            growth_berat: 0.0,
            growth_tinggi: 0.0,
            bmi: 0.0,
            bmi_category: BmiCategory::NoData,
        }
    }
}

fn sorted_chronologically(records: &[HealthRecord]) -> Vec<&HealthRecord> {
    let mut sorted: Vec<&HealthRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.chronology());
    sorted
}

/// Summarize one student's records. Input order does not matter: records
/// are sorted by record date (then insertion time) before first and last
/// are taken.
pub fn summarize(records: &[HealthRecord]) -> HealthSummary {
    let sorted = sorted_chronologically(records);
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return HealthSummary::empty();
    };

    let n = sorted.len() as f64;
    let mean = |f: fn(&HealthRecord) -> f64| sorted.iter().map(|r| f(r)).sum::<f64>() / n;

    let (growth_berat, growth_tinggi) = if sorted.len() > 1 {
        (last.berat_badan - first.berat_badan, last.tinggi_badan - first.tinggi_badan)
    } else {
        (0.0, 0.0)
    };

    let latest_bmi = bmi(last.berat_badan, last.tinggi_badan);
    let bmi_category = BmiCategory::of(last.berat_badan, last.tinggi_badan);

    HealthSummary {
        record_count: sorted.len(),
        avg_suhu: mean(|r| r.suhu_tubuh),
        avg_berat: mean(|r| r.berat_badan),
        avg_tinggi: mean(|r| r.tinggi_badan),
        growth_berat,
        growth_tinggi,
        bmi: latest_bmi,
        bmi_category,
    }
}

/// One point of the temperature/weight/height charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub tanggal: NaiveDate,
    pub suhu: f64,
    pub berat: f64,
    pub tinggi: f64,
}

pub fn chart_points(records: &[HealthRecord]) -> Vec<ChartPoint> {
    sorted_chronologically(records)
        .into_iter()
        .map(|r| ChartPoint {
            tanggal: r.tanggal,
            suhu: r.suhu_tubuh,
            berat: r.berat_badan,
            tinggi: r.tinggi_badan,
        })
        .collect()
}

/// Exact counts per key; percentages are derived for display only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown<K: Ord> {
    pub total: usize,
    pub counts: BTreeMap<K, usize>,
}

impl<K: Ord> Breakdown<K> {
    pub fn count(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn percentage(&self, key: &K) -> u32 {
        percentage(self.count(key), self.total)
    }
}

impl<K: Ord> FromIterator<K> for Breakdown<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        let mut total = 0;
        for key in iter {
            *counts.entry(key).or_insert(0) += 1;
            total += 1;
        }
        Self { total, counts }
    }
}

/// count / total × 100 rounded to the nearest integer; zero for an empty total.
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

pub struct StatisticsService;

impl StatisticsService {
    pub async fn for_student(
        store: &dyn RowStore,
        siswa_id: Uuid,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Result<(HealthSummary, Vec<ChartPoint>), DataAccessError> {
        let records =
            HealthRecordService::list_for_student(store, siswa_id, timeframe, now, true).await?;
        Ok((summarize(&records), chart_points(&records)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::health_record::HealthStatus;
    use chrono::TimeZone;

    fn record(day: u32, suhu: f64, berat: f64, tinggi: f64) -> HealthRecord {
        HealthRecord {
            id: Uuid::new_v4(),
            siswa_id: Uuid::nil(),
            suhu_tubuh: suhu,
            berat_badan: berat,
            tinggi_badan: tinggi,
            status: HealthStatus::Sehat,
            keluhan: None,
            tanggal: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
            created_at: Utc.with_ymd_and_hms(2026, 10, day, 7, 0, 0).unwrap(),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_input_is_no_data() {
        let summary = summarize(&[]);
        assert_eq!(summary, HealthSummary::empty());
        assert_eq!(summary.bmi_category.label(), "Tidak Ada Data");
    }

    #[test]
    fn test_single_record() {
        let summary = summarize(&[record(1, 36.5, 30.0, 130.0)]);
        assert_eq!(summary.record_count, 1);
        assert_eq!(summary.avg_suhu, 36.5);
        assert_eq!(summary.growth_berat, 0.0);
        assert_eq!(summary.growth_tinggi, 0.0);
        assert!(close(summary.bmi, 30.0 / (1.3 * 1.3)));
        assert_eq!(summary.bmi_category, BmiCategory::Kurus);
        assert_eq!(round1(summary.bmi), 17.8);
    }

    #[test]
    fn test_means_and_growth_ignore_input_order() {
        let ascending = vec![
            record(1, 36.0, 30.0, 130.0),
            record(8, 37.0, 31.0, 131.0),
            record(15, 38.0, 32.5, 132.5),
        ];
        let mut shuffled = ascending.clone();
        shuffled.swap(0, 2);

        for input in [&ascending, &shuffled] {
            let s = summarize(input);
            assert!(close(s.avg_suhu, 37.0));
            assert!(close(s.avg_berat, 31.166666666666668));
            assert!(close(s.growth_berat, 2.5));
            assert!(close(s.growth_tinggi, 2.5));
            assert!(close(s.bmi, bmi(32.5, 132.5)));
        }
    }

    #[test]
    fn test_same_day_records_use_insertion_time() {
        let mut morning = record(5, 36.5, 30.0, 130.0);
        let mut afternoon = record(5, 36.8, 30.4, 130.0);
        morning.created_at = Utc.with_ymd_and_hms(2026, 10, 5, 7, 0, 0).unwrap();
        afternoon.created_at = Utc.with_ymd_and_hms(2026, 10, 5, 13, 0, 0).unwrap();

        let s = summarize(&[afternoon, morning]);
        assert!(close(s.growth_berat, 0.4));
    }

    #[test]
    fn test_bmi_category_boundaries() {
        let cases = [
            (18.49, BmiCategory::Kurus),
            (18.5, BmiCategory::Normal),
            (24.99, BmiCategory::Normal),
            (25.0, BmiCategory::Gemuk),
            (29.99, BmiCategory::Gemuk),
            (30.0, BmiCategory::Obesitas),
        ];
        for (value, expected) in cases {
            assert_eq!(BmiCategory::classify(value), expected, "bmi {value}");
        }
        assert_eq!(BmiCategory::classify(f64::NAN), BmiCategory::NoData);
    }

    #[test]
    fn test_category_of_measurements() {
        assert_eq!(BmiCategory::of(30.0, 130.0), BmiCategory::Kurus);
        assert_eq!(BmiCategory::of(45.0, 130.0), BmiCategory::Gemuk);
        assert_eq!(BmiCategory::of(30.0, 0.0), BmiCategory::NoData);
        assert_eq!(BmiCategory::of(30.0, -120.0), BmiCategory::NoData);
    }

    #[test]
    fn test_zero_height_degrades_to_no_data() {
        let s = summarize(&[record(1, 36.5, 30.0, 0.0)]);
        assert_eq!(s.bmi, 0.0);
        assert_eq!(s.bmi_category, BmiCategory::NoData);
        assert_eq!(s.avg_berat, 30.0);
    }

    #[test]
    fn test_chart_points_ascending() {
        let points = chart_points(&[record(9, 36.6, 30.2, 130.0), record(2, 36.4, 30.0, 130.0)]);
        let days: Vec<_> = points.iter().map(|p| p.tanggal.format("%d").to_string()).collect();
        assert_eq!(days, ["02", "09"]);
    }

    #[test]
    fn test_breakdown_counts_and_percentages() {
        use HealthStatus::*;
        let breakdown: Breakdown<HealthStatus> = [Sehat, Sehat, Sakit, Sehat, Sehat, Sehat, Sakit]
            .into_iter()
            .collect();
        assert_eq!(breakdown.total, 7);
        assert_eq!(breakdown.count(&Sehat), 5);
        assert_eq!(breakdown.count(&Danger), 0);
        assert_eq!(breakdown.percentage(&Sehat), 71);
        assert_eq!(breakdown.percentage(&Sakit), 29);

        let empty: Breakdown<HealthStatus> = std::iter::empty().collect();
        assert_eq!(empty.percentage(&Sehat), 0);
    }
}
