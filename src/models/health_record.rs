use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{optional_text, required_text};
use crate::error::ValidationError;

/// Daily wellness flag. Most classes use `sehat`/`sakit`; the report view
/// also records the three-level `normal`/`warning`/`danger` scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Sehat,
    Sakit,
    Normal,
    Warning,
    Danger,
}

impl HealthStatus {
    pub fn is_unwell(self) -> bool {
        matches!(self, HealthStatus::Sakit | HealthStatus::Warning | HealthStatus::Danger)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Sehat => "sehat",
            HealthStatus::Sakit => "sakit",
            HealthStatus::Normal => "normal",
            HealthStatus::Warning => "warning",
            HealthStatus::Danger => "danger",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HealthStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sehat" => Ok(HealthStatus::Sehat),
            "sakit" => Ok(HealthStatus::Sakit),
            "normal" => Ok(HealthStatus::Normal),
            "warning" => Ok(HealthStatus::Warning),
            "danger" => Ok(HealthStatus::Danger),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}

/// Row of the `kesehatan_harian` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthRecord {
    pub id: Uuid,
    pub siswa_id: Uuid,
    /// Body temperature in °C.
    pub suhu_tubuh: f64,
    /// Weight in kg.
    pub berat_badan: f64,
    /// Height in cm.
    pub tinggi_badan: f64,
    pub status: HealthStatus,
    pub keluhan: Option<String>,
    pub tanggal: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl HealthRecord {
    /// Chronological key: record date first, insertion time as tie-break.
    pub fn chronology(&self) -> (NaiveDate, DateTime<Utc>) {
        (self.tanggal, self.created_at)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthRecordFields {
    pub suhu_tubuh: f64,
    pub berat_badan: f64,
    pub tinggi_badan: f64,
    pub status: HealthStatus,
    pub keluhan: Option<String>,
    pub tanggal: NaiveDate,
}

/// Daily health form as entered by the student.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HealthRecordForm {
    pub suhu_tubuh: String,
    pub berat_badan: String,
    pub tinggi_badan: String,
    pub kondisi: String,
    pub keluhan: String,
    /// Blank means today.
    pub tanggal: String,
}

fn measurement(field: &'static str, input: &str) -> Result<f64, ValidationError> {
    let raw = required_text(field, input)?;
    // Indonesian keyboards often produce a decimal comma.
    let value: f64 = raw
        .replace(',', ".")
        .parse()
        .map_err(|_| ValidationError::InvalidMeasurement { field, value: raw.clone() })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidMeasurement { field, value: raw });
    }
    Ok(value)
}

impl HealthRecordForm {
    pub fn validate(&self, today: NaiveDate) -> Result<HealthRecordFields, ValidationError> {
        let suhu_tubuh = measurement("suhu_tubuh", &self.suhu_tubuh)?;
        let berat_badan = measurement("berat_badan", &self.berat_badan)?;
        let tinggi_badan = measurement("tinggi_badan", &self.tinggi_badan)?;
        let status = optional_text(&self.kondisi)
            .map(|k| k.parse::<HealthStatus>())
            .transpose()?
            .unwrap_or(HealthStatus::Sehat);

        let keluhan = if status.is_unwell() {
            Some(optional_text(&self.keluhan).ok_or(ValidationError::ComplaintRequired)?)
        } else {
            None
        };

        let tanggal = match optional_text(&self.tanggal) {
            None => today,
            Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                .map_err(|_| ValidationError::InvalidDate { field: "tanggal", value: d.clone() })?,
        };

        Ok(HealthRecordFields {
            suhu_tubuh,
            berat_badan,
            tinggi_badan,
            status,
            keluhan,
            tanggal,
        })
    }
}

/// History window offered by the statistics and history views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    #[serde(alias = "seminggu")]
    Minggu,
    #[default]
    #[serde(alias = "sebulan")]
    Bulan,
    Semester,
    Tahun,
    Semua,
}

impl Timeframe {
    /// First record date inside the window ending at `now`; `None` for all history.
    pub fn start(self, now: DateTime<Utc>) -> Option<NaiveDate> {
        let start = match self {
            Timeframe::Minggu => now.checked_sub_signed(Duration::days(7)),
            Timeframe::Bulan => now.checked_sub_months(Months::new(1)),
            Timeframe::Semester => now.checked_sub_months(Months::new(6)),
            Timeframe::Tahun => now.checked_sub_months(Months::new(12)),
            Timeframe::Semua => None,
        };
        start.map(|s| s.date_naive())
    }
}

impl std::str::FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minggu" | "seminggu" => Ok(Timeframe::Minggu),
            "bulan" | "sebulan" => Ok(Timeframe::Bulan),
            "semester" => Ok(Timeframe::Semester),
            "tahun" => Ok(Timeframe::Tahun),
            "semua" => Ok(Timeframe::Semua),
            _ => Err(anyhow::anyhow!("Unknown timeframe: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn healthy_form() -> HealthRecordForm {
        HealthRecordForm {
            suhu_tubuh: "36.5".into(),
            berat_badan: "30".into(),
            tinggi_badan: "130".into(),
            kondisi: "sehat".into(),
            keluhan: "pusing sedikit".into(),
            tanggal: String::new(),
        }
    }

    #[test]
    fn test_healthy_form_drops_complaint_and_defaults_date() {
        let fields = healthy_form().validate(today()).unwrap();
        assert_eq!(fields.suhu_tubuh, 36.5);
        assert_eq!(fields.status, HealthStatus::Sehat);
        assert_eq!(fields.keluhan, None);
        assert_eq!(fields.tanggal, today());
    }

    #[test]
    fn test_unwell_requires_complaint() {
        let mut form = healthy_form();
        form.kondisi = "sakit".into();
        form.keluhan = "  ".into();
        assert_eq!(form.validate(today()), Err(ValidationError::ComplaintRequired));

        form.keluhan = "Demam sejak pagi".into();
        let fields = form.validate(today()).unwrap();
        assert_eq!(fields.keluhan.as_deref(), Some("Demam sejak pagi"));
    }

    #[test]
    fn test_three_level_scale() {
        let mut form = healthy_form();
        form.kondisi = "danger".into();
        form.keluhan = "Suhu tinggi".into();
        assert_eq!(form.validate(today()).unwrap().status, HealthStatus::Danger);
        assert!(HealthStatus::Warning.is_unwell());
        assert!(!HealthStatus::Normal.is_unwell());
    }

    #[test]
    fn test_measurements_must_be_positive_numbers() {
        let mut form = healthy_form();
        form.suhu_tubuh = String::new();
        assert_eq!(form.validate(today()), Err(ValidationError::MissingField("suhu_tubuh")));

        let mut form = healthy_form();
        form.berat_badan = "tiga puluh".into();
        assert!(matches!(
            form.validate(today()),
            Err(ValidationError::InvalidMeasurement { field: "berat_badan", .. })
        ));

        let mut form = healthy_form();
        form.tinggi_badan = "-5".into();
        assert!(matches!(
            form.validate(today()),
            Err(ValidationError::InvalidMeasurement { field: "tinggi_badan", .. })
        ));
    }

    #[test]
    fn test_decimal_comma_accepted() {
        let mut form = healthy_form();
        form.suhu_tubuh = "37,2".into();
        assert_eq!(form.validate(today()).unwrap().suhu_tubuh, 37.2);
    }

    #[test]
    fn test_timeframe_start() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day);
        assert_eq!(Timeframe::Minggu.start(now), d(2026, 10, 12));
        assert_eq!(Timeframe::Bulan.start(now), d(2026, 9, 19));
        assert_eq!(Timeframe::Semester.start(now), d(2026, 4, 19));
        assert_eq!(Timeframe::Tahun.start(now), d(2025, 10, 19));
        assert_eq!(Timeframe::Semua.start(now), None);
        assert_eq!("sebulan".parse::<Timeframe>().unwrap(), Timeframe::Bulan);
    }
}
