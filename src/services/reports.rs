//! Class-level views for homeroom teachers.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::complaints::ComplaintService;
use super::health_records::HealthRecordService;
use super::statistics::{self, BmiCategory, Breakdown};
use super::students::StudentService;
use crate::{
    db::RowStore,
    error::DataAccessError,
    models::{
        class::ClassCode,
        complaint::{ComplaintStatus, ComplaintTab},
        health_record::{HealthRecord, HealthStatus, Timeframe},
        student::Student,
    },
};

/// The chronologically latest record of each student.
pub fn latest_by_student(records: &[HealthRecord]) -> HashMap<Uuid, &HealthRecord> {
    let mut latest: HashMap<Uuid, &HealthRecord> = HashMap::new();
    for record in records {
        latest
            .entry(record.siswa_id)
            .and_modify(|current| {
                if record.chronology() > current.chronology() {
                    *current = record;
                }
            })
            .or_insert(record);
    }
    latest
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub student: Student,
    /// `None` when the student has no record yet.
    pub latest: Option<HealthRecord>,
}

impl RosterEntry {
    pub fn status(&self) -> Option<HealthStatus> {
        self.latest.as_ref().map(|r| r.status)
    }

    pub fn status_label(&self) -> &'static str {
        self.status().map(|s| s.as_str()).unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterTab {
    #[default]
    Semua,
    Sehat,
    Sakit,
}

impl RosterTab {
    /// Students without a record only show up under `Semua`.
    pub fn admits(self, entry: &RosterEntry) -> bool {
        match (self, entry.status()) {
            (RosterTab::Semua, _) => true,
            (RosterTab::Sehat, Some(status)) => !status.is_unwell(),
            (RosterTab::Sakit, Some(status)) => status.is_unwell(),
            (_, None) => false,
        }
    }
}

pub fn roster(students: Vec<Student>, records: &[HealthRecord]) -> Vec<RosterEntry> {
    let latest = latest_by_student(records);
    students
        .into_iter()
        .map(|student| RosterEntry {
            latest: latest.get(&student.id).map(|r| (*r).clone()),
            student,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassOverview {
    pub kelas: ClassCode,
    pub total_students: usize,
    pub healthy: usize,
    pub unwell: usize,
    pub no_data: usize,
    /// Categories of each student's latest record; students without one count as `NoData`.
    pub bmi: Breakdown<BmiCategory>,
    pub pending_complaints: usize,
}

impl ClassOverview {
    pub fn healthy_percentage(&self) -> u32 {
        statistics::percentage(self.healthy, self.total_students)
    }

    pub fn unwell_percentage(&self) -> u32 {
        statistics::percentage(self.unwell, self.total_students)
    }

    pub fn no_data_percentage(&self) -> u32 {
        statistics::percentage(self.no_data, self.total_students)
    }
}

pub fn class_overview(
    kelas: ClassCode,
    entries: &[RosterEntry],
    pending_complaints: usize,
) -> ClassOverview {
    let mut healthy = 0;
    let mut unwell = 0;
    let mut no_data = 0;
    for entry in entries {
        match entry.status() {
            Some(status) if status.is_unwell() => unwell += 1,
            Some(_) => healthy += 1,
            None => no_data += 1,
        }
    }

    let bmi = entries
        .iter()
        .map(|entry| match &entry.latest {
            Some(r) => BmiCategory::of(r.berat_badan, r.tinggi_badan),
            None => BmiCategory::NoData,
        })
        .collect();

    ClassOverview {
        kelas,
        total_students: entries.len(),
        healthy,
        unwell,
        no_data,
        bmi,
        pending_complaints,
    }
}

pub struct ReportService;

impl ReportService {
    /// Every student of the class with their latest record inside `timeframe`.
    pub async fn roster(
        store: &dyn RowStore,
        kelas: ClassCode,
        timeframe: Timeframe,
        now: DateTime<Utc>,
        tab: RosterTab,
    ) -> Result<Vec<RosterEntry>, DataAccessError> {
        let students = StudentService::list_for_class(store, kelas).await?;
        let ids: Vec<Uuid> = students.iter().map(|s| s.id).collect();
        let records = HealthRecordService::list_for_students(store, &ids, timeframe, now).await?;
        Ok(roster(students, &records).into_iter().filter(|e| tab.admits(e)).collect())
    }

    pub async fn class_overview(
        store: &dyn RowStore,
        kelas: ClassCode,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Result<ClassOverview, DataAccessError> {
        let entries = Self::roster(store, kelas, timeframe, now, RosterTab::Semua).await?;
        let complaints = Self::complaint_counts(store, kelas).await?;
        Ok(class_overview(kelas, &entries, complaints.count(&ComplaintStatus::Menunggu)))
    }

    /// Complaints of the class per status.
    pub async fn complaint_counts(
        store: &dyn RowStore,
        kelas: ClassCode,
    ) -> Result<Breakdown<ComplaintStatus>, DataAccessError> {
        let complaints = ComplaintService::list_for_class(store, kelas, ComplaintTab::All).await?;
        Ok(complaints.into_iter().map(|c| c.complaint.status).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{health_record::HealthRecordFields, student::StudentFields, AccountRef};
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn check(status: HealthStatus, tanggal: NaiveDate, berat: f64, tinggi: f64) -> HealthRecordFields {
        HealthRecordFields {
            suhu_tubuh: if status.is_unwell() { 38.0 } else { 36.6 },
            berat_badan: berat,
            tinggi_badan: tinggi,
            status,
            keluhan: status.is_unwell().then(|| "Demam".to_string()),
            tanggal,
        }
    }

    async fn enrol(store: &MemoryStore, nama: &str, kelas: ClassCode) -> Uuid {
        StudentService::create(store, AccountRef(Uuid::new_v4()), &StudentFields::new(nama, kelas))
            .await
            .unwrap();
        StudentService::list(store)
            .await
            .unwrap()
            .into_iter()
            .find(|s| s.nama == nama)
            .unwrap()
            .id
    }

    #[test]
    fn test_latest_by_student_breaks_ties_by_insertion() {
        let siswa = Uuid::new_v4();
        let base = HealthRecord {
            id: Uuid::new_v4(),
            siswa_id: siswa,
            suhu_tubuh: 36.5,
            berat_badan: 30.0,
            tinggi_badan: 130.0,
            status: HealthStatus::Sehat,
            keluhan: None,
            tanggal: day(10),
            created_at: Utc.with_ymd_and_hms(2026, 10, 10, 7, 0, 0).unwrap(),
        };
        let later_same_day = HealthRecord {
            id: Uuid::new_v4(),
            status: HealthStatus::Sakit,
            created_at: Utc.with_ymd_and_hms(2026, 10, 10, 12, 0, 0).unwrap(),
            ..base.clone()
        };
        let earlier_day = HealthRecord { id: Uuid::new_v4(), tanggal: day(2), ..base.clone() };

        let records = [later_same_day.clone(), base, earlier_day];
        let latest = latest_by_student(&records);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[&siswa].id, later_same_day.id);
    }

    #[tokio::test]
    async fn test_roster_tabs_and_unknown_status() {
        let store = MemoryStore::new();
        let budi = enrol(&store, "Budi", ClassCode::Kelas6A).await;
        let ani = enrol(&store, "Ani", ClassCode::Kelas6A).await;
        enrol(&store, "Citra", ClassCode::Kelas6A).await;
        let other = enrol(&store, "Dodi", ClassCode::Kelas4B).await;

        HealthRecordService::submit(&store, budi, &check(HealthStatus::Sakit, day(1), 30.0, 130.0))
            .await
            .unwrap();
        HealthRecordService::submit(&store, budi, &check(HealthStatus::Sehat, day(18), 30.0, 130.0))
            .await
            .unwrap();
        HealthRecordService::submit(&store, ani, &check(HealthStatus::Danger, day(17), 28.0, 128.0))
            .await
            .unwrap();
        HealthRecordService::submit(&store, other, &check(HealthStatus::Sakit, day(17), 25.0, 120.0))
            .await
            .unwrap();

        let all = ReportService::roster(&store, ClassCode::Kelas6A, Timeframe::Bulan, now(), RosterTab::Semua)
            .await
            .unwrap();
        let labels: Vec<_> = all.iter().map(|e| (e.student.nama.as_str(), e.status_label())).collect();
        assert_eq!(labels, [("Ani", "danger"), ("Budi", "sehat"), ("Citra", "unknown")]);

        let sick = ReportService::roster(&store, ClassCode::Kelas6A, Timeframe::Bulan, now(), RosterTab::Sakit)
            .await
            .unwrap();
        assert_eq!(sick.len(), 1);
        assert_eq!(sick[0].student.id, ani);

        let healthy = ReportService::roster(&store, ClassCode::Kelas6A, Timeframe::Bulan, now(), RosterTab::Sehat)
            .await
            .unwrap();
        assert_eq!(healthy.len(), 1);
        assert_eq!(healthy[0].student.id, budi);
    }

    #[tokio::test]
    async fn test_class_overview() {
        let store = MemoryStore::new();
        let budi = enrol(&store, "Budi", ClassCode::Kelas5A).await;
        let ani = enrol(&store, "Ani", ClassCode::Kelas5A).await;
        enrol(&store, "Citra", ClassCode::Kelas5A).await;

        HealthRecordService::submit(&store, budi, &check(HealthStatus::Sehat, day(18), 30.0, 130.0))
            .await
            .unwrap();
        HealthRecordService::submit(&store, ani, &check(HealthStatus::Sakit, day(18), 45.0, 130.0))
            .await
            .unwrap();
        ComplaintService::submit(&store, ani, "Pusing").await.unwrap();
        ComplaintService::submit(&store, budi, "Gatal").await.unwrap();
        let answered = ComplaintService::list_for_student(&store, budi).await.unwrap()[0].id;
        ComplaintService::respond(&store, answered, "Sudah diobati").await.unwrap();

        let overview = ReportService::class_overview(&store, ClassCode::Kelas5A, Timeframe::Minggu, now())
            .await
            .unwrap();
        assert_eq!(overview.total_students, 3);
        assert_eq!((overview.healthy, overview.unwell, overview.no_data), (1, 1, 1));
        assert_eq!(overview.healthy_percentage(), 33);
        assert_eq!(overview.no_data_percentage(), 33);
        assert_eq!(overview.bmi.count(&BmiCategory::Kurus), 1);
        assert_eq!(overview.bmi.count(&BmiCategory::Gemuk), 1);
        assert_eq!(overview.bmi.count(&BmiCategory::NoData), 1);
        assert_eq!(overview.pending_complaints, 1);

        let counts = ReportService::complaint_counts(&store, ClassCode::Kelas5A).await.unwrap();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.count(&ComplaintStatus::Ditanggapi), 1);
    }

    #[test]
    fn test_empty_class_overview() {
        let overview = class_overview(ClassCode::Kelas4A, &[], 0);
        assert_eq!(overview.total_students, 0);
        assert_eq!(overview.healthy_percentage(), 0);
        assert_eq!(overview.bmi.total, 0);
    }
}
