use std::collections::HashMap;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use super::records::{self, Record};
use super::students::StudentService;
use crate::{
    db::{Filter, Order, Row, RowStore},
    error::{DataAccessError, Error},
    models::{
        class::ClassCode,
        complaint::{ClassComplaint, Complaint, ComplaintForm, ComplaintStatus, ComplaintTab, ResponseForm},
    },
};

impl Record for Complaint {
    const TABLE: &'static str = "keluhan";
}

pub struct ComplaintService;

impl ComplaintService {
    pub async fn submit(
        store: &dyn RowStore,
        siswa_id: Uuid,
        isi_keluhan: &str,
    ) -> Result<(), DataAccessError> {
        let mut row = Row::new();
        row.insert("siswa_id".into(), json!(siswa_id));
        row.insert("isi_keluhan".into(), json!(isi_keluhan));
        row.insert("status".into(), json!(ComplaintStatus::Menunggu));
        records::insert(store, Complaint::TABLE, row).await
    }

    pub async fn submit_form(
        store: &dyn RowStore,
        siswa_id: Uuid,
        form: &ComplaintForm,
    ) -> Result<(), Error> {
        let text = form.validate()?;
        Self::submit(store, siswa_id, &text).await?;
        Ok(())
    }

    /// A student's own complaints, newest first.
    pub async fn list_for_student(
        store: &dyn RowStore,
        siswa_id: Uuid,
    ) -> Result<Vec<Complaint>, DataAccessError> {
        records::fetch(store, &[Filter::equals("siswa_id", siswa_id)?], &[Order::desc("created_at")])
            .await
    }

    /// The teacher inbox for one class, newest first.
    pub async fn list_for_class(
        store: &dyn RowStore,
        kelas: ClassCode,
        tab: ComplaintTab,
    ) -> Result<Vec<ClassComplaint>, DataAccessError> {
        let students = StudentService::list_for_class(store, kelas).await?;
        if students.is_empty() {
            return Ok(Vec::new());
        }
        let names: HashMap<Uuid, String> =
            students.into_iter().map(|s| (s.id, s.nama)).collect();

        let mut filters = vec![Filter::any_of("siswa_id", names.keys().copied())?];
        if let Some(status) = tab.status() {
            filters.push(Filter::equals("status", status)?);
        }
        let complaints: Vec<Complaint> =
            records::fetch(store, &filters, &[Order::desc("created_at")]).await?;

        Ok(complaints
            .into_iter()
            .map(|complaint| ClassComplaint {
                siswa_nama: names.get(&complaint.siswa_id).cloned().unwrap_or_default(),
                complaint,
            })
            .collect())
    }

    /// Record a teacher's response and mark the complaint as answered.
    pub async fn respond(
        store: &dyn RowStore,
        id: Uuid,
        tanggapan: &str,
    ) -> Result<(), DataAccessError> {
        let mut row = Row::new();
        row.insert("tanggapan".into(), json!(tanggapan));
        row.insert("status".into(), json!(ComplaintStatus::Ditanggapi));
        row.insert("ditanggapi_pada".into(), json!(Utc::now()));
        records::update(store, Complaint::TABLE, id, row).await
    }

    pub async fn respond_form(
        store: &dyn RowStore,
        id: Uuid,
        form: &ResponseForm,
    ) -> Result<(), Error> {
        let text = form.validate()?;
        Self::respond(store, id, &text).await?;
        Ok(())
    }
}
