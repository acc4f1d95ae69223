use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::records::{self, Record};
use crate::{
    db::{Filter, Order, RowStore},
    error::{DataAccessError, Error},
    models::health_record::{HealthRecord, HealthRecordFields, HealthRecordForm, Timeframe},
};

impl Record for HealthRecord {
    const TABLE: &'static str = "kesehatan_harian";
}

/// Chronological order on the store side: record date, then insertion time.
const ASCENDING: [Order; 2] = [Order::asc("tanggal"), Order::asc("created_at")];
const DESCENDING: [Order; 2] = [Order::desc("tanggal"), Order::desc("created_at")];

pub struct HealthRecordService;

impl HealthRecordService {
    pub async fn submit(
        store: &dyn RowStore,
        siswa_id: Uuid,
        fields: &HealthRecordFields,
    ) -> Result<(), DataAccessError> {
        let mut row = records::to_row(HealthRecord::TABLE, fields)?;
        row.insert("siswa_id".into(), serde_json::json!(siswa_id));
        records::insert(store, HealthRecord::TABLE, row).await
    }

    /// Validate the daily form against `today` and store it.
    pub async fn submit_form(
        store: &dyn RowStore,
        siswa_id: Uuid,
        form: &HealthRecordForm,
        today: NaiveDate,
    ) -> Result<(), Error> {
        let fields = form.validate(today)?;
        Self::submit(store, siswa_id, &fields).await?;
        Ok(())
    }

    /// One student's records inside `timeframe`, oldest first when `ascending`.
    pub async fn list_for_student(
        store: &dyn RowStore,
        siswa_id: Uuid,
        timeframe: Timeframe,
        now: DateTime<Utc>,
        ascending: bool,
    ) -> Result<Vec<HealthRecord>, DataAccessError> {
        let mut filters = vec![Filter::equals("siswa_id", siswa_id)?];
        if let Some(start) = timeframe.start(now) {
            filters.push(Filter::at_least("tanggal", start)?);
        }
        let order = if ascending { &ASCENDING } else { &DESCENDING };
        records::fetch(store, &filters, order).await
    }

    /// Records of many students at once, oldest first.
    pub async fn list_for_students(
        store: &dyn RowStore,
        siswa_ids: &[Uuid],
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Result<Vec<HealthRecord>, DataAccessError> {
        if siswa_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut filters = vec![Filter::any_of("siswa_id", siswa_ids.iter().copied())?];
        if let Some(start) = timeframe.start(now) {
            filters.push(Filter::at_least("tanggal", start)?);
        }
        records::fetch(store, &filters, &ASCENDING).await
    }

    pub async fn delete(store: &dyn RowStore, id: Uuid) -> Result<(), DataAccessError> {
        records::delete(store, HealthRecord::TABLE, id).await
    }

    /// Delete every record dated before `cutoff` in a single statement.
    /// Returns how many were removed; on error nothing was removed.
    pub async fn purge_before(
        store: &dyn RowStore,
        cutoff: NaiveDate,
    ) -> Result<u64, DataAccessError> {
        let filters = [Filter::before("tanggal", cutoff)?];
        let purged = records::delete_where(store, HealthRecord::TABLE, &filters).await?;
        if purged > 0 {
            tracing::info!("Purged {purged} health records dated before {cutoff}");
        }
        Ok(purged)
    }
}
