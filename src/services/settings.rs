use chrono::{NaiveDate, TimeDelta, Utc};
use serde_json::json;

use super::records::{self, Record};
use crate::{
    db::{Filter, Order, Row, RowStore},
    error::DataAccessError,
    models::settings::{Setting, SystemSettings, SYSTEM_SETTINGS_KEY},
};

impl Record for Setting {
    const TABLE: &'static str = "settings";
}

pub struct SettingsService;

impl SettingsService {
    async fn stored(store: &dyn RowStore) -> Result<Option<Setting>, DataAccessError> {
        let rows: Vec<Setting> = records::fetch(
            store,
            &[Filter::equals("key", SYSTEM_SETTINGS_KEY)?],
            &[Order::asc("created_at")],
        )
        .await?;
        Ok(rows.into_iter().next())
    }

    /// Stored settings, or the defaults when none were saved yet.
    pub async fn load(store: &dyn RowStore) -> Result<SystemSettings, DataAccessError> {
        Ok(Self::stored(store)
            .await?
            .map(|setting| SystemSettings::from_json(&setting.value))
            .unwrap_or_default())
    }

    /// Insert the settings row on first save, update it afterwards.
    pub async fn save(store: &dyn RowStore, settings: &SystemSettings) -> Result<(), DataAccessError> {
        let value = serde_json::to_value(settings)
            .map_err(|source| DataAccessError::Encode { table: Setting::TABLE, source })?;
        let mut row = Row::new();
        row.insert("value".into(), value);
        row.insert("updated_at".into(), json!(Utc::now()));

        match Self::stored(store).await? {
            Some(existing) => records::update(store, Setting::TABLE, existing.id, row).await,
            None => {
                row.insert("key".into(), json!(SYSTEM_SETTINGS_KEY));
                records::insert(store, Setting::TABLE, row).await
            }
        }
    }
}

/// Retention for the purge job: command line first, then the environment,
/// then the stored settings.
pub fn resolve_retention(cli: Option<i64>, env: Option<i64>, stored: &SystemSettings) -> i64 {
    cli.or(env).unwrap_or(stored.data_retention_days)
}

/// First record date kept under `days` of retention, or `None` when `days`
/// is not positive or reaches outside the calendar.
pub fn retention_cutoff(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days <= 0 {
        return None;
    }
    TimeDelta::try_days(days).and_then(|span| today.checked_sub_signed(span))
}
