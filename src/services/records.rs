//! Row mapping shared by the entity services.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::db::{Filter, Order, Row, RowStore};
use crate::error::DataAccessError;

/// A typed row of one store table.
pub trait Record: DeserializeOwned {
    const TABLE: &'static str;
}

pub(crate) async fn fetch<T: Record>(
    store: &dyn RowStore,
    filters: &[Filter],
    order: &[Order],
) -> Result<Vec<T>, DataAccessError> {
    let rows = store.select(T::TABLE, filters, order).await.map_err(|e| {
        tracing::warn!("select from {} failed: {e}", T::TABLE);
        e
    })?;
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(Value::Object(row))
                .map_err(|source| DataAccessError::Decode { table: T::TABLE, source })
        })
        .collect()
}

pub(crate) fn to_row<T: Serialize>(table: &'static str, value: &T) -> Result<Row, DataAccessError> {
    match serde_json::to_value(value).map_err(|source| DataAccessError::Encode { table, source })? {
        Value::Object(row) => Ok(row),
        _ => Err(DataAccessError::NotAnObject(table)),
    }
}

pub(crate) async fn insert(
    store: &dyn RowStore,
    table: &'static str,
    row: Row,
) -> Result<(), DataAccessError> {
    store.insert(table, row).await.map_err(|e| {
        tracing::warn!("insert into {table} failed: {e}");
        e
    })?;
    tracing::info!("Inserted row into {table}");
    Ok(())
}

pub(crate) async fn update(
    store: &dyn RowStore,
    table: &'static str,
    id: Uuid,
    row: Row,
) -> Result<(), DataAccessError> {
    store.update(table, row, id).await.map_err(|e| {
        tracing::warn!("update of {table} {id} failed: {e}");
        e
    })?;
    tracing::info!("Updated {table} {id}");
    Ok(())
}

pub(crate) async fn delete(
    store: &dyn RowStore,
    table: &'static str,
    id: Uuid,
) -> Result<(), DataAccessError> {
    store.delete(table, id).await.map_err(|e| {
        tracing::warn!("delete of {table} {id} failed: {e}");
        e
    })?;
    tracing::info!("Deleted {table} {id}");
    Ok(())
}

/// Delete every row matching `filters` in one store call.
pub(crate) async fn delete_where(
    store: &dyn RowStore,
    table: &'static str,
    filters: &[Filter],
) -> Result<u64, DataAccessError> {
    let removed = store.delete_where(table, filters).await.map_err(|e| {
        tracing::warn!("bulk delete from {table} failed: {e}");
        e
    })?;
    tracing::info!("Deleted {removed} rows from {table}");
    Ok(removed)
}
