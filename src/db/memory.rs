use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Filter, Order, Row, RowStore};
use crate::error::StoreError;

/// In-process row store with the same observable behaviour as [`PgStore`]:
/// store-side `id` and `created_at` defaults, NULLs sorted last, and
/// not-found errors on unmatched update/delete.
///
/// [`PgStore`]: super::PgStore
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    tables: HashMap<String, Vec<Row>>,
    last_stamp: Option<DateTime<Utc>>,
}

impl State {
    /// Creation stamps are strictly increasing so recency ordering is stable.
    fn next_stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn id_matches(row: &Row, id: Uuid) -> bool {
    row.get("id")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Uuid>().ok())
        == Some(id)
}

/// Orders values of different JSON types apart so they never compare equal.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
        Value::Null => 5,
    }
}

/// Text sorts case-insensitively first, like a non-C collation, and falls
/// back to byte order so distinct strings never tie.
fn compare_text(x: &str, y: &str) -> Ordering {
    match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => x.to_lowercase().cmp(&y.to_lowercase()).then_with(|| x.cmp(y)),
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        // NULLS LAST, as PostgreSQL does for ascending order.
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => compare_text(x, y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (x, y) if type_rank(x) != type_rank(y) => type_rank(x).cmp(&type_rank(y)),
        (x, y) => x.to_string().cmp(&y.to_string()),
    }
}

fn matches(row: &Row, filter: &Filter) -> bool {
    let value = row.get(filter.column()).unwrap_or(&Value::Null);
    if value.is_null() {
        return false;
    }
    match filter {
        Filter::Eq(_, expected) => compare(value, expected) == Ordering::Equal,
        Filter::Gte(_, bound) => compare(value, bound) != Ordering::Less,
        Filter::Lt(_, bound) => compare(value, bound) == Ordering::Less,
        Filter::In(_, candidates) => candidates
            .iter()
            .any(|c| !c.is_null() && compare(value, c) == Ordering::Equal),
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: &[Order],
    ) -> Result<Vec<Row>, StoreError> {
        let state = self.state.lock().await;
        let mut rows: Vec<Row> = state
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| filters.iter().all(|f| matches(row, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        rows.sort_by(|a, b| {
            order
                .iter()
                .map(|o| {
                    let (x, y) = (
                        a.get(o.column).unwrap_or(&Value::Null),
                        b.get(o.column).unwrap_or(&Value::Null),
                    );
                    let ord = compare(x, y);
                    if o.ascending { ord } else { ord.reverse() }
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<(), StoreError> {
        if row.is_empty() {
            return Err(StoreError::EmptyRow(table.to_string()));
        }
        let mut state = self.state.lock().await;
        let stamp = state.next_stamp().to_rfc3339();
        if !row.get("id").is_some_and(|v| !v.is_null()) {
            row.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        }
        if !row.get("created_at").is_some_and(|v| !v.is_null()) {
            row.insert("created_at".into(), Value::String(stamp));
        }
        state.tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }

    async fn update(&self, table: &str, row: Row, id: Uuid) -> Result<(), StoreError> {
        if row.is_empty() {
            return Err(StoreError::EmptyRow(table.to_string()));
        }
        let mut state = self.state.lock().await;
        let target = state
            .tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| id_matches(r, id)))
            .ok_or_else(|| StoreError::NotFound { table: table.to_string(), id })?;
        target.extend(row);
        Ok(())
    }

    async fn delete(&self, table: &str, id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let rows = state.tables.get_mut(table);
        let removed = match rows {
            Some(rows) => {
                let before = rows.len();
                rows.retain(|r| !id_matches(r, id));
                before - rows.len()
            }
            None => 0,
        };
        if removed == 0 {
            return Err(StoreError::NotFound { table: table.to_string(), id });
        }
        Ok(())
    }

    async fn delete_where(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        let Some(rows) = state.tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !filters.iter().all(|f| matches(row, f)));
        Ok((before - rows.len()) as u64)
    }
}
