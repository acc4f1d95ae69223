use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Filter, Order, Row, RowStore};
use crate::error::StoreError;

/// PostgreSQL-backed row store.
///
/// Rows are read with `to_jsonb` and written through `jsonb_populate_record`,
/// so column types are resolved by the table definition, not by the caller.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Table and column names are interpolated into SQL, so only lowercase
/// ASCII identifiers are accepted.
fn ident(name: &str) -> Result<&str, StoreError> {
    let valid = !name.is_empty()
        && name.len() <= 63
        && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if valid {
        Ok(name)
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}

fn columns_of(row: &Row) -> Result<Vec<String>, StoreError> {
    row.keys().map(|k| ident(k).map(str::to_string)).collect()
}

fn single(column: &str, value: &Value) -> Value {
    let mut object = Map::new();
    object.insert(column.to_string(), value.clone());
    Value::Object(object)
}

/// Append `WHERE` predicates on alias `t`, numbering parameters after `binds`.
fn push_filters(
    sql: &mut String,
    binds: &mut Vec<Value>,
    table: &str,
    filters: &[Filter],
) -> Result<(), StoreError> {
    for (i, filter) in filters.iter().enumerate() {
        sql.push_str(if i == 0 { " WHERE " } else { " AND " });
        let column = ident(filter.column())?;
        let n = binds.len() + 1;
        // Each parameter is cast to the column's own type via the table's row type.
        let typed = |n: usize| format!("(jsonb_populate_record(NULL::{table}, ${n})).{column}");
        match filter {
            Filter::Eq(_, value) => {
                sql.push_str(&format!("t.{column} = {}", typed(n)));
                binds.push(single(column, value));
            }
            Filter::Gte(_, value) => {
                sql.push_str(&format!("t.{column} >= {}", typed(n)));
                binds.push(single(column, value));
            }
            Filter::Lt(_, value) => {
                sql.push_str(&format!("t.{column} < {}", typed(n)));
                binds.push(single(column, value));
            }
            Filter::In(_, values) => {
                sql.push_str(&format!(
                    "t.{column} IN (SELECT (jsonb_populate_record(NULL::{table}, jsonb_build_object('{column}', v.value))).{column}
                     FROM jsonb_array_elements(${n}) AS v(value))"
                ));
                binds.push(Value::Array(values.clone()));
            }
        }
    }
    Ok(())
}

/// Build the SELECT statement and its positional JSON parameters.
fn select_sql(
    table: &str,
    filters: &[Filter],
    order: &[Order],
) -> Result<(String, Vec<Value>), StoreError> {
    let table = ident(table)?;
    let mut sql = format!("SELECT to_jsonb(t) FROM {table} t");
    let mut binds = Vec::with_capacity(filters.len());
    push_filters(&mut sql, &mut binds, table, filters)?;

    if !order.is_empty() {
        let clauses = order
            .iter()
            .map(|o| {
                ident(o.column).map(|c| format!("t.{c} {}", if o.ascending { "ASC" } else { "DESC" }))
            })
            .collect::<Result<Vec<_>, _>>()?;
        sql.push_str(" ORDER BY ");
        sql.push_str(&clauses.join(", "));
    }

    Ok((sql, binds))
}

/// Single-row INSERT; `$1` is the row as a JSON object.
fn insert_sql(table: &str, row: &Row) -> Result<String, StoreError> {
    let table = ident(table)?;
    if row.is_empty() {
        return Err(StoreError::EmptyRow(table.to_string()));
    }
    let columns = columns_of(row)?.join(", ");
    Ok(format!(
        "INSERT INTO {table} ({columns}) SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1)"
    ))
}

/// UPDATE of the given columns by id; `$1` is the row, `$2` the id.
fn update_sql(table: &str, row: &Row) -> Result<String, StoreError> {
    let table = ident(table)?;
    if row.is_empty() {
        return Err(StoreError::EmptyRow(table.to_string()));
    }
    let assignments = columns_of(row)?
        .iter()
        .map(|c| format!("{c} = r.{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!(
        "UPDATE {table} SET {assignments} FROM jsonb_populate_record(NULL::{table}, $1) AS r WHERE {table}.id = $2"
    ))
}

/// One DELETE statement covering every row that matches `filters`.
fn delete_where_sql(table: &str, filters: &[Filter]) -> Result<(String, Vec<Value>), StoreError> {
    let table = ident(table)?;
    let mut sql = format!("DELETE FROM {table} AS t");
    let mut binds = Vec::with_capacity(filters.len());
    push_filters(&mut sql, &mut binds, table, filters)?;
    Ok((sql, binds))
}

#[async_trait]
impl RowStore for PgStore {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: &[Order],
    ) -> Result<Vec<Row>, StoreError> {
        let (sql, binds) = select_sql(table, filters, order)?;
        tracing::debug!(%sql, "select");

        let mut query = sqlx::query_scalar::<_, Json<Row>>(&sql);
        for value in binds {
            query = query.bind(Json(value));
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|Json(row)| row).collect())
    }

    async fn insert(&self, table: &str, row: Row) -> Result<(), StoreError> {
        let sql = insert_sql(table, &row)?;
        tracing::debug!(%sql, "insert");

        sqlx::query(&sql)
            .bind(Json(Value::Object(row)))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update(&self, table: &str, row: Row, id: Uuid) -> Result<(), StoreError> {
        let sql = update_sql(table, &row)?;
        tracing::debug!(%sql, %id, "update");

        let result = sqlx::query(&sql)
            .bind(Json(Value::Object(row)))
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { table: table.to_string(), id });
        }
        Ok(())
    }

    async fn delete(&self, table: &str, id: Uuid) -> Result<(), StoreError> {
        let table = ident(table)?;
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { table: table.to_string(), id });
        }
        Ok(())
    }

    async fn delete_where(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
        let (sql, binds) = delete_where_sql(table, filters)?;
        tracing::debug!(%sql, "delete_where");

        let mut query = sqlx::query(&sql);
        for value in binds {
            query = query.bind(Json(value));
        }
        Ok(query.execute(&self.pool).await?.rows_affected())
    }
}
