use uuid::Uuid;

use super::records::{self, Record};
use crate::{
    db::{Filter, Order, RowStore},
    error::DataAccessError,
    models::{
        class::ClassCode,
        student::{Student, StudentFields},
        AccountRef,
    },
};

impl Record for Student {
    const TABLE: &'static str = "siswa";
}

pub struct StudentService;

impl StudentService {
    pub async fn list(store: &dyn RowStore) -> Result<Vec<Student>, DataAccessError> {
        records::fetch(store, &[], &[Order::asc("nama")]).await
    }

    pub async fn list_for_class(
        store: &dyn RowStore,
        kelas: ClassCode,
    ) -> Result<Vec<Student>, DataAccessError> {
        records::fetch(store, &[Filter::equals("kelas", kelas)?], &[Order::asc("nama")]).await
    }

    pub async fn get(store: &dyn RowStore, id: Uuid) -> Result<Option<Student>, DataAccessError> {
        let mut found: Vec<Student> =
            records::fetch(store, &[Filter::equals("id", id)?], &[]).await?;
        Ok(found.pop())
    }

    /// `account` is the owning login account of the new profile.
    pub async fn create(
        store: &dyn RowStore,
        account: AccountRef,
        fields: &StudentFields,
    ) -> Result<(), DataAccessError> {
        let mut row = records::to_row(Student::TABLE, &fields.normalized())?;
        row.insert("user_id".into(), serde_json::json!(account));
        records::insert(store, Student::TABLE, row).await
    }

    pub async fn update(
        store: &dyn RowStore,
        id: Uuid,
        fields: &StudentFields,
    ) -> Result<(), DataAccessError> {
        let row = records::to_row(Student::TABLE, &fields.normalized())?;
        records::update(store, Student::TABLE, id, row).await
    }

    pub async fn delete(store: &dyn RowStore, id: Uuid) -> Result<(), DataAccessError> {
        records::delete(store, Student::TABLE, id).await
    }
}
