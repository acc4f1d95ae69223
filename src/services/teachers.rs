use uuid::Uuid;

use super::records::{self, Record};
use crate::{
    db::{Filter, Order, RowStore},
    error::DataAccessError,
    models::{
        class::ClassCode,
        teacher::{Teacher, TeacherFields},
        AccountRef,
    },
};

impl Record for Teacher {
    const TABLE: &'static str = "guru";
}

pub struct TeacherService;

impl TeacherService {
    pub async fn list(store: &dyn RowStore) -> Result<Vec<Teacher>, DataAccessError> {
        records::fetch(store, &[], &[Order::asc("nama")]).await
    }

    /// Homeroom teachers of a class. Normally one, but nothing enforces it.
    pub async fn homeroom_of(
        store: &dyn RowStore,
        kelas: ClassCode,
    ) -> Result<Vec<Teacher>, DataAccessError> {
        records::fetch(store, &[Filter::equals("wali_kelas", kelas)?], &[Order::asc("nama")]).await
    }

    pub async fn create(
        store: &dyn RowStore,
        account: AccountRef,
        fields: &TeacherFields,
    ) -> Result<(), DataAccessError> {
        let mut row = records::to_row(Teacher::TABLE, &fields.normalized())?;
        row.insert("user_id".into(), serde_json::json!(account));
        records::insert(store, Teacher::TABLE, row).await
    }

    pub async fn update(
        store: &dyn RowStore,
        id: Uuid,
        fields: &TeacherFields,
    ) -> Result<(), DataAccessError> {
        let row = records::to_row(Teacher::TABLE, &fields.normalized())?;
        records::update(store, Teacher::TABLE, id, row).await
    }

    pub async fn delete(store: &dyn RowStore, id: Uuid) -> Result<(), DataAccessError> {
        records::delete(store, Teacher::TABLE, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn test_teacher_lifecycle() {
        let store = MemoryStore::new();
        assert!(TeacherService::list(&store).await.unwrap().is_empty());

        let mut heni = TeacherFields::new("Ibu Heni");
        heni.wali_kelas = Some(ClassCode::Kelas6A);
        heni.bidang_studi = Some("Matematika".into());
        TeacherService::create(&store, AccountRef(Uuid::new_v4()), &heni).await.unwrap();

        let teachers = TeacherService::list(&store).await.unwrap();
        assert_eq!(teachers.len(), 1);
        assert_eq!(teachers[0].fields(), heni);
        let id = teachers[0].id;

        // Dropping the homeroom assignment is a full update to "not a homeroom teacher".
        let mut edited = heni.clone();
        edited.wali_kelas = None;
        TeacherService::update(&store, id, &edited).await.unwrap();
        let teachers = TeacherService::list(&store).await.unwrap();
        assert_eq!(teachers[0].fields(), edited);
        assert!(TeacherService::homeroom_of(&store, ClassCode::Kelas6A)
            .await
            .unwrap()
            .is_empty());

        TeacherService::delete(&store, id).await.unwrap();
        assert!(TeacherService::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_homeroom_lookup_and_name_order() {
        let store = MemoryStore::new();
        let mut dedi = TeacherFields::new("Bapak Dedi");
        dedi.wali_kelas = Some(ClassCode::Kelas6B);
        let mut ani = TeacherFields::new("Ani Rahma");
        ani.bidang_studi = Some(String::new());

        for fields in [&dedi, &ani] {
            TeacherService::create(&store, AccountRef(Uuid::new_v4()), fields).await.unwrap();
        }

        let teachers = TeacherService::list(&store).await.unwrap();
        assert_eq!(teachers[0].nama, "Ani Rahma");
        assert_eq!(teachers[0].bidang_studi, None);

        let homeroom = TeacherService::homeroom_of(&store, ClassCode::Kelas6B).await.unwrap();
        assert_eq!(homeroom.len(), 1);
        assert!(homeroom[0].is_homeroom_of(ClassCode::Kelas6B));
    }
}
