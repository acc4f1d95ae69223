use chrono::Utc;
use uuid::Uuid;

use super::records::{self, Record};
use crate::{
    db::{Filter, Order, RowStore},
    error::DataAccessError,
    models::video::{Video, VideoCategory, VideoFields},
};

impl Record for Video {
    const TABLE: &'static str = "videos";
}

pub struct VideoService;

impl VideoService {
    /// Newest first.
    pub async fn list(store: &dyn RowStore) -> Result<Vec<Video>, DataAccessError> {
        records::fetch(store, &[], &[Order::desc("created_at")]).await
    }

    pub async fn list_by_category(
        store: &dyn RowStore,
        kategori: VideoCategory,
    ) -> Result<Vec<Video>, DataAccessError> {
        records::fetch(store, &[Filter::equals("kategori", kategori)?], &[Order::desc("created_at")])
            .await
    }

    pub async fn create(store: &dyn RowStore, fields: &VideoFields) -> Result<(), DataAccessError> {
        let mut row = records::to_row(Video::TABLE, &fields.normalized())?;
        row.insert("updated_at".into(), serde_json::json!(Utc::now()));
        records::insert(store, Video::TABLE, row).await
    }

    pub async fn update(
        store: &dyn RowStore,
        id: Uuid,
        fields: &VideoFields,
    ) -> Result<(), DataAccessError> {
        let mut row = records::to_row(Video::TABLE, &fields.normalized())?;
        row.insert("updated_at".into(), serde_json::json!(Utc::now()));
        records::update(store, Video::TABLE, id, row).await
    }

    pub async fn delete(store: &dyn RowStore, id: Uuid) -> Result<(), DataAccessError> {
        records::delete(store, Video::TABLE, id).await
    }
}
