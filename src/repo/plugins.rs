use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};

use crate::{entities::plugins, state::DatabaseClient};

#[async_trait]
pub trait PluginsRepo: Send + Sync {
    async fn find_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<plugins::Model>, sea_orm::DbErr>;
    async fn update_settings(
        &self,
        model: plugins::Model,
        settings: serde_json::Value,
    ) -> Result<plugins::Model, sea_orm::DbErr>;
}

pub struct SeaOrmPluginsRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmPluginsRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PluginsRepo for SeaOrmPluginsRepo {
    async fn find_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<plugins::Model>, sea_orm::DbErr> {
        plugins::Entity::find()
            .filter(plugins::Column::Handle.eq(handle))
            .one(self.db.conn())
            .await
    }

    async fn update_settings(
        &self,
        model: plugins::Model,
        settings: serde_json::Value,
    ) -> Result<plugins::Model, sea_orm::DbErr> {
        let mut active: plugins::ActiveModel = model.into();
        active.settings = sea_orm::Set(Some(settings));
        active.updated_at = sea_orm::Set(chrono::Utc::now().into());
        active.update(self.db.conn()).await
    }
}
