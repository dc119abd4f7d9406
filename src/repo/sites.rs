use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::{entities::sites, state::DatabaseClient};

#[async_trait]
pub trait SitesRepo: Send + Sync {
    /// The site record flagged as primary, if one exists.
    async fn find_primary(&self) -> Result<Option<sites::Model>, sea_orm::DbErr>;
}

pub struct SeaOrmSitesRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmSitesRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SitesRepo for SeaOrmSitesRepo {
    async fn find_primary(&self) -> Result<Option<sites::Model>, sea_orm::DbErr> {
        sites::Entity::find()
            .filter(sites::Column::PrimarySite.eq(true))
            .one(self.db.conn())
            .await
    }
}
