use async_trait::async_trait;
use sea_orm::{EntityTrait, QueryOrder};

use crate::{entities::user_groups, state::DatabaseClient};

#[async_trait]
pub trait UserGroupsRepo: Send + Sync {
    /// Every group, in directory order.
    async fn all(&self) -> Result<Vec<user_groups::Model>, sea_orm::DbErr>;
}

pub struct SeaOrmUserGroupsRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmUserGroupsRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserGroupsRepo for SeaOrmUserGroupsRepo {
    async fn all(&self) -> Result<Vec<user_groups::Model>, sea_orm::DbErr> {
        user_groups::Entity::find()
            .order_by_asc(user_groups::Column::Id)
            .all(self.db.conn())
            .await
    }
}
