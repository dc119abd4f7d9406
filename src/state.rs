use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::service::{config::ConfigService, settings::SettingsService};

pub trait DatabaseClient: Send + Sync {
    fn conn(&self) -> &DatabaseConnection;
}

pub struct SeaOrmDatabaseClient {
    conn: DatabaseConnection,
}

impl SeaOrmDatabaseClient {
    pub async fn new() -> Self {
        let conn = crate::db::connect()
            .await
            .expect("database connection failed");
        crate::schema::apply(&conn)
            .await
            .expect("schema apply failed");
        Self { conn }
    }
}

impl DatabaseClient for SeaOrmDatabaseClient {
    fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }
}

pub struct AppState {
    db: Arc<dyn DatabaseClient>,
    settings: Arc<dyn SettingsService>,
    config: Arc<dyn ConfigService>,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let db: Arc<dyn DatabaseClient> = Arc::new(SeaOrmDatabaseClient::new().await);
        let sites_repo = Arc::new(crate::repo::sites::SeaOrmSitesRepo::new(db.clone()));
        let plugins_repo = Arc::new(crate::repo::plugins::SeaOrmPluginsRepo::new(db.clone()));
        let groups_repo = Arc::new(crate::repo::user_groups::SeaOrmUserGroupsRepo::new(
            db.clone(),
        ));
        let registry = Arc::new(crate::service::registry::SeaOrmPluginRegistry::new(
            plugins_repo.clone(),
        ));
        let providers = Arc::new(crate::service::providers::DefaultProviderRegistry::new());
        let aliases = Arc::new(crate::service::aliases::EnvAliasResolver::new());
        let config = Arc::new(crate::service::config::ConfigServiceImpl::new());
        let settings = Arc::new(crate::service::settings::SettingsServiceImpl::new(
            registry,
            plugins_repo,
            sites_repo,
            groups_repo,
            providers,
            aliases,
            config.clone(),
        ));

        Arc::new(Self {
            db,
            settings,
            config,
        })
    }

    pub fn db(&self) -> &dyn DatabaseClient {
        self.db.as_ref()
    }

    pub fn settings(&self) -> &dyn SettingsService {
        self.settings.as_ref()
    }

    pub fn config(&self) -> &dyn ConfigService {
        self.config.as_ref()
    }
}
