use async_trait::async_trait;
use std::sync::Arc;

use crate::{entities::plugins, model::PluginSettings, repo::plugins::PluginsRepo};

/// The host's plugin registry: lookup by handle, read the active settings
/// record, persist a settings attribute bag.
#[async_trait]
pub trait PluginRegistry: Send + Sync {
    async fn get_plugin(&self, handle: &str)
        -> Result<Option<plugins::Model>, sea_orm::DbErr>;
    /// Settings for an installed plugin. A missing plugin row is a
    /// `DbErr::RecordNotFound`; callers treat it as a logic error.
    async fn current_settings(&self, handle: &str) -> Result<PluginSettings, sea_orm::DbErr>;
    /// Persists the attribute bag. `false` when the plugin is not installed.
    async fn save_settings(
        &self,
        handle: &str,
        attributes: serde_json::Value,
    ) -> Result<bool, sea_orm::DbErr>;
}

pub struct SeaOrmPluginRegistry {
    plugins_repo: Arc<dyn PluginsRepo>,
}

impl SeaOrmPluginRegistry {
    pub fn new(plugins_repo: Arc<dyn PluginsRepo>) -> Self {
        Self { plugins_repo }
    }
}

#[async_trait]
impl PluginRegistry for SeaOrmPluginRegistry {
    async fn get_plugin(
        &self,
        handle: &str,
    ) -> Result<Option<plugins::Model>, sea_orm::DbErr> {
        self.plugins_repo.find_by_handle(handle).await
    }

    async fn current_settings(&self, handle: &str) -> Result<PluginSettings, sea_orm::DbErr> {
        let Some(plugin) = self.plugins_repo.find_by_handle(handle).await? else {
            return Err(sea_orm::DbErr::RecordNotFound(format!(
                "plugin not installed: {handle}"
            )));
        };

        Ok(plugin
            .settings
            .as_ref()
            .map(PluginSettings::from_attributes)
            .unwrap_or_default())
    }

    async fn save_settings(
        &self,
        handle: &str,
        attributes: serde_json::Value,
    ) -> Result<bool, sea_orm::DbErr> {
        let Some(plugin) = self.plugins_repo.find_by_handle(handle).await? else {
            tracing::warn!("save_settings for uninstalled plugin {handle}");
            return Ok(false);
        };

        self.plugins_repo.update_settings(plugin, attributes).await?;
        Ok(true)
    }
}
