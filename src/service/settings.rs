use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    entities::plugins,
    model::{FieldMapping, PluginSettings, ValidationScenario},
    repo::{plugins::PluginsRepo, sites::SitesRepo, user_groups::UserGroupsRepo},
    service::{
        aliases::AliasResolver, config::ConfigService, providers::ProviderRegistry,
        registry::PluginRegistry,
    },
};

pub const PLUGIN_HANDLE: &str = "enupal-socializer";

const CALLBACK_PATH: &str = "/socializer/login/callback";

/// A selectable user-group entry. The first entry is always the sentinel
/// `{name: "None", id: ""}`.
#[derive(Clone, Debug, PartialEq)]
pub struct UserGroupOption {
    pub name: String,
    pub id: String,
}

#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Validates and persists a settings record. `Ok(false)` when validation
    /// fails (nothing is written) or when the registry declines the write.
    async fn save_settings(
        &self,
        settings: PluginSettings,
        scenario: Option<ValidationScenario>,
    ) -> Result<bool, sea_orm::DbErr>;
    /// The primary site's base URL with aliases and env placeholders
    /// resolved and trailing slashes removed. `None` when no primary site
    /// is configured.
    async fn primary_site_url(&self) -> Result<Option<String>, sea_orm::DbErr>;
    async fn callback_url(&self) -> Result<Option<String>, sea_orm::DbErr>;
    async fn settings(&self) -> Result<PluginSettings, sea_orm::DbErr>;
    async fn plugin(&self) -> Result<Option<plugins::Model>, sea_orm::DbErr>;
    async fn plugin_uid(&self) -> Result<Option<Uuid>, sea_orm::DbErr>;
    /// The persisted field mapping when non-empty, otherwise the provider
    /// registry's defaults. No deep merge.
    async fn global_field_mapping(&self) -> Result<FieldMapping, sea_orm::DbErr>;
    async fn user_groups(&self) -> Result<Vec<UserGroupOption>, sea_orm::DbErr>;
    fn config_settings(&self) -> Option<serde_json::Value>;
    fn validate_apple_settings(&self) -> bool;
}

pub struct SettingsServiceImpl {
    registry: Arc<dyn PluginRegistry>,
    plugins_repo: Arc<dyn PluginsRepo>,
    sites_repo: Arc<dyn SitesRepo>,
    groups_repo: Arc<dyn UserGroupsRepo>,
    providers: Arc<dyn ProviderRegistry>,
    aliases: Arc<dyn AliasResolver>,
    config: Arc<dyn ConfigService>,
}

impl SettingsServiceImpl {
    pub fn new(
        registry: Arc<dyn PluginRegistry>,
        plugins_repo: Arc<dyn PluginsRepo>,
        sites_repo: Arc<dyn SitesRepo>,
        groups_repo: Arc<dyn UserGroupsRepo>,
        providers: Arc<dyn ProviderRegistry>,
        aliases: Arc<dyn AliasResolver>,
        config: Arc<dyn ConfigService>,
    ) -> Self {
        Self {
            registry,
            plugins_repo,
            sites_repo,
            groups_repo,
            providers,
            aliases,
            config,
        }
    }

    fn lookup<'a>(
        value: &'a serde_json::Value,
        path: &[&str],
    ) -> Option<&'a serde_json::Value> {
        let mut current = value;
        for key in path {
            current = current.get(key)?;
        }
        Some(current)
    }
}

#[async_trait]
impl SettingsService for SettingsServiceImpl {
    async fn save_settings(
        &self,
        mut settings: PluginSettings,
        scenario: Option<ValidationScenario>,
    ) -> Result<bool, sea_orm::DbErr> {
        if let Some(scenario) = scenario {
            settings.set_scenario(scenario);
        }

        if let Err(errors) = settings.validate() {
            tracing::warn!(
                "plugin settings failed validation with {} error(s)",
                errors.len()
            );
            return Ok(false);
        }

        self.registry
            .save_settings(PLUGIN_HANDLE, settings.attributes())
            .await
    }

    async fn primary_site_url(&self) -> Result<Option<String>, sea_orm::DbErr> {
        let Some(site) = self.sites_repo.find_primary().await? else {
            tracing::warn!("no primary site is configured");
            return Ok(None);
        };
        let Some(base_url) = site.base_url else {
            tracing::warn!("primary site {} has no base url", site.handle);
            return Ok(None);
        };

        // The alias expansion may itself yield a value containing an env
        // placeholder, so resolve again after trimming and expand env last.
        let expanded = self.aliases.resolve_alias(&base_url);
        let trimmed = expanded.trim().trim_end_matches('/');
        let expanded = self.aliases.resolve_alias(trimmed);

        Ok(Some(self.aliases.parse_env(&expanded)))
    }

    async fn callback_url(&self) -> Result<Option<String>, sea_orm::DbErr> {
        Ok(self
            .primary_site_url()
            .await?
            .map(|url| format!("{url}{CALLBACK_PATH}")))
    }

    async fn settings(&self) -> Result<PluginSettings, sea_orm::DbErr> {
        self.registry.current_settings(PLUGIN_HANDLE).await
    }

    async fn plugin(&self) -> Result<Option<plugins::Model>, sea_orm::DbErr> {
        self.registry.get_plugin(PLUGIN_HANDLE).await
    }

    async fn plugin_uid(&self) -> Result<Option<Uuid>, sea_orm::DbErr> {
        let plugin = self.plugins_repo.find_by_handle(PLUGIN_HANDLE).await?;
        Ok(plugin.map(|model| model.uid))
    }

    async fn global_field_mapping(&self) -> Result<FieldMapping, sea_orm::DbErr> {
        let settings = self.settings().await?;
        match settings.field_mapping {
            Some(mapping) if !mapping.is_empty() => Ok(mapping),
            _ => Ok(self.providers.default_field_mapping()),
        }
    }

    async fn user_groups(&self) -> Result<Vec<UserGroupOption>, sea_orm::DbErr> {
        let mut options = vec![UserGroupOption {
            name: "None".to_string(),
            id: String::new(),
        }];
        for group in self.groups_repo.all().await? {
            options.push(UserGroupOption {
                name: group.name,
                id: group.id.to_string(),
            });
        }
        Ok(options)
    }

    fn config_settings(&self) -> Option<serde_json::Value> {
        self.config.socializer().cloned()
    }

    fn validate_apple_settings(&self) -> bool {
        let Some(config) = self.config_settings() else {
            tracing::error!("Apple config is not set");
            return false;
        };

        // Note the nesting: the apple block lives under another `socializer`
        // key inside the socializer config itself. Kept as the host config
        // files actually lay it out; flagged for product-owner review.
        let Some(apple) = Self::lookup(&config, &["socializer", "apple"]) else {
            tracing::error!("Apple config is not set");
            return false;
        };

        let required: [&[&str]; 6] = [
            &["keys", "id"],
            &["keys", "team_id"],
            &["keys", "key_id"],
            &["keys", "key_file"],
            &["scope"],
            &["verifyTokenSignature"],
        ];
        for path in required {
            if Self::lookup(apple, path).is_none() {
                tracing::error!(
                    "missing required Apple config value {}, please check the docs",
                    path.join(".")
                );
                return false;
            }
        }

        // Logged only; an absent key file does not fail validation here.
        if let Some(key_file) = Self::lookup(apple, &["keys", "key_file"])
            .and_then(|value| value.as_str())
        {
            if !Path::new(key_file).exists() {
                tracing::error!("unable to find Apple key file: {key_file}");
            }
        }

        true
    }
}
