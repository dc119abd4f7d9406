use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Provider handle -> (local user field -> provider profile attribute).
pub type FieldMapping = BTreeMap<String, BTreeMap<String, String>>;

/// Validation-rule context attached to a settings record before it is saved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationScenario {
    /// All rules.
    #[default]
    Default,
    /// Field-mapping rules only.
    FieldMapping,
    /// Provider credential-block rules only.
    Providers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The persisted settings record for the plugin installation, stored by the
/// registry as a flat attribute mapping.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginSettings {
    pub field_mapping: Option<FieldMapping>,
    /// Opaque per-provider credential blocks, keyed by provider handle.
    pub providers: BTreeMap<String, serde_json::Value>,
    /// Transient; never persisted.
    #[serde(skip)]
    pub scenario: ValidationScenario,
}

impl PluginSettings {
    pub fn set_scenario(&mut self, scenario: ValidationScenario) {
        self.scenario = scenario;
    }

    /// Runs the rules selected by the current scenario. An empty error list
    /// gates the write in `SettingsService::save_settings`.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if matches!(
            self.scenario,
            ValidationScenario::Default | ValidationScenario::FieldMapping
        ) {
            self.validate_field_mapping(&mut errors);
        }
        if matches!(
            self.scenario,
            ValidationScenario::Default | ValidationScenario::Providers
        ) {
            self.validate_providers(&mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_field_mapping(&self, errors: &mut Vec<ValidationError>) {
        let Some(mapping) = &self.field_mapping else {
            return;
        };
        for (provider, fields) in mapping {
            if provider.trim().is_empty() {
                errors.push(ValidationError::new(
                    "fieldMapping",
                    "provider handle must not be empty",
                ));
            }
            for (local, remote) in fields {
                if local.trim().is_empty() || remote.trim().is_empty() {
                    errors.push(ValidationError::new(
                        "fieldMapping",
                        format!("empty attribute name in mapping for {provider}"),
                    ));
                }
            }
        }
    }

    fn validate_providers(&self, errors: &mut Vec<ValidationError>) {
        for (provider, block) in &self.providers {
            if provider.trim().is_empty() {
                errors.push(ValidationError::new(
                    "providers",
                    "provider handle must not be empty",
                ));
            }
            if !block.is_object() {
                errors.push(ValidationError::new(
                    "providers",
                    format!("credential block for {provider} must be an object"),
                ));
            }
        }
    }

    /// The flat attribute mapping handed to the registry for storage.
    pub fn attributes(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }

    pub fn from_attributes(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(provider: &str, local: &str, remote: &str) -> FieldMapping {
        let mut fields = BTreeMap::new();
        fields.insert(local.to_string(), remote.to_string());
        let mut out = BTreeMap::new();
        out.insert(provider.to_string(), fields);
        out
    }

    #[test]
    fn default_settings_are_valid() {
        assert!(PluginSettings::default().validate().is_ok());
    }

    #[test]
    fn empty_mapped_attribute_fails_validation() {
        let settings = PluginSettings {
            field_mapping: Some(mapping("google", "email", "")),
            ..Default::default()
        };
        let errors = settings.validate().unwrap_err();
        assert_eq!(errors[0].field, "fieldMapping");
    }

    #[test]
    fn non_object_provider_block_fails_validation() {
        let mut settings = PluginSettings::default();
        settings
            .providers
            .insert("apple".to_string(), json!("not-an-object"));
        assert!(settings.validate().is_err());
    }

    #[test]
    fn field_mapping_scenario_skips_provider_rules() {
        let mut settings = PluginSettings {
            field_mapping: Some(mapping("google", "email", "email")),
            ..Default::default()
        };
        settings
            .providers
            .insert("apple".to_string(), json!("not-an-object"));

        settings.set_scenario(ValidationScenario::FieldMapping);
        assert!(settings.validate().is_ok());

        settings.set_scenario(ValidationScenario::Providers);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn attributes_round_trip_skips_scenario() {
        let mut settings = PluginSettings {
            field_mapping: Some(mapping("github", "username", "login")),
            ..Default::default()
        };
        settings.set_scenario(ValidationScenario::Providers);

        let restored = PluginSettings::from_attributes(&settings.attributes());
        assert_eq!(restored.field_mapping, settings.field_mapping);
        assert_eq!(restored.scenario, ValidationScenario::Default);
    }
}
