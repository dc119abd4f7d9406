use std::collections::BTreeMap;

use crate::model::FieldMapping;

/// Supplies per-provider defaults used when the installation has not
/// configured its own field mapping.
pub trait ProviderRegistry: Send + Sync {
    fn default_field_mapping(&self) -> FieldMapping;
}

pub struct DefaultProviderRegistry;

impl DefaultProviderRegistry {
    pub fn new() -> Self {
        Self
    }

    fn mapping(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(local, remote)| (local.to_string(), remote.to_string()))
            .collect()
    }
}

impl ProviderRegistry for DefaultProviderRegistry {
    fn default_field_mapping(&self) -> FieldMapping {
        let mut mapping = FieldMapping::new();
        mapping.insert(
            "google".to_string(),
            Self::mapping(&[
                ("email", "email"),
                ("firstName", "firstName"),
                ("lastName", "lastName"),
            ]),
        );
        mapping.insert(
            "facebook".to_string(),
            Self::mapping(&[
                ("email", "email"),
                ("firstName", "firstName"),
                ("lastName", "lastName"),
            ]),
        );
        mapping.insert(
            "twitter".to_string(),
            Self::mapping(&[("email", "email"), ("username", "displayName")]),
        );
        mapping.insert(
            "apple".to_string(),
            Self::mapping(&[("email", "email"), ("firstName", "firstName")]),
        );
        mapping
    }
}
