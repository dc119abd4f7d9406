use std::{env, fs, sync::Arc};

use crate::config::Config;

pub trait ConfigService: Send + Sync {
    fn port(&self) -> u16;
    fn values(&self) -> &Config;
    /// The `socializer` key of the general application configuration.
    fn socializer(&self) -> Option<&serde_json::Value>;
}

pub struct ConfigServiceImpl {
    config: Arc<Config>,
}

impl ConfigServiceImpl {
    fn strip_wrapping_quotes(value: &str) -> &str {
        if value.len() >= 2 {
            let bytes = value.as_bytes();
            let first = bytes[0];
            let last = bytes[value.len() - 1];
            if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
                return &value[1..value.len() - 1];
            }
        }
        value
    }

    fn env_nonempty(key: &str) -> Option<String> {
        env::var(key).ok().and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return None;
            }
            let normalized = Self::strip_wrapping_quotes(trimmed).trim();
            if normalized.is_empty() {
                None
            } else {
                Some(normalized.to_string())
            }
        })
    }

    fn env_u16(key: &str) -> Option<u16> {
        Self::env_nonempty(key).and_then(|value| value.parse::<u16>().ok())
    }

    fn load_socializer() -> Option<serde_json::Value> {
        let raw = if let Ok(inline) = env::var("SOCIALIZER_CONFIG") {
            if inline.trim().is_empty() {
                return None;
            }
            inline
        } else {
            let path = Self::env_nonempty("SOCIALIZER_CONFIG_FILE")?;
            match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(err) => {
                    tracing::warn!("unable to read socializer config file {path}: {err}");
                    return None;
                }
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("socializer config is not valid JSON: {err}");
                None
            }
        }
    }

    pub fn new() -> Self {
        let port = Self::env_u16("PORT").unwrap_or(3333);
        let socializer = Self::load_socializer();

        Self {
            config: Arc::new(Config { port, socializer }),
        }
    }

    pub fn with_values(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl ConfigService for ConfigServiceImpl {
    fn port(&self) -> u16 {
        self.config.port
    }

    fn values(&self) -> &Config {
        &self.config
    }

    fn socializer(&self) -> Option<&serde_json::Value> {
        self.config.socializer.as_ref()
    }
}
