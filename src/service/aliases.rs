use std::collections::BTreeMap;
use std::env;

/// Expands symbolic tokens the host platform allows inside stored URLs:
/// `@alias` path tokens and `$ENV_VAR` placeholders. Unresolvable tokens
/// pass through unchanged.
pub trait AliasResolver: Send + Sync {
    /// Replaces a leading `@alias` token. An alias value may itself contain
    /// an env placeholder, so callers resolve again after trimming.
    fn resolve_alias(&self, value: &str) -> String;
    /// Replaces a string of the form `$NAME` with the environment variable's
    /// value when set.
    fn parse_env(&self, value: &str) -> String;
}

/// Aliases registered from `SITE_ALIAS_<NAME>` environment variables:
/// `SITE_ALIAS_WEB=https://example.com` makes `@web` resolvable.
pub struct EnvAliasResolver {
    aliases: BTreeMap<String, String>,
}

impl EnvAliasResolver {
    pub fn new() -> Self {
        let mut aliases = BTreeMap::new();
        for (key, value) in env::vars() {
            if let Some(name) = key.strip_prefix("SITE_ALIAS_") {
                if !name.is_empty() && !value.trim().is_empty() {
                    aliases.insert(name.to_ascii_lowercase(), value.trim().to_string());
                }
            }
        }
        Self { aliases }
    }

    pub fn with_aliases(aliases: BTreeMap<String, String>) -> Self {
        Self { aliases }
    }
}

impl AliasResolver for EnvAliasResolver {
    fn resolve_alias(&self, value: &str) -> String {
        let Some(rest) = value.strip_prefix('@') else {
            return value.to_string();
        };
        let name_len = rest
            .find(|ch: char| !ch.is_ascii_alphanumeric() && ch != '_')
            .unwrap_or(rest.len());
        let name = rest[..name_len].to_ascii_lowercase();
        match self.aliases.get(&name) {
            Some(expansion) => format!("{}{}", expansion, &rest[name_len..]),
            None => value.to_string(),
        }
    }

    fn parse_env(&self, value: &str) -> String {
        let Some(name) = value.strip_prefix('$') else {
            return value.to_string();
        };
        if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
            return value.to_string();
        }
        env::var(name).unwrap_or_else(|_| value.to_string())
    }
}
