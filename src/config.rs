#[derive(Clone)]
pub struct Config {
    pub port: u16,

    // The plugin's slice of the host's general application configuration:
    // an arbitrary nested mapping under the `socializer` key, loaded from
    // SOCIALIZER_CONFIG (inline JSON) or SOCIALIZER_CONFIG_FILE (JSON file).
    pub socializer: Option<serde_json::Value>,
}
