use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub dir: Option<String>,

    #[serde(default = "default_console_format")]
    pub console_format: String,

    #[serde(default = "default_true")]
    pub file_enabled: bool,

    /// Per-target level overrides, e.g. `hyper:warn, config:error`.
    #[serde(default, deserialize_with = "deserialize_ext_level")]
    pub ext_level: Option<HashMap<String, String>>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: Some("./logs".to_string()),
            console_format: default_console_format(),
            file_enabled: default_true(),
            ext_level: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_console_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

fn deserialize_ext_level<'de, D>(
    deserializer: D,
) -> Result<Option<HashMap<String, String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;

    let mut map = HashMap::new();
    if let Some(s) = s {
        for pair in s.split([',', '\n']) {
            // Entries without a colon are silently dropped
            if let Some((target, level)) = pair.trim().split_once(':') {
                map.insert(target.trim().to_string(), level.trim().to_string());
            }
        }
    }

    if map.is_empty() { Ok(None) } else { Ok(Some(map)) }
}
