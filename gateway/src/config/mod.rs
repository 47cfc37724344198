use serde::{Deserialize, Serialize};

use crate::api::config::ApiConfig;
use crate::preferences::PreferencesConfig;
use crate::tracker::TrackerConfig;
use crate::utils::logger::LoggerConfig;

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,

    pub tracker: TrackerConfig,

    pub preferences: PreferencesConfig,

    pub logger: LoggerConfig,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.api, ApiConfig::default());
        assert_eq!(config.tracker, TrackerConfig::default());
        assert_eq!(config.preferences, PreferencesConfig::default());
        assert_eq!(config.api.listen_addr.port(), 3000);
        assert_eq!(config.api.allow_origin, "http://localhost:8080");
        assert!(!config.api.legacy_status_codes);
    }

    #[test]
    fn partial_config_overrides_only_given_fields() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "api": { "legacy_status_codes": true },
                "tracker": { "timeout": "3s" },
                "preferences": { "path": "/var/lib/fleet/settings.json" }
            }"#,
        )
        .unwrap();

        assert!(config.api.legacy_status_codes);
        assert_eq!(config.api.request_timeout, Duration::from_secs(25));
        assert_eq!(config.tracker.timeout, Duration::from_secs(3));
        assert_eq!(config.tracker.url, TrackerConfig::default().url);
        assert_eq!(
            config.preferences.path.to_str(),
            Some("/var/lib/fleet/settings.json")
        );
    }
}
