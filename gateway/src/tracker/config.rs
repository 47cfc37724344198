use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Device list endpoint of the OneStepGPS public API.
    pub url: String,

    /// How long to wait for the tracker before giving up on a request.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            url: "https://track.onestepgps.com/v3/api/public/device".to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}
