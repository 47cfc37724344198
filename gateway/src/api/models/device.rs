use serde::{Deserialize, Serialize};

use crate::utils::serde::null_as_default;

/// Device list as returned by the tracker, trimmed to the fields the dashboard uses.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceListResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub result_list: Vec<Device>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Device {
    #[serde(deserialize_with = "null_as_default")]
    pub device_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub latest_device_point: DevicePoint,
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    /// Passed through as is, e.g. `active` or `inactive`.
    #[serde(deserialize_with = "null_as_default")]
    pub active_state: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevicePoint {
    #[serde(deserialize_with = "null_as_default")]
    pub lat: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub lng: f64,
}
