pub mod devices;
pub mod preferences;
