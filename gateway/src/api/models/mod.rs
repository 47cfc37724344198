pub mod device;
pub mod preferences;
