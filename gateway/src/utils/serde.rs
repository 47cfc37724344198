use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

/// Reads a JSON file, reporting the path of the offending field on errors.
pub fn load_json_from_file<T, P>(path: P) -> Result<T>
where
    for<'de> T: Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let de = &mut serde_json::Deserializer::from_str(&data);
    serde_path_to_error::deserialize(de).map_err(Into::into)
}

/// Decodes an explicit `null` as the default value.
///
/// Combine with `#[serde(default)]` to treat missing and `null` fields alike.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Decodes the first JSON value of `data`, ignoring whatever follows it.
pub fn decode_first<T>(data: &[u8]) -> serde_json::Result<T>
where
    for<'de> T: Deserialize<'de>,
{
    match serde_json::Deserializer::from_slice(data).into_iter::<T>().next() {
        Some(value) => value,
        None => Err(serde::de::Error::custom("EOF while parsing a value")),
    }
}
