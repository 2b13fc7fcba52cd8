use serde::de::DeserializeOwned;

use crate::config_schema::SchemaError;

fn at_path(err: serde_path_to_error::Error<serde_json::Error>) -> SchemaError {
    let path = err.path().to_string();
    SchemaError::Json { path, message: err.into_inner().to_string() }
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, SchemaError> {
    let mut de = serde_json::Deserializer::from_str(src);
    let value = serde_path_to_error::deserialize(&mut de).map_err(at_path)?;
    de.end()
        .map_err(|err| SchemaError::Json { path: ".".to_string(), message: err.to_string() })?;
    Ok(value)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SchemaError> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut de).map_err(at_path)?;
    de.end()
        .map_err(|err| SchemaError::Json { path: ".".to_string(), message: err.to_string() })?;
    Ok(value)
}
