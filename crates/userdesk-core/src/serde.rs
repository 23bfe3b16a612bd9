use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Reads an optional UUID where the API may send `""` for an unset relation.
pub fn deserialize_optional_uuid<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<Uuid>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(&s)
            .map(|id| Some(T::from(id)))
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Reads a status flag sent either as a boolean or as `"true"`/`"false"`/`0`/`1`.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => Ok(b),
        Raw::Int(0) => Ok(false),
        Raw::Int(1) => Ok(true),
        Raw::Int(other) => Err(serde::de::Error::custom(format!(
            "invalid status flag: {}",
            other
        ))),
        Raw::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid status flag: {}",
                other
            ))),
        },
    }
}
