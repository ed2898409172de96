use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One artwork row. Only `creatorCountry` and `depicts` are interpreted;
/// every other field is carried along untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, deserialize_with = "lenient_string")]
    pub creator_country: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub depicts: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn new(country: &str, depicts: &[&str]) -> Self {
        Self {
            creator_country: Some(country.to_string()),
            depicts: depicts.iter().map(|tag| tag.to_string()).collect(),
            extra: Map::new(),
        }
    }

    pub fn country(&self) -> Option<&str> {
        self.creator_country.as_deref()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => Some(text),
        _ => None,
    })
}

// Missing, null or oddly-typed tags contribute nothing rather than failing the row.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(tag) => Some(tag),
                _ => None,
            })
            .collect(),
        Value::String(tag) => vec![tag],
        _ => Vec::new(),
    })
}
