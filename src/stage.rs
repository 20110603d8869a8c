use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Server-assigned identifier of a stage record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct StageId(pub i64);

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for StageId {
    fn from(id: i64) -> Self {
        StageId(id)
    }
}

/// Label to URL mapping, kept in insertion order for display.
pub type StageUrls = IndexMap<String, String>;

/// A stage record as returned by `GET /stages`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Stage {
    pub id: StageId,
    pub stage_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stages: StageUrls,
}

impl Stage {
    /// `label: url` lines in insertion order.
    pub fn url_lines(&self) -> Vec<String> {
        self.stages
            .iter()
            .map(|(label, url)| format!("{}: {}", label, url))
            .collect()
    }
}

/// Request body for create and update.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StageData {
    pub stage_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stages: StageUrls,
}

impl StageData {
    pub fn new(stage_name: impl Into<String>, stages: StageUrls) -> Self {
        StageData {
            stage_name: stage_name.into(),
            stages,
        }
    }
}

/// Decodes a `GET /stages` body. The service encodes an empty table as `null`.
pub fn decode_stage_list(body: &[u8]) -> serde_json::Result<Vec<Stage>> {
    let stages: Option<Vec<Stage>> = serde_json::from_slice(body)?;
    Ok(stages.unwrap_or_default())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<StageUrls, D::Error>
where
    D: Deserializer<'de>,
{
    let urls: Option<StageUrls> = Option::deserialize(deserializer)?;
    Ok(urls.unwrap_or_default())
}
