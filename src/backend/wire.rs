use serde::{Deserialize, Deserializer, Serialize};

use crate::model::ClusterId;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub links: Vec<RawLink>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_cluster_id")]
    pub cluster: Option<ClusterId>,
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default)]
    pub z: Option<f32>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawLink {
    #[serde(alias = "source_id")]
    pub source: String,
    #[serde(alias = "target_id")]
    pub target: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClusterRecord {
    #[serde(deserialize_with = "strict_cluster_id")]
    pub id: ClusterId,
    pub name: String,
    #[serde(default)]
    pub node_count: usize,
    #[serde(default)]
    pub nodes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EditRequest {
    pub node_id: String,
    pub code: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ImpactResponse {
    pub status: String,
    #[serde(default)]
    pub affected_nodes: Vec<String>,
}

impl ImpactResponse {
    pub const UPDATED: &'static str = "UPDATED";

    pub fn is_updated(&self) -> bool {
        self.status == Self::UPDATED
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct QueryResponse {
    pub response: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawClusterId {
    Number(u32),
    Text(String),
}

impl RawClusterId {
    fn parse(self) -> Option<ClusterId> {
        match self {
            Self::Number(value) => Some(ClusterId(value)),
            Self::Text(text) => text.parse().ok(),
        }
    }
}

fn strict_cluster_id<'de, D>(deserializer: D) -> Result<ClusterId, D::Error>
where
    D: Deserializer<'de>,
{
    RawClusterId::deserialize(deserializer)?
        .parse()
        .ok_or_else(|| serde::de::Error::custom("cluster id must be a non-negative integer"))
}

/// Node cluster references are display hints; anything unparseable is treated
/// as "no cluster" rather than failing the whole snapshot.
fn lenient_cluster_id<'de, D>(deserializer: D) -> Result<Option<ClusterId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| RawClusterId::deserialize(value).ok()?.parse()))
}
