use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawGraph {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub links: Vec<RawLink>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    /// Any JSON number; negative or fractional counts are dealt with during normalization.
    #[serde(default, rename = "transactionCount")]
    pub transaction_count: Option<f64>,
    #[serde(default)]
    pub party: Option<String>,
    /// Everything else, kept for the detail panel.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl RawNode {
    pub fn new(id: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group: group.into(),
            name: None,
            value: None,
            transaction_count: None,
            party: None,
            attributes: Map::new(),
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

/// A link endpoint may be a bare id or an already-resolved node object.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum LinkEndpoint {
    Id(String),
    Node { id: String },
}

impl LinkEndpoint {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Node { id } => id,
        }
    }
}

impl From<&str> for LinkEndpoint {
    fn from(id: &str) -> Self {
        Self::Id(id.to_owned())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawLink {
    pub source: LinkEndpoint,
    pub target: LinkEndpoint,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub count: Option<f64>,
}

impl RawLink {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: None,
            value: None,
            count: None,
        }
    }

    /// Stroke weight: `value` wins over `count`.
    pub fn weight(&self) -> Option<f64> {
        self.value.or(self.count).filter(|weight| weight.is_finite())
    }
}
