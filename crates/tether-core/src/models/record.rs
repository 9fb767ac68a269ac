use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Where an identity record originates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordSource {
    /// An account pulled from a provisioning connector.
    ConnectorAccount { connector_id: String },
    /// A canonical identity.
    Identity,
}

/// A stable reference to one identity record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef {
    pub source: RecordSource,
    pub id: String,
}

impl RecordRef {
    pub fn connector_account(connector_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            source: RecordSource::ConnectorAccount {
                connector_id: connector_id.into(),
            },
            id: id.into(),
        }
    }

    pub fn identity(id: impl Into<String>) -> Self {
        Self {
            source: RecordSource::Identity,
            id: id.into(),
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            RecordSource::ConnectorAccount { connector_id } => {
                write!(f, "account:{}/{}", connector_id, self.id)
            }
            RecordSource::Identity => write!(f, "identity:{}", self.id),
        }
    }
}

/// One identity record with its attribute map.
///
/// Records are fetched by the caller before evaluation begins; the scoring
/// path never performs I/O.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub record_ref: RecordRef,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    /// Deactivated records are skipped by correlation runs unless the
    /// threshold config opts them in.
    #[serde(default)]
    pub deactivated: bool,
}

impl Record {
    pub fn new(record_ref: RecordRef) -> Self {
        Self {
            record_ref,
            attributes: HashMap::new(),
            deactivated: false,
        }
    }

    /// Look up an attribute. A missing attribute is `None`, never an error —
    /// one malformed record must not block matching.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}
