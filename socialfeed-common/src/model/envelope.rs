use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// The `{ success, error?, ...fields }` shape every mutating endpoint replies with.
///
/// The backend's error replies only carry `error`, so a missing `success` reads as `false`.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct ResultEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Settled<T> {
    Accepted(T),
    Rejected { reason: Option<String> },
}

impl ResultEnvelope {
    /// Decodes the action specific fields of an accepted envelope into `T`.
    pub fn settle<T: DeserializeOwned>(self) -> Result<Settled<T>, serde_json::Error> {
        if self.success {
            serde_json::from_value(Value::Object(self.fields)).map(Settled::Accepted)
        } else {
            Ok(Settled::Rejected {
                reason: self.error.filter(|error| !error.is_empty()),
            })
        }
    }
}

impl<T> Settled<T> {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Settled::Accepted(_))
    }
}
