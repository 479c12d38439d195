//! Event-exposure subscription resource.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An event-exposure subscription document.
///
/// The members are owned by the business logic; this layer only requires
/// the body to be a JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EeSubscription(pub Map<String, Value>);

impl EeSubscription {
    pub const SUBSCRIPTION_ID: &'static str = "subscriptionId";
    pub const CALLBACK_REFERENCE: &'static str = "callbackReference";

    pub fn get(&self, member: &str) -> Option<&Value> {
        self.0.get(member)
    }

    pub fn subscription_id(&self) -> Option<&str> {
        self.0.get(Self::SUBSCRIPTION_ID).and_then(Value::as_str)
    }

    pub fn set_subscription_id(&mut self, id: impl Into<String>) {
        self.0
            .insert(Self::SUBSCRIPTION_ID.to_string(), Value::String(id.into()));
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for EeSubscription {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}
