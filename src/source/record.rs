use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A PO line payload recovered from the log.
///
/// The JSON object is kept exactly as parsed and sent back unmodified; only
/// the `id` is pulled out so the endpoint path can be built.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    id: String,
    fields: Map<String, Value>,
}

impl OrderLine {
    /// Wrap a parsed object. Returns `None` when there is no usable `id`.
    pub fn from_object(fields: Map<String, Value>) -> Option<Self> {
        let id = match fields.get("id")? {
            Value::String(id) if !id.is_empty() => id.clone(),
            Value::Number(id) => id.to_string(),
            _ => return None,
        };
        Some(Self { id, fields })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl Serialize for OrderLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
