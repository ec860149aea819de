//! The `{version: ..}` / `{versions: [..]}` wire shape used by transport
//! formats (YAML recipes, JSON config) that want an object rather than a
//! bare string. Kept as its own newtype so the in-memory [`VersionValue`]
//! can keep serializing as a plain string everywhere else.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::VersionValue;
use crate::error::Error;

/// Wraps a [`VersionValue`] for the `{version}` / `{versions}` mapping
/// transport shape described by the crate's serialization contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedForm(pub VersionValue);

impl Serialize for SerializedForm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        if let Some(point) = self.0.concrete() {
            let mut out = serializer.serialize_struct("SerializedForm", 1)?;
            out.serialize_field("version", &point.to_string())?;
            return out.end();
        }

        let elements: Vec<String> = match &self.0 {
            VersionValue::List(list) => list.elements().iter().map(ToString::to_string).collect(),
            other => vec![other.to_string()],
        };
        let mut out = serializer.serialize_struct("SerializedForm", 1)?;
        out.serialize_field("versions", &elements)?;
        out.end()
    }
}

impl<'de> Deserialize<'de> for SerializedForm {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let object = value
            .as_object()
            .ok_or_else(|| serde::de::Error::custom(Error::UnknownSerializedShape))?;

        if let Some(serde_json::Value::String(s)) = object.get("version") {
            return s
                .parse::<VersionValue>()
                .map(SerializedForm)
                .map_err(serde::de::Error::custom);
        }

        if let Some(serde_json::Value::Array(items)) = object.get("versions") {
            let values: Result<Vec<VersionValue>, Error> = items
                .iter()
                .map(|item| {
                    item.as_str()
                        .ok_or(Error::UnknownSerializedShape)
                        .and_then(|s| s.parse::<VersionValue>().map_err(Error::from))
                })
                .collect();
            return values
                .map(|vs| SerializedForm(vs.into_iter().collect()))
                .map_err(serde::de::Error::custom);
        }

        Err(serde::de::Error::custom(Error::UnknownSerializedShape))
    }
}

#[cfg(test)]
mod test {
    use super::SerializedForm;
    use crate::value::VersionValue;

    #[test]
    fn concrete_value_serializes_with_version_key() {
        let form = SerializedForm("1.2.3".parse::<VersionValue>().unwrap());
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json, serde_json::json!({"version": "1.2.3"}));
    }

    #[test]
    fn list_serializes_with_versions_key() {
        let form = SerializedForm("1.0:2.0,3.0".parse::<VersionValue>().unwrap());
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json, serde_json::json!({"versions": ["1.0:2.0", "3.0"]}));
    }

    #[test]
    fn round_trips_through_json() {
        let form = SerializedForm("1.0:2.0,3.0".parse::<VersionValue>().unwrap());
        let json = serde_json::to_value(&form).unwrap();
        let back: SerializedForm = serde_json::from_value(json).unwrap();
        assert_eq!(back, form);
    }

    #[test]
    fn rejects_unknown_shape() {
        let json = serde_json::json!({"nope": 1});
        assert!(serde_json::from_value::<SerializedForm>(json).is_err());
    }
}
