use std::collections::BTreeMap;

use serde::Serialize;

/// Wire value type inside a response-shape constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaKind {
    String,
    Integer,
    Object,
    Array,
}

/// Structural contract a tutor response must satisfy.
///
/// Serializes to the `responseSchema` object the generation API expects;
/// required fields are listed per object node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    kind: SchemaKind,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, ResponseSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Box<ResponseSchema>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    required: Vec<String>,
}

impl ResponseSchema {
    #[must_use]
    pub fn string() -> Self {
        Self::leaf(SchemaKind::String)
    }

    #[must_use]
    pub fn integer() -> Self {
        Self::leaf(SchemaKind::Integer)
    }

    #[must_use]
    pub fn object<K, I>(properties: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ResponseSchema)>,
    {
        Self {
            kind: SchemaKind::Object,
            properties: properties
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
            items: None,
            required: Vec::new(),
        }
    }

    #[must_use]
    pub fn array(items: ResponseSchema) -> Self {
        Self {
            kind: SchemaKind::Array,
            properties: BTreeMap::new(),
            items: Some(Box::new(items)),
            required: Vec::new(),
        }
    }

    /// Mark fields of an object node as required.
    #[must_use]
    pub fn required<K, I>(mut self, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = K>,
    {
        self.required = fields.into_iter().map(Into::into).collect();
        self
    }

    fn leaf(kind: SchemaKind) -> Self {
        Self {
            kind,
            properties: BTreeMap::new(),
            items: None,
            required: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_schema_serializes_with_uppercase_types() {
        let schema = ResponseSchema::object([("paragraph", ResponseSchema::string())])
            .required(["paragraph"]);

        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["type"], "OBJECT");
        assert_eq!(json["properties"]["paragraph"]["type"], "STRING");
        assert_eq!(json["required"][0], "paragraph");
    }

    #[test]
    fn array_schema_nests_its_items() {
        let schema = ResponseSchema::array(
            ResponseSchema::object([
                ("english_word", ResponseSchema::string()),
                ("vietnamese_meaning", ResponseSchema::string()),
            ])
            .required(["english_word", "vietnamese_meaning"]),
        );

        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["type"], "ARRAY");
        assert_eq!(json["items"]["type"], "OBJECT");
        assert!(json.get("properties").is_none());
    }

    #[test]
    fn leaf_schema_omits_empty_collections() {
        let json = serde_json::to_value(ResponseSchema::integer()).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "INTEGER" }));
    }
}
