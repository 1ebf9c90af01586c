//! Attribute catalog types for CSV import targets
//!
//! A category defines a dynamic set of typed attributes; on top of those the
//! importer always offers a fixed set of core fields (SKU, name, ...). Core
//! field ids carry a `core:` prefix so they can never collide with attribute
//! ids coming from the category service.

use serde::{Deserialize, Serialize};

/// Prefix distinguishing core field ids from category attribute ids
pub const CORE_FIELD_PREFIX: &str = "core:";

/// Where an attribute applies within the catalog model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeScope {
    Product,
    Variant,
    Reference,
    Application,
}

/// A category-defined import target, supplied by the category service.
/// Immutable once fetched for a given category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDef {
    pub id: String,
    pub name: String,
    /// Preferred CSV header for this attribute, when the category defines one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_name: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub scope: AttributeScope,
}

/// A fixed, non-category import target (e.g. SKU)
#[derive(Debug, Clone, Copy)]
pub struct CoreFieldDef {
    pub id: &'static str,
    pub name: &'static str,
    pub csv_name: &'static str,
}

impl CoreFieldDef {
    /// Prefixed id used as the mapping target, e.g. `core:sku`
    pub fn field_id(&self) -> String {
        format!("{}{}", CORE_FIELD_PREFIX, self.id)
    }
}

/// Core fields offered for every category, in the order the mapper
/// considers them (before any category attribute)
pub const CORE_FIELDS: &[CoreFieldDef] = &[
    CoreFieldDef { id: "sku", name: "SKU", csv_name: "sku" },
    CoreFieldDef { id: "name", name: "Name", csv_name: "name" },
    CoreFieldDef { id: "description", name: "Description", csv_name: "description" },
    CoreFieldDef { id: "brand", name: "Brand", csv_name: "brand" },
    CoreFieldDef { id: "price", name: "Price", csv_name: "price" },
];

/// A single attribute value on a record.
///
/// Modeled as a sum type so "exactly one representation or none" is a
/// structural guarantee rather than four optional fields plus a convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AttributeValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Date(chrono::NaiveDate),
    Empty,
}

impl AttributeValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, AttributeValue::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_def_deserializes_from_camel_case() {
        let json = r#"{"id":"a1","name":"Voltage","csvName":"voltage_v","required":true,"scope":"product"}"#;
        let def: AttributeDef = serde_json::from_str(json).unwrap();

        assert_eq!(def.id, "a1");
        assert_eq!(def.csv_name.as_deref(), Some("voltage_v"));
        assert!(def.required);
        assert_eq!(def.scope, AttributeScope::Product);
    }

    #[test]
    fn test_attribute_def_csv_name_is_optional() {
        let json = r#"{"id":"a2","name":"Material","scope":"variant"}"#;
        let def: AttributeDef = serde_json::from_str(json).unwrap();

        assert!(def.csv_name.is_none());
        assert!(!def.required);
    }

    #[test]
    fn test_core_field_id_is_prefixed() {
        let sku = &CORE_FIELDS[0];
        assert_eq!(sku.field_id(), "core:sku");
    }

    #[test]
    fn test_core_field_ids_are_unique() {
        let mut ids: Vec<String> = CORE_FIELDS.iter().map(|f| f.field_id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), CORE_FIELDS.len());
    }

    #[test]
    fn test_attribute_value_tagged_serialization() {
        let value = AttributeValue::Number(12.5);
        let json = serde_json::to_string(&value).unwrap();
        assert!(json.contains("number"));
        assert!(json.contains("12.5"));

        let back: AttributeValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_attribute_value_empty() {
        let value = AttributeValue::Empty;
        assert!(value.is_empty());
        assert!(!AttributeValue::Text("x".into()).is_empty());
    }
}
