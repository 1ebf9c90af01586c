//! Column mapping engine
//!
//! Proposes how arbitrary CSV headers correspond to import target fields
//! (fixed core fields plus category attributes) and validates that every
//! required field is covered. Pure functions over their inputs, no I/O.
//!
//! Matching is done on a normalized form: lower-cased, trimmed, underscores
//! and internal whitespace removed, diacritics stripped via NFD decomposition
//! with combining marks dropped. "Año", "ano" and "A_no " all normalize to
//! the same key.

use serde::ser::{Serialize, SerializeMap, Serializer};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::types::{AttributeDef, CoreFieldDef, CORE_FIELDS};

/// Unified view of an import target the mapper can propose
#[derive(Debug, Clone, PartialEq)]
pub struct TargetField {
    pub id: String,
    pub label: String,
    pub csv_name: Option<String>,
    pub required: bool,
}

impl From<&CoreFieldDef> for TargetField {
    fn from(def: &CoreFieldDef) -> Self {
        TargetField {
            id: def.field_id(),
            label: def.name.to_string(),
            csv_name: Some(def.csv_name.to_string()),
            // SKU is the record identity, everything else core is optional
            required: def.id == "sku",
        }
    }
}

impl From<&AttributeDef> for TargetField {
    fn from(def: &AttributeDef) -> Self {
        TargetField {
            id: def.id.clone(),
            label: def.name.clone(),
            csv_name: def.csv_name.clone(),
            required: def.required,
        }
    }
}

/// Build the full target list for a category: core fields first, then the
/// category attributes in catalog order. This order is what makes `suggest`
/// deterministic.
pub fn target_fields(attributes: &[AttributeDef]) -> Vec<TargetField> {
    CORE_FIELDS
        .iter()
        .map(TargetField::from)
        .chain(attributes.iter().map(TargetField::from))
        .collect()
}

/// Ids of all required fields in a target list
pub fn required_field_ids(fields: &[TargetField]) -> Vec<String> {
    fields
        .iter()
        .filter(|f| f.required)
        .map(|f| f.id.clone())
        .collect()
}

/// Normalization applied to both CSV headers and field names before
/// comparison. Idempotent: normalizing an already-normalized string is a
/// no-op.
pub fn normalize(input: &str) -> String {
    input
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| *c != '_' && !c.is_whitespace())
        .collect()
}

/// One header's assignment within a mapping
#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
    pub header: String,
    /// Target field id, or `None` when the column is unmapped
    pub field_id: Option<String>,
}

/// Mapping from CSV headers to at most one target field each.
///
/// Invariant: a field id appears as a value for at most one header.
/// `suggest` enforces it at proposal time, `assign` re-establishes it on
/// manual edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMapping {
    entries: Vec<MappingEntry>,
}

impl ColumnMapping {
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Field ids currently claimed by some header
    pub fn mapped_field_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| e.field_id.as_deref())
    }

    /// Field id assigned to `header`, if the header exists and is mapped
    pub fn field_for(&self, header: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.header == header)
            .and_then(|e| e.field_id.as_deref())
    }

    /// Manually (re-)target a header. Any other header currently holding the
    /// same field is cleared first, so the one-to-one invariant survives
    /// user edits. Unknown headers are appended.
    pub fn assign(&mut self, header: &str, field_id: Option<String>) {
        if let Some(id) = field_id.as_deref() {
            for entry in &mut self.entries {
                if entry.header != header && entry.field_id.as_deref() == Some(id) {
                    entry.field_id = None;
                }
            }
        }
        match self.entries.iter_mut().find(|e| e.header == header) {
            Some(entry) => entry.field_id = field_id,
            None => self.entries.push(MappingEntry {
                header: header.to_string(),
                field_id,
            }),
        }
    }

    /// True iff every id in `required` appears as a value in this mapping.
    /// An empty required set is trivially covered.
    pub fn validate_required(&self, required: &[String]) -> bool {
        self.missing_required(required).is_empty()
    }

    /// Required ids not yet covered, in the order given
    pub fn missing_required(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|id| !self.mapped_field_ids().any(|m| m == id.as_str()))
            .cloned()
            .collect()
    }
}

// Wire format: a JSON object of header -> fieldId|null, exactly what the
// `columnMapping` multipart part carries.
impl Serialize for ColumnMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.header, &entry.field_id)?;
        }
        map.end()
    }
}

/// Propose a mapping for `headers` against `fields`.
///
/// For each header, pick the first field whose normalized `csv_name` (or
/// normalized label, when no `csv_name` is defined) equals the normalized
/// header. A field claimed by an earlier header is not eligible again.
/// Headers without a match stay unmapped; that is a valid outcome, not an
/// error.
pub fn suggest(headers: &[String], fields: &[TargetField]) -> ColumnMapping {
    let mut claimed: Vec<&str> = Vec::new();
    let entries = headers
        .iter()
        .map(|header| {
            let key = normalize(header);
            let matched = fields.iter().find(|field| {
                if claimed.iter().any(|c| *c == field.id) {
                    return false;
                }
                let candidate = field.csv_name.as_deref().unwrap_or(&field.label);
                normalize(candidate) == key
            });
            if let Some(field) = matched {
                claimed.push(&field.id);
            }
            MappingEntry {
                header: header.clone(),
                field_id: matched.map(|f| f.id.clone()),
            }
        })
        .collect();
    ColumnMapping { entries }
}
