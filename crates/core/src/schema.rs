//! Declarative entity schemas.
//!
//! An [`EntitySchema`] describes one manageable resource: its storage
//! table, URL path segment, id strategy, ordered field list, the subset
//! of fields shown by list endpoints, and the joined display labels
//! (e.g. a manufacturer name resolved from a reference field).
//!
//! Payload validation lives here too: incoming JSON maps are checked
//! field by field (required-ness, type, enum membership, unknown keys)
//! and converted into typed [`FieldValue`]s ready for parameter binding.
//! Table and column identifiers only ever come from the static
//! [`catalog`](crate::catalog) declarations, never from request input.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

/// Wire-level data type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Text,
    Number,
    Boolean,
    Date,
    /// Closed set of allowed string values, listed in `FieldDef::options`.
    Enum,
    /// Write-only text: accepted on input, never selected back out.
    Password,
}

/// One field of an entity schema. `name` doubles as the column name.
#[derive(Debug)]
pub struct FieldDef {
    pub name: &'static str,
    pub data_type: DataType,
    pub required: bool,
    /// Allowed values for `DataType::Enum` fields; empty otherwise.
    pub options: &'static [&'static str],
}

/// How an entity's primary key is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// BIGSERIAL, assigned by the database on insert.
    Auto,
    /// Client-supplied TEXT key (site codes such as `T1`, `T2`).
    ClientKey,
}

/// A derived display column resolved by LEFT JOIN on a reference field.
#[derive(Debug)]
pub struct JoinSpec {
    /// Reference field on this entity (e.g. `fabricant_id`).
    pub fk_field: &'static str,
    /// Joined table (e.g. `fabricant`).
    pub table: &'static str,
    /// Column on the joined table to surface (e.g. `nom`).
    pub label_column: &'static str,
    /// Output column name (e.g. `fabricant_nom`).
    pub alias: &'static str,
}

/// Declarative description of one manageable resource.
#[derive(Debug)]
pub struct EntitySchema {
    /// Display name used in error messages ("TDL", "AC", ...).
    pub name: &'static str,
    /// Storage table.
    pub table: &'static str,
    /// URL path segment under `/api`.
    pub path: &'static str,
    pub id: IdStrategy,
    pub fields: &'static [FieldDef],
    /// Ordered subset of field names shown by list endpoints.
    pub display: &'static [&'static str],
    pub joins: &'static [JoinSpec],
}

impl EntitySchema {
    /// Look up a field by payload key.
    ///
    /// Matching is case-insensitive: legacy clients send mixed-case keys
    /// (`Contact`), which normalize to the canonical lowercase name.
    pub fn field(&self, key: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(key))
    }

    /// Fields named by `display`, in display order.
    pub fn display_fields(&self) -> impl Iterator<Item = &'static FieldDef> + '_ {
        self.display.iter().filter_map(|name| self.field(name))
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A payload value converted to its typed form, ready for binding.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
    /// Explicit JSON null on an optional field.
    Null,
}

/// A validated (field, value) pair.
#[derive(Debug)]
pub struct BoundField {
    pub field: &'static FieldDef,
    pub value: FieldValue,
}

/// The validated outcome of a create payload.
#[derive(Debug)]
pub struct CreateRecord {
    /// Client-supplied key for `IdStrategy::ClientKey` entities.
    pub client_key: Option<String>,
    pub fields: Vec<BoundField>,
}

/// Validate a create payload against the schema.
///
/// Required fields must be present and non-null; `ClientKey` entities
/// must supply a non-empty string `id`. Unknown keys are rejected.
pub fn validate_create(
    schema: &'static EntitySchema,
    payload: &Map<String, Value>,
) -> Result<CreateRecord, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut fields = Vec::new();
    let mut client_key = None;

    for (key, value) in payload {
        if key.eq_ignore_ascii_case("id") {
            match schema.id {
                IdStrategy::ClientKey => match value.as_str() {
                    Some(s) if !s.trim().is_empty() => client_key = Some(s.to_string()),
                    _ => errors.push(FieldError::new("id", "must be a non-empty string")),
                },
                IdStrategy::Auto => {
                    errors.push(FieldError::new("id", "is server-assigned"));
                }
            }
            continue;
        }

        match schema.field(key) {
            Some(field) => match coerce(field, value) {
                Ok(v) => fields.push(BoundField { field, value: v }),
                Err(message) => errors.push(FieldError::new(field.name, message)),
            },
            None => errors.push(FieldError::new(key.clone(), "unknown field")),
        }
    }

    for field in schema.fields {
        if !field.required {
            continue;
        }
        let provided = fields
            .iter()
            .any(|b| b.field.name == field.name && b.value != FieldValue::Null);
        if !provided {
            errors.push(FieldError::new(field.name, "is required"));
        }
    }

    if schema.id == IdStrategy::ClientKey && client_key.is_none() {
        if !errors.iter().any(|e| e.field == "id") {
            errors.push(FieldError::new("id", "is required"));
        }
    }

    if errors.is_empty() {
        Ok(CreateRecord { client_key, fields })
    } else {
        Err(errors)
    }
}

/// Validate an update payload against the schema.
///
/// All fields are optional, but provided values must type-check and
/// required fields may not be nulled out. The id is immutable.
pub fn validate_update(
    schema: &'static EntitySchema,
    payload: &Map<String, Value>,
) -> Result<Vec<BoundField>, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut fields = Vec::new();

    for (key, value) in payload {
        if key.eq_ignore_ascii_case("id") {
            errors.push(FieldError::new("id", "cannot be modified"));
            continue;
        }

        match schema.field(key) {
            Some(field) => match coerce(field, value) {
                Ok(FieldValue::Null) if field.required => {
                    errors.push(FieldError::new(field.name, "is required"));
                }
                Ok(v) => fields.push(BoundField { field, value: v }),
                Err(message) => errors.push(FieldError::new(field.name, message)),
            },
            None => errors.push(FieldError::new(key.clone(), "unknown field")),
        }
    }

    if errors.is_empty() {
        Ok(fields)
    } else {
        Err(errors)
    }
}

/// Convert a JSON value to the field's typed form.
fn coerce(field: &FieldDef, value: &Value) -> Result<FieldValue, String> {
    if value.is_null() {
        return Ok(FieldValue::Null);
    }

    match field.data_type {
        DataType::Text | DataType::Password => value
            .as_str()
            .map(|s| FieldValue::Text(s.to_string()))
            .ok_or_else(|| "must be a string".to_string()),

        DataType::Number => value
            .as_f64()
            .map(FieldValue::Number)
            .ok_or_else(|| "must be a number".to_string()),

        DataType::Boolean => value
            .as_bool()
            .map(FieldValue::Boolean)
            .ok_or_else(|| "must be a boolean".to_string()),

        DataType::Date => {
            let s = value.as_str().ok_or("must be a date string")?;
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(FieldValue::Date)
                .map_err(|_| "must be a date in YYYY-MM-DD format".to_string())
        }

        DataType::Enum => {
            let s = value.as_str().ok_or("must be a string")?;
            if field.options.contains(&s) {
                Ok(FieldValue::Text(s.to_string()))
            } else {
                Err(format!("must be one of: {}", field.options.join(", ")))
            }
        }
    }
}
