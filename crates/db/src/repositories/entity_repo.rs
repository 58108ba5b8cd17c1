//! Generic repository for schema-driven entities.
//!
//! One implementation serves every catalog entry: SQL text is assembled
//! from the static schema (table, column, and join identifiers are
//! compile-time constants), while every request-supplied value travels
//! as a bound parameter. Rows decode into JSON maps keyed by field name.

use chrono::NaiveDate;
use parc_core::schema::{
    BoundField, CreateRecord, DataType, EntitySchema, FieldDef, FieldValue, IdStrategy,
};
use parc_core::types::Timestamp;
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};

/// A record of a schema-driven entity, keyed by field name.
pub type JsonRecord = Map<String, Value>;

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// A primary key value, typed per the schema's id strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum IdValue {
    Int(i64),
    Key(String),
}

impl IdValue {
    /// Parse a raw path segment into an id for the given schema.
    ///
    /// A non-numeric id for an auto-keyed entity cannot match any row, so
    /// `None` maps to a not-found outcome upstream.
    pub fn parse(schema: &EntitySchema, raw: &str) -> Option<IdValue> {
        match schema.id {
            IdStrategy::Auto => raw.parse::<i64>().ok().map(IdValue::Int),
            IdStrategy::ClientKey => Some(IdValue::Key(raw.to_string())),
        }
    }
}

impl std::fmt::Display for IdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdValue::Int(v) => write!(f, "{v}"),
            IdValue::Key(k) => f.write_str(k),
        }
    }
}

/// Provides CRUD operations for any catalog entity.
pub struct EntityRepo;

impl EntityRepo {
    /// List all records: id + display fields + joined labels.
    pub async fn list(
        pool: &PgPool,
        schema: &'static EntitySchema,
    ) -> Result<Vec<JsonRecord>, sqlx::Error> {
        let cols: Vec<&'static FieldDef> = schema
            .display_fields()
            .filter(|f| f.data_type != DataType::Password)
            .collect();
        let sql = format!(
            "SELECT t.id{}{} FROM {} t{} ORDER BY t.id",
            column_list(&cols),
            join_select(schema),
            schema.table,
            join_clause(schema),
        );
        let rows = sqlx::query(&sql).fetch_all(pool).await?;
        rows.iter()
            .map(|row| row_to_json(schema, row, &cols, false))
            .collect()
    }

    /// Fetch one record by id: all fields + joined labels + timestamps.
    pub async fn find_by_id(
        pool: &PgPool,
        schema: &'static EntitySchema,
        id: &IdValue,
    ) -> Result<Option<JsonRecord>, sqlx::Error> {
        let cols: Vec<&'static FieldDef> = schema
            .fields
            .iter()
            .filter(|f| f.data_type != DataType::Password)
            .collect();
        let sql = format!(
            "SELECT t.id{}, t.created_at, t.updated_at{} FROM {} t{} WHERE t.id = $1",
            column_list(&cols),
            join_select(schema),
            schema.table,
            join_clause(schema),
        );
        let row = bind_id(sqlx::query(&sql), id).fetch_optional(pool).await?;
        row.map(|r| row_to_json(schema, &r, &cols, true)).transpose()
    }

    /// Insert a validated record, returning the (assigned or supplied) id.
    pub async fn insert(
        pool: &PgPool,
        schema: &'static EntitySchema,
        record: &CreateRecord,
    ) -> Result<IdValue, sqlx::Error> {
        let mut columns: Vec<&str> = Vec::new();
        if record.client_key.is_some() {
            columns.push("id");
        }
        for bound in &record.fields {
            columns.push(bound.field.name);
        }
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING id",
            schema.table,
            columns.join(", "),
            placeholders.join(", "),
        );

        let mut query = sqlx::query(&sql);
        if let Some(key) = &record.client_key {
            query = query.bind(key.clone());
        }
        for bound in &record.fields {
            query = bind_field(query, bound);
        }
        let row = query.fetch_one(pool).await?;

        match schema.id {
            IdStrategy::Auto => Ok(IdValue::Int(row.try_get("id")?)),
            IdStrategy::ClientKey => Ok(IdValue::Key(row.try_get("id")?)),
        }
    }

    /// Apply a partial update. Returns `false` if no row with `id` exists.
    pub async fn update(
        pool: &PgPool,
        schema: &'static EntitySchema,
        id: &IdValue,
        fields: &[BoundField],
    ) -> Result<bool, sqlx::Error> {
        if fields.is_empty() {
            return Self::exists(pool, schema, id).await;
        }
        let sets: Vec<String> = fields
            .iter()
            .enumerate()
            .map(|(i, bound)| format!("{} = ${}", bound.field.name, i + 2))
            .collect();
        let sql = format!(
            "UPDATE {} SET {}, updated_at = NOW() WHERE id = $1",
            schema.table,
            sets.join(", "),
        );
        let mut query = bind_id(sqlx::query(&sql), id);
        for bound in fields {
            query = bind_field(query, bound);
        }
        Ok(query.execute(pool).await?.rows_affected() > 0)
    }

    /// Hard-delete a record. Returns `false` if no row with `id` exists.
    pub async fn delete(
        pool: &PgPool,
        schema: &'static EntitySchema,
        id: &IdValue,
    ) -> Result<bool, sqlx::Error> {
        let sql = format!("DELETE FROM {} WHERE id = $1", schema.table);
        let result = bind_id(sqlx::query(&sql), id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check whether a record exists.
    pub async fn exists(
        pool: &PgPool,
        schema: &'static EntitySchema,
        id: &IdValue,
    ) -> Result<bool, sqlx::Error> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            schema.table
        );
        let query = sqlx::query_scalar::<_, bool>(&sql);
        let query = match id {
            IdValue::Int(v) => query.bind(*v),
            IdValue::Key(k) => query.bind(k.clone()),
        };
        query.fetch_one(pool).await
    }
}

// ---------------------------------------------------------------------------
// SQL assembly helpers
// ---------------------------------------------------------------------------

fn column_list(cols: &[&'static FieldDef]) -> String {
    cols.iter()
        .map(|f| format!(", t.{}", f.name))
        .collect::<String>()
}

fn join_select(schema: &EntitySchema) -> String {
    schema
        .joins
        .iter()
        .enumerate()
        .map(|(i, j)| format!(", j{i}.{} AS {}", j.label_column, j.alias))
        .collect::<String>()
}

fn join_clause(schema: &EntitySchema) -> String {
    schema
        .joins
        .iter()
        .enumerate()
        .map(|(i, j)| {
            let fk_type = schema
                .field(j.fk_field)
                .map(|f| f.data_type)
                .unwrap_or(DataType::Text);
            // Numeric reference fields are float8; cast the joined id side.
            match fk_type {
                DataType::Number => format!(
                    " LEFT JOIN {} j{i} ON j{i}.id::float8 = t.{}",
                    j.table, j.fk_field
                ),
                _ => format!(" LEFT JOIN {} j{i} ON j{i}.id = t.{}", j.table, j.fk_field),
            }
        })
        .collect::<String>()
}

// ---------------------------------------------------------------------------
// Binding and decoding
// ---------------------------------------------------------------------------

fn bind_id<'q>(query: PgQuery<'q>, id: &IdValue) -> PgQuery<'q> {
    match id {
        IdValue::Int(v) => query.bind(*v),
        IdValue::Key(k) => query.bind(k.clone()),
    }
}

fn bind_field<'q>(query: PgQuery<'q>, bound: &BoundField) -> PgQuery<'q> {
    match &bound.value {
        FieldValue::Text(s) => query.bind(s.clone()),
        FieldValue::Number(n) => query.bind(*n),
        FieldValue::Boolean(b) => query.bind(*b),
        FieldValue::Date(d) => query.bind(*d),
        FieldValue::Null => match bound.field.data_type {
            DataType::Text | DataType::Password | DataType::Enum => {
                query.bind(Option::<String>::None)
            }
            DataType::Number => query.bind(Option::<f64>::None),
            DataType::Boolean => query.bind(Option::<bool>::None),
            DataType::Date => query.bind(Option::<NaiveDate>::None),
        },
    }
}

fn row_to_json(
    schema: &'static EntitySchema,
    row: &PgRow,
    fields: &[&'static FieldDef],
    include_timestamps: bool,
) -> Result<JsonRecord, sqlx::Error> {
    let mut record = JsonRecord::new();

    let id = match schema.id {
        IdStrategy::Auto => Value::from(row.try_get::<i64, _>("id")?),
        IdStrategy::ClientKey => Value::from(row.try_get::<String, _>("id")?),
    };
    record.insert("id".to_string(), id);

    for field in fields {
        let value = match field.data_type {
            DataType::Text | DataType::Enum => row
                .try_get::<Option<String>, _>(field.name)?
                .map(Value::from)
                .unwrap_or(Value::Null),
            DataType::Number => row
                .try_get::<Option<f64>, _>(field.name)?
                .map(number_to_json)
                .unwrap_or(Value::Null),
            DataType::Boolean => row
                .try_get::<Option<bool>, _>(field.name)?
                .map(Value::from)
                .unwrap_or(Value::Null),
            DataType::Date => row
                .try_get::<Option<NaiveDate>, _>(field.name)?
                .map(|d| Value::from(d.format("%Y-%m-%d").to_string()))
                .unwrap_or(Value::Null),
            // Write-only: never selected, never emitted.
            DataType::Password => Value::Null,
        };
        if field.data_type != DataType::Password {
            record.insert(field.name.to_string(), value);
        }
    }

    for join in schema.joins {
        let label = row.try_get::<Option<String>, _>(join.alias)?;
        record.insert(
            join.alias.to_string(),
            label.map(Value::from).unwrap_or(Value::Null),
        );
    }

    if include_timestamps {
        for col in ["created_at", "updated_at"] {
            let ts = row.try_get::<Option<Timestamp>, _>(col)?;
            record.insert(
                col.to_string(),
                ts.map(|t| Value::from(t.to_rfc3339())).unwrap_or(Value::Null),
            );
        }
    }

    Ok(record)
}

/// Emit integral floats as JSON integers so created values compare equal
/// on read-back (`12` stays `12`, not `12.0`).
fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parc_core::catalog;

    #[test]
    fn test_number_to_json_integral() {
        assert_eq!(number_to_json(12.0), Value::from(12i64));
        assert_eq!(number_to_json(-3.0), Value::from(-3i64));
    }

    #[test]
    fn test_number_to_json_fractional() {
        assert_eq!(number_to_json(48.5), Value::from(48.5));
    }

    #[test]
    fn test_id_parse_auto_rejects_non_numeric() {
        assert_eq!(IdValue::parse(&catalog::AC, "abc"), None);
        assert_eq!(IdValue::parse(&catalog::AC, "7"), Some(IdValue::Int(7)));
    }

    #[test]
    fn test_id_parse_client_key_passes_through() {
        assert_eq!(
            IdValue::parse(&catalog::TDL, "T9"),
            Some(IdValue::Key("T9".to_string()))
        );
    }

    #[test]
    fn test_join_clause_casts_numeric_references() {
        let sql = join_clause(&catalog::AC);
        assert!(sql.contains("LEFT JOIN fabricant j0 ON j0.id::float8 = t.fabricant_id"));
        assert!(sql.contains("LEFT JOIN fournisseurs j1 ON j1.id::float8 = t.fournisseur_id"));
    }

    #[test]
    fn test_join_select_aliases_labels() {
        let sql = join_select(&catalog::AC);
        assert!(sql.contains("j0.nom AS fabricant_nom"));
        assert!(sql.contains("j1.nom AS fournisseur_nom"));
    }
}
