//! SQL Server DDL generator for entity metadata.
//!
//! Produces one single-line `CREATE TABLE` statement per entity:
//!
//! ```text
//! CREATE TABLE account (accountid nvarchar(250) NULL, name nvarchar(100) NOT NULL, PRIMARY KEY (accountid));
//! ```

use crate::model::{EntityField, EntityModel, DEFAULT_MAX_LENGTH};
use std::fmt;

/// SQL Server column type produced from a logical metadata type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    NVarChar(i32),
    Int,
    DateTime,
    UniqueIdentifier,
}

impl SqlType {
    /// Map a field's logical type, ignoring case.
    ///
    /// Anything outside the lookup table, `primarykey` included, becomes
    /// `nvarchar(250)` regardless of the field's `MaxLength`.
    pub fn for_field(field: &EntityField) -> Self {
        match field.field_type.to_lowercase().as_str() {
            "nvarchar" => SqlType::NVarChar(field.effective_max_length()),
            "int" => SqlType::Int,
            "datetime" => SqlType::DateTime,
            "uniqueidentifier" => SqlType::UniqueIdentifier,
            _ => SqlType::NVarChar(DEFAULT_MAX_LENGTH),
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::NVarChar(len) => write!(f, "nvarchar({len})"),
            SqlType::Int => f.write_str("int"),
            SqlType::DateTime => f.write_str("datetime"),
            SqlType::UniqueIdentifier => f.write_str("uniqueidentifier"),
        }
    }
}

/// Render `<name> <type> <NULL|NOT NULL>` for one field
pub fn column_definition(field: &EntityField) -> String {
    let nullability = if field.is_required() { "NOT NULL" } else { "NULL" };
    format!(
        "{} {} {}",
        field.logical_name,
        SqlType::for_field(field),
        nullability
    )
}

/// Generate the `CREATE TABLE` statement for one entity
pub fn generate_create_table_sql(entity: &EntityModel) -> String {
    let mut sql = format!("CREATE TABLE {} (", entity.logical_name);

    let columns: Vec<String> = entity.fields.iter().map(column_definition).collect();
    sql.push_str(&columns.join(", "));

    if let Some(pk) = entity.primary_key() {
        sql.push_str(&format!(", PRIMARY KEY ({})", pk.logical_name));
    }

    sql.push_str(");");
    sql
}
