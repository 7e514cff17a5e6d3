//! In-memory entity metadata
//!
//! One [`EntityModel`] is built per `<Entity>` element of the metadata document,
//! holding its attributes as [`EntityField`]s in document order.

/// Effective `nvarchar` length when an attribute carries no usable `MaxLength`
pub const DEFAULT_MAX_LENGTH: i32 = 250;

/// Logical type tag that marks the primary key attribute
pub const PRIMARY_KEY_TYPE: &str = "primarykey";

/// `RequiredLevel` value that makes a column `NOT NULL`
pub const SYSTEM_REQUIRED: &str = "systemrequired";

/// A logical table description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityModel {
    /// Entity logical name, used verbatim as the SQL table name
    pub logical_name: String,
    /// Attributes in source document order
    pub fields: Vec<EntityField>,
}

/// A single column description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityField {
    /// Attribute logical name, used verbatim as the column name
    pub logical_name: String,
    /// Metadata type tag (`primarykey`, `nvarchar`, `int`, ...)
    pub field_type: String,
    /// `MaxLength` as found in the document, if present and numeric
    pub max_length: Option<i32>,
    /// `RequiredLevel` as found in the document
    pub required_level: Option<String>,
}

impl EntityModel {
    pub fn new(logical_name: impl Into<String>, fields: Vec<EntityField>) -> Self {
        Self {
            logical_name: logical_name.into(),
            fields,
        }
    }

    /// Resolve the primary key column.
    ///
    /// The metadata format does not forbid several `primarykey` attributes on one
    /// entity. When that happens the last one in document order wins and the
    /// earlier ones are reported at `warn` level.
    pub fn primary_key(&self) -> Option<&EntityField> {
        let mut candidates = self.fields.iter().filter(|f| f.is_primary_key());
        let first = candidates.next()?;
        let discarded = candidates.clone().count();
        let winner = candidates.last().unwrap_or(first);

        if discarded > 0 {
            log::warn!(
                "entity '{}' declares {} primary key attributes; using '{}'",
                self.logical_name,
                discarded + 1,
                winner.logical_name
            );
        }

        Some(winner)
    }
}

impl EntityField {
    pub fn new(logical_name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            logical_name: logical_name.into(),
            field_type: field_type.into(),
            max_length: None,
            required_level: None,
        }
    }

    pub fn with_max_length(mut self, max_length: i32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_required_level(mut self, required_level: impl Into<String>) -> Self {
        self.required_level = Some(required_level.into());
        self
    }

    /// `MaxLength`, or [`DEFAULT_MAX_LENGTH`] when the document had none
    pub fn effective_max_length(&self) -> i32 {
        self.max_length.unwrap_or(DEFAULT_MAX_LENGTH)
    }

    /// Exact, case-sensitive match on the `primarykey` tag
    pub fn is_primary_key(&self) -> bool {
        self.field_type == PRIMARY_KEY_TYPE
    }

    pub fn is_required(&self) -> bool {
        self.required_level.as_deref() == Some(SYSTEM_REQUIRED)
    }
}
