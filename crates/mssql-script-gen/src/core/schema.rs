//! Catalog metadata types: tables, columns, indexes, constraints, modules and
//! user-defined types.
//!
//! These are immutable snapshots read from the catalog at the start of a
//! scripting pass and discarded at its end.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a catalog object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKind {
    Table,
    Index,
    ForeignKey,
    Check,
    Trigger,
    View,
    Procedure,
    Function,
    UserType,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObjectKind::Table => "table",
            ObjectKind::Index => "index",
            ObjectKind::ForeignKey => "foreign key",
            ObjectKind::Check => "check",
            ObjectKind::Trigger => "trigger",
            ObjectKind::View => "view",
            ObjectKind::Procedure => "procedure",
            ObjectKind::Function => "function",
            ObjectKind::UserType => "user type",
        };
        f.write_str(s)
    }
}

/// Common view over every scriptable catalog object.
pub trait CatalogObject {
    /// Object name, unqualified.
    fn name(&self) -> &str;

    /// Owning schema.
    fn schema(&self) -> &str;

    /// Object category.
    fn kind(&self) -> ObjectKind;

    /// Whether the engine owns this object. System objects are never scripted.
    fn is_system_object(&self) -> bool {
        false
    }

    /// `schema.name`, for logs and error messages.
    fn full_name(&self) -> String {
        format!("{}.{}", self.schema(), self.name())
    }
}

/// Ordinal ordering used for every emitted list: name first, schema second.
///
/// Byte-wise comparison keeps output independent of locale and collation.
pub fn ordinal_cmp<T: CatalogObject + ?Sized>(a: &T, b: &T) -> Ordering {
    a.name()
        .cmp(b.name())
        .then_with(|| a.schema().cmp(b.schema()))
}

/// Table metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Schema name.
    pub schema: String,

    /// Table name.
    pub name: String,

    /// Catalog object id, used by drivers to load child metadata.
    pub object_id: i32,

    /// Engine-owned table.
    pub is_system_object: bool,

    /// Column definitions in ordinal order.
    pub columns: Vec<Column>,

    /// Indexes, including primary-key and unique constraints.
    pub indexes: Vec<Index>,

    /// Foreign key constraints.
    pub foreign_keys: Vec<ForeignKey>,

    /// Check constraints.
    pub check_constraints: Vec<CheckConstraint>,
}

impl Table {
    /// Whether any column is an identity column.
    pub fn has_identity(&self) -> bool {
        self.columns.iter().any(|c| c.is_identity)
    }

    /// Columns carrying a default constraint.
    pub fn default_constraints(&self) -> impl Iterator<Item = (&Column, &DefaultConstraint)> {
        self.columns
            .iter()
            .filter_map(|c| c.default_constraint.as_ref().map(|d| (c, d)))
    }

    /// Columns whose values can be written back with an INSERT.
    ///
    /// Identity columns stay (IDENTITY_INSERT makes them writable);
    /// rowversion and computed columns are generated by the engine.
    pub fn insertable_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| !c.is_row_version() && !c.is_computed())
    }
}

impl CatalogObject for Table {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &str {
        &self.schema
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Table
    }

    fn is_system_object(&self) -> bool {
        self.is_system_object
    }
}

/// Column metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Data type (e.g., "int", "nvarchar", "datetime2").
    pub data_type: String,

    /// Maximum length in characters for string types, bytes for binary (-1 for max).
    pub max_length: i32,

    /// Numeric precision.
    pub precision: i32,

    /// Numeric scale, or fractional-second precision for time types.
    pub scale: i32,

    /// Whether the column allows NULL.
    pub is_nullable: bool,

    /// Whether the column is an identity column.
    pub is_identity: bool,

    /// Identity seed.
    pub identity_seed: i64,

    /// Identity increment.
    pub identity_increment: i64,

    /// Expression for computed columns.
    pub computed_definition: Option<String>,

    /// Whether a computed column is persisted.
    pub is_persisted: bool,

    /// Default constraint bound to this column.
    pub default_constraint: Option<DefaultConstraint>,

    /// Ordinal position (1-based).
    pub ordinal_pos: i32,
}

impl Column {
    /// `timestamp`/`rowversion` columns are engine-maintained.
    pub fn is_row_version(&self) -> bool {
        matches!(
            self.data_type.to_ascii_lowercase().as_str(),
            "timestamp" | "rowversion"
        )
    }

    /// Whether the column is computed.
    pub fn is_computed(&self) -> bool {
        self.computed_definition.is_some()
    }
}

/// Named default constraint on a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultConstraint {
    /// Constraint name.
    pub name: String,

    /// Default expression, as stored by the engine (e.g. `((0))`).
    pub definition: String,
}

/// One key column of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub name: String,
    pub descending: bool,
}

impl IndexColumn {
    /// Ascending key column.
    pub fn asc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descending: false,
        }
    }
}

/// Index metadata. Primary-key and unique constraints are indexes too.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Index {
    /// Index name.
    pub name: String,

    /// Schema of the owning table.
    pub schema: String,

    /// Owning table name.
    pub table: String,

    /// Key columns in key order.
    pub columns: Vec<IndexColumn>,

    /// Included columns (non-key).
    pub include_cols: Vec<String>,

    /// Whether the index is unique.
    pub is_unique: bool,

    /// Whether the index is clustered.
    pub is_clustered: bool,

    /// Backs the table's primary key.
    pub is_primary_key: bool,

    /// Backs a UNIQUE constraint.
    pub is_unique_constraint: bool,

    /// WHERE predicate of a filtered index.
    pub filter_definition: Option<String>,
}

impl Index {
    /// Whether this index is declared as a table constraint.
    pub fn is_constraint(&self) -> bool {
        self.is_primary_key || self.is_unique_constraint
    }
}

impl CatalogObject for Index {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &str {
        &self.schema
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Index
    }
}

/// Foreign key metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,

    /// Schema of the referencing table.
    pub schema: String,

    /// Referencing table name.
    pub table: String,

    /// Source column names.
    pub columns: Vec<String>,

    /// Referenced schema name.
    pub ref_schema: String,

    /// Referenced table name.
    pub ref_table: String,

    /// Referenced column names.
    pub ref_columns: Vec<String>,

    /// ON DELETE action as reported by the catalog (`NO_ACTION`, `CASCADE`, ...).
    pub on_delete: String,

    /// ON UPDATE action.
    pub on_update: String,
}

impl CatalogObject for ForeignKey {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &str {
        &self.schema
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::ForeignKey
    }
}

/// Check constraint metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConstraint {
    /// Constraint name.
    pub name: String,

    /// Schema of the owning table.
    pub schema: String,

    /// Owning table name.
    pub table: String,

    /// Constraint definition (SQL expression).
    pub definition: String,
}

impl CatalogObject for CheckConstraint {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &str {
        &self.schema
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Check
    }
}

/// Where a trigger is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerScope {
    /// DML trigger on a table or view.
    Table { schema: String, name: String },
    /// DDL trigger on the database.
    Database,
}

/// A SQL module: view, procedure, function or trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub name: String,

    pub schema: String,

    /// One of `View`, `Procedure`, `Function`, `Trigger`.
    pub kind: ObjectKind,

    pub is_system_object: bool,

    /// Module body. `None` when the module is encrypted.
    pub definition: Option<String>,

    /// `SET ANSI_NULLS` state the module was created with.
    pub uses_ansi_nulls: bool,

    /// `SET QUOTED_IDENTIFIER` state the module was created with.
    pub uses_quoted_identifier: bool,

    /// Attachment point; only set for triggers.
    pub trigger_scope: Option<TriggerScope>,
}

impl CatalogObject for Module {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &str {
        &self.schema
    }

    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn is_system_object(&self) -> bool {
        self.is_system_object
    }
}

/// Flavor of a user-defined type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UserTypeKind {
    /// CLR type backed by an assembly.
    Clr { assembly: String, class_name: String },
    /// Alias data type over a system type.
    Alias {
        base_type: String,
        max_length: i32,
        precision: i32,
        scale: i32,
        is_nullable: bool,
    },
    /// Table type.
    Table { columns: Vec<Column> },
}

/// User-defined type metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserType {
    pub name: String,
    pub schema: String,
    pub is_system_object: bool,
    pub kind: UserTypeKind,
}

impl CatalogObject for UserType {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &str {
        &self.schema
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::UserType
    }

    fn is_system_object(&self) -> bool {
        self.is_system_object
    }
}
