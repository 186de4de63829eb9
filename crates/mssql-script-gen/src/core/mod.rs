//! Core abstractions shared by the scripting engine and the drivers.
//!
//! - [`schema`]: table, column, constraint, module and user-type metadata
//! - [`value`]: SQL values read during value export
//! - [`traits`]: catalog, row source and statement generator seams
//! - [`identifier`]: identifier validation and quoting

pub mod identifier;
pub mod schema;
pub mod traits;
pub mod value;

// Re-export commonly used types for convenience
pub use schema::{
    ordinal_cmp, CatalogObject, CheckConstraint, Column, DefaultConstraint, ForeignKey, Index,
    IndexColumn, Module, ObjectKind, Table, TriggerScope, UserType, UserTypeKind,
};
pub use traits::{Catalog, RowSink, RowSource, ScriptGenerator, ScriptOptions};
pub use value::SqlValue;
