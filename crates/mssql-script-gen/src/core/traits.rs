//! Core traits at the seams between the scripting engine and a database.
//!
//! - [`Catalog`]: enumerates schema objects with their metadata
//! - [`RowSource`]: executes a read query and streams rows into a [`RowSink`]
//! - [`ScriptGenerator`]: turns one object into statement texts
//!
//! The orchestrator only talks to these traits, so the scripting and
//! ordering logic can be tested against an in-memory catalog.

use async_trait::async_trait;

use crate::config::TargetVersion;
use crate::error::Result;

use super::schema::{CheckConstraint, ForeignKey, Index, Module, Table, UserType};
use super::value::SqlValue;

/// Read schema objects from a database.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Major version of the connected server (9 = SQL Server 2005).
    async fn server_major_version(&self) -> Result<u8>;

    /// All tables, system tables included, without child metadata.
    async fn tables(&self) -> Result<Vec<Table>>;

    /// Load full metadata for a table.
    ///
    /// Template method: calls the individual loaders in dependency order.
    async fn load_table_metadata(&self, table: &mut Table) -> Result<()> {
        self.load_columns(table).await?;
        self.load_indexes(table).await?;
        self.load_foreign_keys(table).await?;
        self.load_check_constraints(table).await?;
        Ok(())
    }

    /// Load columns, with identity and default-constraint metadata.
    async fn load_columns(&self, table: &mut Table) -> Result<()>;

    /// Load indexes, including primary-key and unique constraints.
    async fn load_indexes(&self, table: &mut Table) -> Result<()>;

    /// Load foreign key metadata for a table.
    async fn load_foreign_keys(&self, table: &mut Table) -> Result<()>;

    /// Load check constraint metadata for a table.
    async fn load_check_constraints(&self, table: &mut Table) -> Result<()>;

    /// DML triggers attached to one table.
    async fn table_triggers(&self, table: &Table) -> Result<Vec<Module>>;

    /// DDL triggers on the database. Only meaningful from SQL Server 2005 on.
    async fn database_triggers(&self) -> Result<Vec<Module>>;

    async fn views(&self) -> Result<Vec<Module>>;

    async fn procedures(&self) -> Result<Vec<Module>>;

    /// Scalar, inline and multi-statement table-valued functions.
    async fn functions(&self) -> Result<Vec<Module>>;

    /// CLR types, alias data types and table types.
    async fn user_types(&self) -> Result<Vec<UserType>>;
}

/// Receives the rows of one query, in order.
pub trait RowSink {
    /// Called once, before any row, with the result column names.
    fn columns(&mut self, names: &[String]) -> Result<()>;

    /// Called once per row.
    fn row(&mut self, values: &[SqlValue<'_>]) -> Result<()>;
}

/// Execute read queries.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Run `sql` and feed every row to `sink`, returning the row count.
    ///
    /// The underlying result stream is released on every exit path,
    /// including a sink error.
    async fn read_rows(&self, sql: &str, sink: &mut (dyn RowSink + Send)) -> Result<u64>;
}

/// Immutable options for one emission phase.
///
/// Each phase builds its own snapshot; nothing is toggled between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Dialect version the output must conform to.
    pub target_version: TargetVersion,

    /// Emit default constraints after CREATE TABLE.
    pub with_defaults: bool,

    /// Validate existing rows when adding FOREIGN KEY and CHECK constraints.
    pub with_check: bool,

    /// Prefix module bodies with their ANSI_NULLS/QUOTED_IDENTIFIER settings.
    pub with_session_settings: bool,
}

impl ScriptOptions {
    /// CREATE TABLE plus default constraints.
    pub fn table_phase(target_version: TargetVersion) -> Self {
        Self {
            target_version,
            with_defaults: true,
            with_check: false,
            with_session_settings: false,
        }
    }

    /// Indexes, foreign keys and checks.
    pub fn constraint_phase(target_version: TargetVersion) -> Self {
        Self {
            target_version,
            with_defaults: false,
            with_check: true,
            with_session_settings: false,
        }
    }

    /// Views, procedures, functions and triggers.
    pub fn module(target_version: TargetVersion) -> Self {
        Self {
            target_version,
            with_defaults: false,
            with_check: false,
            with_session_settings: true,
        }
    }

    pub fn user_type(target_version: TargetVersion) -> Self {
        Self {
            target_version,
            with_defaults: false,
            with_check: false,
            with_session_settings: false,
        }
    }
}

/// Dialect-aware statement text generation.
///
/// Every method returns the statements for one object, in execution order,
/// without batch separators. An empty vector means "nothing to emit".
pub trait ScriptGenerator: Send + Sync {
    /// CREATE TABLE, followed by default constraints when requested.
    fn script_table(&self, table: &Table, opts: &ScriptOptions) -> Result<Vec<String>>;

    /// PRIMARY KEY / UNIQUE constraint or CREATE INDEX.
    fn script_index(&self, table: &Table, index: &Index, opts: &ScriptOptions)
        -> Result<Vec<String>>;

    fn script_foreign_key(
        &self,
        table: &Table,
        fk: &ForeignKey,
        opts: &ScriptOptions,
    ) -> Result<Vec<String>>;

    fn script_check(
        &self,
        table: &Table,
        check: &CheckConstraint,
        opts: &ScriptOptions,
    ) -> Result<Vec<String>>;

    /// Module body, preceded by its session settings when requested.
    fn script_module(&self, module: &Module, opts: &ScriptOptions) -> Result<Vec<String>>;

    fn script_user_type(&self, user_type: &UserType, opts: &ScriptOptions) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_snapshots_are_independent() {
        let v = TargetVersion::Version100;
        let table = ScriptOptions::table_phase(v);
        let constraint = ScriptOptions::constraint_phase(v);
        let module = ScriptOptions::module(v);

        assert!(table.with_defaults && !table.with_check);
        assert!(!constraint.with_defaults && constraint.with_check);
        assert!(module.with_session_settings);
        assert!(!ScriptOptions::user_type(v).with_session_settings);
        assert_eq!(module.target_version, v);
    }
}
