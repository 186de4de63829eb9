//! In-memory catalog and row source for engine tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use regex::Regex;

use crate::core::{
    Catalog, CatalogObject, Column, Module, ObjectKind, RowSink, RowSource, SqlValue, Table,
    TriggerScope, UserType,
};
use crate::error::{Result, ScriptGenError};

/// Bare catalog object for selection and ordering tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaObject {
    pub name: String,
    pub schema: String,
    pub kind: ObjectKind,
    pub is_system_object: bool,
}

impl CatalogObject for SchemaObject {
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

/// Catalog backed by vectors. `tables()` hands out tables without child
/// metadata; the `load_*` methods copy it from the stored definitions.
#[derive(Default)]
pub struct MemoryCatalog {
    pub major_version: u8,
    pub tables: Vec<Table>,
    pub table_triggers: Vec<Module>,
    pub database_triggers: Vec<Module>,
    pub views: Vec<Module>,
    pub procedures: Vec<Module>,
    pub functions: Vec<Module>,
    pub user_types: Vec<UserType>,
    /// Category whose enumeration fails.
    pub fail_on: Option<ObjectKind>,
    /// Named result sets, keyed by lowercase table name.
    pub rows: HashMap<String, (Vec<String>, Vec<Vec<SqlValue<'static>>>)>,
    /// Every query passed to `read_rows`.
    pub queries: Mutex<Vec<String>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            major_version: 15,
            ..Default::default()
        }
    }

    pub fn with_rows(
        mut self,
        table: &str,
        columns: &[&str],
        rows: Vec<Vec<SqlValue<'static>>>,
    ) -> Self {
        self.rows.insert(
            table.to_lowercase(),
            (columns.iter().map(|c| c.to_string()).collect(), rows),
        );
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    fn check(&self, kind: ObjectKind) -> Result<()> {
        if self.fail_on == Some(kind) {
            return Err(ScriptGenError::catalog(kind.to_string(), "simulated failure"));
        }
        Ok(())
    }

    fn stored(&self, table: &Table) -> Result<&Table> {
        self.tables
            .iter()
            .find(|t| t.schema == table.schema && t.name == table.name)
            .ok_or_else(|| ScriptGenError::catalog(table.name.clone(), "no such table"))
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn server_major_version(&self) -> Result<u8> {
        Ok(self.major_version)
    }

    async fn tables(&self) -> Result<Vec<Table>> {
        self.check(ObjectKind::Table)?;
        Ok(self
            .tables
            .iter()
            .map(|t| Table {
                schema: t.schema.clone(),
                name: t.name.clone(),
                object_id: t.object_id,
                is_system_object: t.is_system_object,
                ..Default::default()
            })
            .collect())
    }

    async fn load_columns(&self, table: &mut Table) -> Result<()> {
        table.columns = self.stored(table)?.columns.clone();
        Ok(())
    }

    async fn load_indexes(&self, table: &mut Table) -> Result<()> {
        self.check(ObjectKind::Index)?;
        table.indexes = self.stored(table)?.indexes.clone();
        Ok(())
    }

    async fn load_foreign_keys(&self, table: &mut Table) -> Result<()> {
        table.foreign_keys = self.stored(table)?.foreign_keys.clone();
        Ok(())
    }

    async fn load_check_constraints(&self, table: &mut Table) -> Result<()> {
        table.check_constraints = self.stored(table)?.check_constraints.clone();
        Ok(())
    }

    async fn table_triggers(&self, table: &Table) -> Result<Vec<Module>> {
        self.check(ObjectKind::Trigger)?;
        Ok(self
            .table_triggers
            .iter()
            .filter(|m| {
                matches!(&m.trigger_scope,
                    Some(TriggerScope::Table { schema, name })
                        if *schema == table.schema && *name == table.name)
            })
            .cloned()
            .collect())
    }

    async fn database_triggers(&self) -> Result<Vec<Module>> {
        Ok(self.database_triggers.clone())
    }

    async fn views(&self) -> Result<Vec<Module>> {
        self.check(ObjectKind::View)?;
        Ok(self.views.clone())
    }

    async fn procedures(&self) -> Result<Vec<Module>> {
        self.check(ObjectKind::Procedure)?;
        Ok(self.procedures.clone())
    }

    async fn functions(&self) -> Result<Vec<Module>> {
        self.check(ObjectKind::Function)?;
        Ok(self.functions.clone())
    }

    async fn user_types(&self) -> Result<Vec<UserType>> {
        self.check(ObjectKind::UserType)?;
        Ok(self.user_types.clone())
    }
}

#[async_trait]
impl RowSource for MemoryCatalog {
    /// Understands `select [top N] ... from [table] ...`. A table without
    /// registered rows fails like an invalid object name would.
    async fn read_rows(&self, sql: &str, sink: &mut (dyn RowSink + Send)) -> Result<u64> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(sql.to_string());
        }

        let re = Regex::new(r"^select (?:top (\d+) )?.*? from (?:\[[^\]]+\]\.)?\[([^\]]+)\]")
            .map_err(|e| ScriptGenError::Config(e.to_string()))?;
        let caps = re
            .captures(sql)
            .ok_or_else(|| ScriptGenError::Config(format!("unexpected query: {}", sql)))?;
        let limit = caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok());
        let table = caps[2].to_lowercase();

        let (columns, rows) = self.rows.get(&table).ok_or_else(|| {
            ScriptGenError::Config(format!("Invalid object name '{}'", &caps[2]))
        })?;

        sink.columns(columns)?;
        let mut count = 0u64;
        for row in rows.iter().take(limit.unwrap_or(usize::MAX)) {
            sink.row(row)?;
            count += 1;
        }
        Ok(count)
    }
}

pub fn column(name: &str, data_type: &str) -> Column {
    Column {
        name: name.to_string(),
        data_type: data_type.to_string(),
        is_nullable: true,
        ..Default::default()
    }
}

pub fn identity_column(name: &str) -> Column {
    Column {
        name: name.to_string(),
        data_type: "int".to_string(),
        is_identity: true,
        identity_seed: 1,
        identity_increment: 1,
        ..Default::default()
    }
}

pub fn table(name: &str, columns: Vec<Column>) -> Table {
    Table {
        schema: "dbo".to_string(),
        name: name.to_string(),
        columns,
        ..Default::default()
    }
}

pub fn module(kind: ObjectKind, name: &str, body: &str) -> Module {
    Module {
        name: name.to_string(),
        schema: "dbo".to_string(),
        kind,
        is_system_object: false,
        definition: Some(body.to_string()),
        uses_ansi_nulls: true,
        uses_quoted_identifier: true,
        trigger_scope: None,
    }
}

pub fn table_trigger(table: &str, name: &str, body: &str) -> Module {
    Module {
        trigger_scope: Some(TriggerScope::Table {
            schema: "dbo".to_string(),
            name: table.to_string(),
        }),
        ..module(ObjectKind::Trigger, name, body)
    }
}
