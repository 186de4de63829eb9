//! Catalog and row access over a live SQL Server connection.
//!
//! Metadata comes from the `sys.*` catalog views, so the source server must
//! be SQL Server 2005 or later. Columns that only exist from 2008 on are
//! selected conditionally on the server version.

use std::borrow::Cow;
use std::collections::HashMap;

use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use futures::TryStreamExt;
use rust_decimal::Decimal;
use tiberius::{ColumnData, FromSql, Query, QueryItem, Row};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::ConnectionSettings;
use crate::core::identifier::qualify_mssql;
use crate::core::{
    Catalog, CatalogObject, CheckConstraint, Column, DefaultConstraint, ForeignKey, Index,
    IndexColumn, Module, ObjectKind, RowSink, RowSource, SqlValue, Table, TriggerScope, UserType,
    UserTypeKind,
};
use crate::error::{Result, ScriptGenError};

use super::connection::{connect_pool, TiberiusConnectionManager};

/// Objects shipped by Microsoft, plus the database diagram support objects
/// that SSMS marks with an extended property.
const IS_SYSTEM_OBJECT: &str = "CAST(CASE WHEN o.is_ms_shipped = 1 OR EXISTS (\
     SELECT 1 FROM sys.extended_properties ep \
     WHERE ep.class = 1 AND ep.major_id = o.object_id AND ep.minor_id = 0 \
     AND ep.name = N'microsoft_database_tools_support') THEN 1 ELSE 0 END AS BIT)";

/// First SQL Server major version with filtered indexes and table types.
const SQL2008_MAJOR: u8 = 10;

/// SQL Server catalog reader.
pub struct MssqlCatalog {
    pool: Pool<TiberiusConnectionManager>,
    major_version: OnceCell<u8>,
}

impl MssqlCatalog {
    /// Connect to the configured database.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self> {
        Ok(Self {
            pool: connect_pool(settings).await?,
            major_version: OnceCell::new(),
        })
    }

    async fn get_client(&self) -> Result<PooledConnection<'_, TiberiusConnectionManager>> {
        self.pool
            .get()
            .await
            .map_err(|e| ScriptGenError::pool(e, "getting MSSQL connection from pool"))
    }

    /// Run a catalog query, optionally bound to one object id, and collect
    /// its first result set.
    async fn fetch(&self, what: &str, sql: &str, object_id: Option<i32>) -> Result<Vec<Row>> {
        let mut client = self.get_client().await?;

        let mut query = Query::new(sql);
        if let Some(id) = object_id {
            query.bind(id);
        }

        let stream = query
            .query(&mut client)
            .await
            .map_err(|e| ScriptGenError::catalog(what, e))?;
        stream
            .into_first_result()
            .await
            .map_err(|e| ScriptGenError::catalog(what, e))
    }

    async fn at_least_2008(&self) -> Result<bool> {
        Ok(self.server_major_version().await? >= SQL2008_MAJOR)
    }

    async fn columns_of(&self, what: &str, object_id: i32) -> Result<Vec<Column>> {
        let query = r#"
            SELECT
                c.name,
                ty.name,
                CAST(ty.is_user_defined AS BIT),
                SCHEMA_NAME(ty.schema_id),
                CAST(CASE WHEN ty.name IN ('nchar', 'nvarchar') AND c.max_length > 0
                     THEN c.max_length / 2 ELSE c.max_length END AS INT),
                CAST(c.precision AS INT),
                CAST(c.scale AS INT),
                c.is_nullable,
                c.is_identity,
                CAST(ISNULL(ic.seed_value, 0) AS BIGINT),
                CAST(ISNULL(ic.increment_value, 0) AS BIGINT),
                cc.definition,
                CAST(ISNULL(cc.is_persisted, 0) AS BIT),
                dc.name,
                dc.definition,
                c.column_id
            FROM sys.columns c
            JOIN sys.types ty ON c.user_type_id = ty.user_type_id
            LEFT JOIN sys.identity_columns ic
                ON ic.object_id = c.object_id AND ic.column_id = c.column_id
            LEFT JOIN sys.computed_columns cc
                ON cc.object_id = c.object_id AND cc.column_id = c.column_id
            LEFT JOIN sys.default_constraints dc
                ON dc.parent_object_id = c.object_id AND dc.parent_column_id = c.column_id
            WHERE c.object_id = @P1
            ORDER BY c.column_id
        "#;

        let rows = self.fetch(what, query, Some(object_id)).await?;
        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let type_name = row.get::<&str, _>(1).unwrap_or_default();
            let data_type = if row.get::<bool, _>(2).unwrap_or(false) {
                qualify_mssql(row.get::<&str, _>(3).unwrap_or("dbo"), type_name)?
            } else {
                type_name.to_string()
            };

            let default_constraint = match (row.get::<&str, _>(13), row.get::<&str, _>(14)) {
                (Some(name), Some(definition)) => Some(DefaultConstraint {
                    name: name.to_string(),
                    definition: definition.to_string(),
                }),
                _ => None,
            };

            columns.push(Column {
                name: row.get::<&str, _>(0).unwrap_or_default().to_string(),
                data_type,
                max_length: row.get::<i32, _>(4).unwrap_or(0),
                precision: row.get::<i32, _>(5).unwrap_or(0),
                scale: row.get::<i32, _>(6).unwrap_or(0),
                is_nullable: row.get::<bool, _>(7).unwrap_or(true),
                is_identity: row.get::<bool, _>(8).unwrap_or(false),
                identity_seed: row.get::<i64, _>(9).unwrap_or(0),
                identity_increment: row.get::<i64, _>(10).unwrap_or(0),
                computed_definition: row.get::<&str, _>(11).map(String::from),
                is_persisted: row.get::<bool, _>(12).unwrap_or(false),
                default_constraint,
                ordinal_pos: row.get::<i32, _>(15).unwrap_or(0),
            });
        }
        Ok(columns)
    }

    /// Views, procedures and functions of the given `sys.objects` types.
    async fn modules(&self, kind: ObjectKind, types: &str) -> Result<Vec<Module>> {
        let query = format!(
            r#"
            SELECT
                o.name,
                SCHEMA_NAME(o.schema_id),
                {is_system},
                m.definition,
                CAST(ISNULL(m.uses_ansi_nulls, 1) AS BIT),
                CAST(ISNULL(m.uses_quoted_identifier, 1) AS BIT)
            FROM sys.objects o
            LEFT JOIN sys.sql_modules m ON m.object_id = o.object_id
            WHERE o.type IN ({types})
            "#,
            is_system = IS_SYSTEM_OBJECT,
            types = types
        );

        let rows = self.fetch(&format!("{}s", kind), &query, None).await?;
        let modules: Vec<Module> = rows
            .iter()
            .map(|row| Module {
                name: row.get::<&str, _>(0).unwrap_or_default().to_string(),
                schema: row.get::<&str, _>(1).unwrap_or_default().to_string(),
                kind,
                is_system_object: row.get::<bool, _>(2).unwrap_or(false),
                definition: row.get::<&str, _>(3).map(String::from),
                uses_ansi_nulls: row.get::<bool, _>(4).unwrap_or(true),
                uses_quoted_identifier: row.get::<bool, _>(5).unwrap_or(true),
                trigger_scope: None,
            })
            .collect();

        debug!("Found {} {}s", modules.len(), kind);
        Ok(modules)
    }

    async fn triggers(
        &self,
        what: &str,
        filter: &str,
        object_id: Option<i32>,
        scope: impl Fn() -> (String, TriggerScope),
    ) -> Result<Vec<Module>> {
        let query = format!(
            r#"
            SELECT
                o.name,
                {is_system},
                m.definition,
                CAST(ISNULL(m.uses_ansi_nulls, 1) AS BIT),
                CAST(ISNULL(m.uses_quoted_identifier, 1) AS BIT)
            FROM sys.triggers o
            LEFT JOIN sys.sql_modules m ON m.object_id = o.object_id
            WHERE {filter}
            "#,
            is_system = IS_SYSTEM_OBJECT,
            filter = filter
        );

        let rows = self.fetch(what, &query, object_id).await?;
        Ok(rows
            .iter()
            .map(|row| {
                let (schema, trigger_scope) = scope();
                Module {
                    name: row.get::<&str, _>(0).unwrap_or_default().to_string(),
                    schema,
                    kind: ObjectKind::Trigger,
                    is_system_object: row.get::<bool, _>(1).unwrap_or(false),
                    definition: row.get::<&str, _>(2).map(String::from),
                    uses_ansi_nulls: row.get::<bool, _>(3).unwrap_or(true),
                    uses_quoted_identifier: row.get::<bool, _>(4).unwrap_or(true),
                    trigger_scope: Some(trigger_scope),
                }
            })
            .collect())
    }
}

#[async_trait]
impl Catalog for MssqlCatalog {
    async fn server_major_version(&self) -> Result<u8> {
        self.major_version
            .get_or_try_init(|| async {
                let rows = self
                    .fetch(
                        "server version",
                        "SELECT CAST(SERVERPROPERTY('ProductVersion') AS NVARCHAR(128))",
                        None,
                    )
                    .await?;
                let version = rows
                    .first()
                    .and_then(|r| r.get::<&str, _>(0))
                    .unwrap_or_default();
                let major = parse_major_version(version).ok_or_else(|| {
                    ScriptGenError::catalog("server version", format!("unrecognized '{}'", version))
                })?;
                info!("Source server version {} (major {})", version, major);
                Ok(major)
            })
            .await
            .copied()
    }

    async fn tables(&self) -> Result<Vec<Table>> {
        let query = format!(
            r#"
            SELECT
                SCHEMA_NAME(o.schema_id),
                o.name,
                o.object_id,
                {is_system}
            FROM sys.tables o
            ORDER BY SCHEMA_NAME(o.schema_id), o.name
            "#,
            is_system = IS_SYSTEM_OBJECT
        );

        let rows = self.fetch("tables", &query, None).await?;
        let tables: Vec<Table> = rows
            .iter()
            .map(|row| Table {
                schema: row.get::<&str, _>(0).unwrap_or_default().to_string(),
                name: row.get::<&str, _>(1).unwrap_or_default().to_string(),
                object_id: row.get::<i32, _>(2).unwrap_or(0),
                is_system_object: row.get::<bool, _>(3).unwrap_or(false),
                ..Default::default()
            })
            .collect();

        debug!("Found {} tables", tables.len());
        Ok(tables)
    }

    async fn load_columns(&self, table: &mut Table) -> Result<()> {
        table.columns = self.columns_of(&table.full_name(), table.object_id).await?;
        debug!(
            "Loaded {} columns for {}",
            table.columns.len(),
            table.full_name()
        );
        Ok(())
    }

    async fn load_indexes(&self, table: &mut Table) -> Result<()> {
        let filter = if self.at_least_2008().await? {
            "i.filter_definition"
        } else {
            "CAST(NULL AS NVARCHAR(MAX))"
        };
        let query = format!(
            r#"
            SELECT
                i.index_id,
                i.name,
                i.is_unique,
                CAST(CASE WHEN i.type = 1 THEN 1 ELSE 0 END AS BIT),
                i.is_primary_key,
                i.is_unique_constraint,
                {filter}
            FROM sys.indexes i
            WHERE i.object_id = @P1
              AND i.type IN (1, 2)
              AND i.is_hypothetical = 0
            "#,
            filter = filter
        );
        let column_query = r#"
            SELECT
                ic.index_id,
                c.name,
                ic.is_descending_key,
                ic.is_included_column
            FROM sys.index_columns ic
            JOIN sys.columns c ON c.object_id = ic.object_id AND c.column_id = ic.column_id
            WHERE ic.object_id = @P1
            ORDER BY ic.index_id, ic.is_included_column, ic.key_ordinal, ic.index_column_id
        "#;

        let what = table.full_name();
        let rows = self.fetch(&what, &query, Some(table.object_id)).await?;
        let column_rows = self.fetch(&what, column_query, Some(table.object_id)).await?;

        let mut keys: HashMap<i32, (Vec<IndexColumn>, Vec<String>)> = HashMap::new();
        for row in &column_rows {
            let entry = keys.entry(row.get::<i32, _>(0).unwrap_or(0)).or_default();
            let name = row.get::<&str, _>(1).unwrap_or_default().to_string();
            if row.get::<bool, _>(3).unwrap_or(false) {
                entry.1.push(name);
            } else {
                entry.0.push(IndexColumn {
                    name,
                    descending: row.get::<bool, _>(2).unwrap_or(false),
                });
            }
        }

        table.indexes = rows
            .iter()
            .map(|row| {
                let (columns, include_cols) = keys
                    .remove(&row.get::<i32, _>(0).unwrap_or(0))
                    .unwrap_or_default();
                Index {
                    name: row.get::<&str, _>(1).unwrap_or_default().to_string(),
                    schema: table.schema.clone(),
                    table: table.name.clone(),
                    columns,
                    include_cols,
                    is_unique: row.get::<bool, _>(2).unwrap_or(false),
                    is_clustered: row.get::<bool, _>(3).unwrap_or(false),
                    is_primary_key: row.get::<bool, _>(4).unwrap_or(false),
                    is_unique_constraint: row.get::<bool, _>(5).unwrap_or(false),
                    filter_definition: row.get::<&str, _>(6).map(String::from),
                }
            })
            .collect();

        debug!(
            "Loaded {} indexes for {}",
            table.indexes.len(),
            table.full_name()
        );
        Ok(())
    }

    async fn load_foreign_keys(&self, table: &mut Table) -> Result<()> {
        let query = r#"
            SELECT
                fk.object_id,
                fk.name,
                OBJECT_SCHEMA_NAME(fk.referenced_object_id),
                OBJECT_NAME(fk.referenced_object_id),
                fk.delete_referential_action_desc,
                fk.update_referential_action_desc
            FROM sys.foreign_keys fk
            WHERE fk.parent_object_id = @P1
        "#;
        let column_query = r#"
            SELECT
                fkc.constraint_object_id,
                pc.name,
                rc.name
            FROM sys.foreign_key_columns fkc
            JOIN sys.columns pc
                ON pc.object_id = fkc.parent_object_id AND pc.column_id = fkc.parent_column_id
            JOIN sys.columns rc
                ON rc.object_id = fkc.referenced_object_id AND rc.column_id = fkc.referenced_column_id
            WHERE fkc.parent_object_id = @P1
            ORDER BY fkc.constraint_object_id, fkc.constraint_column_id
        "#;

        let what = table.full_name();
        let rows = self.fetch(&what, query, Some(table.object_id)).await?;
        let column_rows = self.fetch(&what, column_query, Some(table.object_id)).await?;

        let mut pairs: HashMap<i32, (Vec<String>, Vec<String>)> = HashMap::new();
        for row in &column_rows {
            let entry = pairs.entry(row.get::<i32, _>(0).unwrap_or(0)).or_default();
            entry.0.push(row.get::<&str, _>(1).unwrap_or_default().to_string());
            entry.1.push(row.get::<&str, _>(2).unwrap_or_default().to_string());
        }

        table.foreign_keys = rows
            .iter()
            .map(|row| {
                let (columns, ref_columns) = pairs
                    .remove(&row.get::<i32, _>(0).unwrap_or(0))
                    .unwrap_or_default();
                ForeignKey {
                    name: row.get::<&str, _>(1).unwrap_or_default().to_string(),
                    schema: table.schema.clone(),
                    table: table.name.clone(),
                    columns,
                    ref_schema: row.get::<&str, _>(2).unwrap_or_default().to_string(),
                    ref_table: row.get::<&str, _>(3).unwrap_or_default().to_string(),
                    ref_columns,
                    on_delete: row.get::<&str, _>(4).unwrap_or("NO_ACTION").to_string(),
                    on_update: row.get::<&str, _>(5).unwrap_or("NO_ACTION").to_string(),
                }
            })
            .collect();

        debug!(
            "Loaded {} foreign keys for {}",
            table.foreign_keys.len(),
            table.full_name()
        );
        Ok(())
    }

    async fn load_check_constraints(&self, table: &mut Table) -> Result<()> {
        let query = r#"
            SELECT
                cc.name,
                cc.definition
            FROM sys.check_constraints cc
            WHERE cc.parent_object_id = @P1
              AND cc.is_disabled = 0
        "#;

        let rows = self
            .fetch(&table.full_name(), query, Some(table.object_id))
            .await?;
        table.check_constraints = rows
            .iter()
            .map(|row| CheckConstraint {
                name: row.get::<&str, _>(0).unwrap_or_default().to_string(),
                schema: table.schema.clone(),
                table: table.name.clone(),
                definition: row.get::<&str, _>(1).unwrap_or_default().to_string(),
            })
            .collect();

        debug!(
            "Loaded {} check constraints for {}",
            table.check_constraints.len(),
            table.full_name()
        );
        Ok(())
    }

    async fn table_triggers(&self, table: &Table) -> Result<Vec<Module>> {
        self.triggers(
            &table.full_name(),
            "o.parent_class = 1 AND o.parent_id = @P1",
            Some(table.object_id),
            || {
                (
                    table.schema.clone(),
                    TriggerScope::Table {
                        schema: table.schema.clone(),
                        name: table.name.clone(),
                    },
                )
            },
        )
        .await
    }

    async fn database_triggers(&self) -> Result<Vec<Module>> {
        self.triggers("database triggers", "o.parent_class = 0", None, || {
            (String::new(), TriggerScope::Database)
        })
        .await
    }

    async fn views(&self) -> Result<Vec<Module>> {
        self.modules(ObjectKind::View, "'V'").await
    }

    async fn procedures(&self) -> Result<Vec<Module>> {
        self.modules(ObjectKind::Procedure, "'P'").await
    }

    async fn functions(&self) -> Result<Vec<Module>> {
        self.modules(ObjectKind::Function, "'FN', 'IF', 'TF'").await
    }

    async fn user_types(&self) -> Result<Vec<UserType>> {
        let (is_table_type, table_join, table_object) = if self.at_least_2008().await? {
            (
                "t.is_table_type",
                "LEFT JOIN sys.table_types tt ON tt.user_type_id = t.user_type_id",
                "tt.type_table_object_id",
            )
        } else {
            ("CAST(0 AS BIT)", "", "CAST(NULL AS INT)")
        };
        let query = format!(
            r#"
            SELECT
                t.name,
                SCHEMA_NAME(t.schema_id),
                t.is_assembly_type,
                {is_table_type},
                bt.name,
                CAST(CASE WHEN bt.name IN ('nchar', 'nvarchar') AND t.max_length > 0
                     THEN t.max_length / 2 ELSE t.max_length END AS INT),
                CAST(t.precision AS INT),
                CAST(t.scale AS INT),
                t.is_nullable,
                a.name,
                at.assembly_class,
                {table_object}
            FROM sys.types t
            LEFT JOIN sys.types bt ON bt.user_type_id = t.system_type_id
            LEFT JOIN sys.assembly_types at ON at.user_type_id = t.user_type_id
            LEFT JOIN sys.assemblies a ON a.assembly_id = at.assembly_id
            {table_join}
            WHERE t.is_user_defined = 1
            "#,
            is_table_type = is_table_type,
            table_object = table_object,
            table_join = table_join
        );

        let rows = self.fetch("user types", &query, None).await?;
        let mut types = Vec::with_capacity(rows.len());
        for row in &rows {
            let name = row.get::<&str, _>(0).unwrap_or_default().to_string();
            let schema = row.get::<&str, _>(1).unwrap_or_default().to_string();

            let kind = if row.get::<bool, _>(2).unwrap_or(false) {
                UserTypeKind::Clr {
                    assembly: row.get::<&str, _>(9).unwrap_or_default().to_string(),
                    class_name: row.get::<&str, _>(10).unwrap_or_default().to_string(),
                }
            } else if row.get::<bool, _>(3).unwrap_or(false) {
                let object_id = row.get::<i32, _>(11).ok_or_else(|| {
                    ScriptGenError::catalog(
                        format!("{}.{}", schema, name),
                        "table type has no column definition",
                    )
                })?;
                UserTypeKind::Table {
                    columns: self
                        .columns_of(&format!("{}.{}", schema, name), object_id)
                        .await?,
                }
            } else {
                UserTypeKind::Alias {
                    base_type: row.get::<&str, _>(4).unwrap_or_default().to_string(),
                    max_length: row.get::<i32, _>(5).unwrap_or(0),
                    precision: row.get::<i32, _>(6).unwrap_or(0),
                    scale: row.get::<i32, _>(7).unwrap_or(0),
                    is_nullable: row.get::<bool, _>(8).unwrap_or(true),
                }
            };

            types.push(UserType {
                name,
                schema,
                is_system_object: false,
                kind,
            });
        }

        debug!("Found {} user defined types", types.len());
        Ok(types)
    }
}

#[async_trait]
impl RowSource for MssqlCatalog {
    async fn read_rows(&self, sql: &str, sink: &mut (dyn RowSink + Send)) -> Result<u64> {
        let mut client = self.get_client().await?;
        let mut stream = client.simple_query(sql).await?;

        let mut count = 0u64;
        while let Some(item) = stream.try_next().await? {
            match item {
                QueryItem::Metadata(meta) if meta.result_index() == 0 => {
                    let names: Vec<String> =
                        meta.columns().iter().map(|c| c.name().to_string()).collect();
                    sink.columns(&names)?;
                }
                QueryItem::Row(row) if row.result_index() == 0 => {
                    let values = row
                        .into_iter()
                        .map(column_value)
                        .collect::<Result<Vec<_>>>()?;
                    sink.row(&values)?;
                    count += 1;
                }
                _ => {}
            }
        }

        Ok(count)
    }
}

/// `"15.0.2000.5"` -> 15.
fn parse_major_version(version: &str) -> Option<u8> {
    version.split('.').next()?.trim().parse().ok()
}

fn column_value(data: ColumnData<'static>) -> Result<SqlValue<'static>> {
    let value = match data {
        ColumnData::U8(v) => v.into(),
        ColumnData::I16(v) => v.into(),
        ColumnData::I32(v) => v.into(),
        ColumnData::I64(v) => v.into(),
        ColumnData::F32(v) => v.into(),
        ColumnData::F64(v) => v.into(),
        ColumnData::Bit(v) => v.into(),
        ColumnData::Guid(v) => v.into(),
        ColumnData::String(v) => v.map_or(SqlValue::Null, SqlValue::Text),
        ColumnData::Binary(v) => v.map_or(SqlValue::Null, SqlValue::Bytes),
        ColumnData::Xml(v) => v.map_or(SqlValue::Null, |xml| {
            SqlValue::Text(Cow::Owned(xml.into_owned().into_string()))
        }),
        ColumnData::Numeric(_) => Decimal::from_sql(&data)?.into(),
        ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_) => {
            NaiveDateTime::from_sql(&data)?.into()
        }
        ColumnData::Date(_) => NaiveDate::from_sql(&data)?.into(),
        ColumnData::Time(_) => NaiveTime::from_sql(&data)?.into(),
        ColumnData::DateTimeOffset(_) => DateTime::<FixedOffset>::from_sql(&data)?.into(),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_major_version() {
        assert_eq!(parse_major_version("15.0.2000.5"), Some(15));
        assert_eq!(parse_major_version("9.00.5000.00"), Some(9));
        assert_eq!(parse_major_version(""), None);
        assert_eq!(parse_major_version("abc"), None);
    }

    #[test]
    fn test_column_value_conversions() {
        assert!(matches!(
            column_value(ColumnData::I32(Some(7))).unwrap(),
            SqlValue::I32(7)
        ));
        assert!(column_value(ColumnData::I32(None)).unwrap().is_null());
        assert!(matches!(
            column_value(ColumnData::Bit(Some(true))).unwrap(),
            SqlValue::Bool(true)
        ));
        match column_value(ColumnData::String(Some(Cow::Borrowed("abc")))).unwrap() {
            SqlValue::Text(s) => assert_eq!(s, "abc"),
            other => panic!("unexpected {:?}", other),
        }
        match column_value(ColumnData::Binary(Some(Cow::Owned(vec![0xAB])))).unwrap() {
            SqlValue::Bytes(b) => assert_eq!(b.as_ref(), &[0xAB]),
            other => panic!("unexpected {:?}", other),
        }
        assert!(column_value(ColumnData::String(None)).unwrap().is_null());
        assert!(column_value(ColumnData::Binary(None)).unwrap().is_null());
    }

    #[test]
    fn test_system_object_expression_covers_diagram_support() {
        assert!(IS_SYSTEM_OBJECT.contains("is_ms_shipped = 1"));
        assert!(IS_SYSTEM_OBJECT.contains("microsoft_database_tools_support"));
    }
}
