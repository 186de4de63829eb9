//! Value export: one INSERT statement per row of each configured table.

pub mod literal;

use std::io::Write;

use tracing::{debug, info};

use crate::config::TableExportSpec;
use crate::core::identifier::{qualify_mssql, quote_if_needed, quote_mssql};
use crate::core::{
    ordinal_cmp, Catalog, CatalogObject, Column, RowSink, RowSource, SqlValue, Table,
};
use crate::error::{Result, ScriptGenError};
use crate::writer::ScriptWriter;

pub use literal::FormatContext;

/// Schema whose tables are referenced by bare name.
const DEFAULT_SCHEMA: &str = "dbo";

/// Exports table rows as INSERT statements.
pub struct ValueExporter<'a> {
    catalog: &'a dyn Catalog,
    rows: &'a dyn RowSource,
    format: FormatContext,
}

/// Rows written for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableExportResult {
    pub table: String,
    pub rows: u64,
}

impl<'a> ValueExporter<'a> {
    pub fn new(catalog: &'a dyn Catalog, rows: &'a dyn RowSource, format: FormatContext) -> Self {
        Self {
            catalog,
            rows,
            format,
        }
    }

    /// Export every table in order. The first failing table aborts the export.
    pub async fn export<W: Write + Send>(
        &self,
        specs: &[TableExportSpec],
        out: &mut ScriptWriter<W>,
    ) -> Result<Vec<TableExportResult>> {
        let tables = self.catalog.tables().await?;
        let mut results = Vec::with_capacity(specs.len());

        for spec in specs {
            let mut table = find_table(&tables, &spec.table_name)?.clone();
            self.catalog.load_columns(&mut table).await?;

            let rows = self.export_table(&table, spec, out).await?;
            info!("{}: exported {} rows", table.full_name(), rows);
            results.push(TableExportResult {
                table: table.name.clone(),
                rows,
            });
        }

        Ok(results)
    }

    async fn export_table<W: Write + Send>(
        &self,
        table: &Table,
        spec: &TableExportSpec,
        out: &mut ScriptWriter<W>,
    ) -> Result<u64> {
        let plan = ExportPlan::new(table, spec)?;
        debug!("{}: {}", table.full_name(), plan.select);

        if spec.row_limit > 0 {
            out.comment(&format!("{} x {}", table.name, spec.row_limit))?;
        } else {
            out.comment(&table.name)?;
        }

        if plan.has_identity {
            out.line(&format!("SET IDENTITY_INSERT {} ON", plan.target))?;
            out.batch_separator()?;
        }

        let mut sink = InsertSink {
            out: &mut *out,
            prefix: &plan.insert_prefix,
            expected_columns: plan.column_count,
            format: &self.format,
        };

        let rows = self
            .rows
            .read_rows(&plan.select, &mut sink)
            .await
            .map_err(|e| match e {
                ScriptGenError::Io(_) => e,
                other => ScriptGenError::query(&table.name, other),
            })?;

        out.batch_separator()?;
        if plan.has_identity {
            out.line(&format!("SET IDENTITY_INSERT {} OFF", plan.target))?;
            out.batch_separator()?;
        }
        out.blank_line()?;

        Ok(rows)
    }
}

/// Case-insensitive lookup by bare name.
///
/// When several schemas hold the name, user tables win over system tables,
/// then `dbo` wins, then ordinal order decides. The catalog's enumeration
/// order never affects the choice.
fn find_table<'t>(tables: &'t [Table], name: &str) -> Result<&'t Table> {
    tables
        .iter()
        .filter(|t| t.name.eq_ignore_ascii_case(name))
        .min_by(|a, b| {
            a.is_system_object
                .cmp(&b.is_system_object)
                .then_with(|| is_default_schema(b).cmp(&is_default_schema(a)))
                .then_with(|| ordinal_cmp(*a, *b))
        })
        .ok_or_else(|| ScriptGenError::Config(format!("Can't find table {}", name)))
}

fn is_default_schema(table: &Table) -> bool {
    table.schema.eq_ignore_ascii_case(DEFAULT_SCHEMA)
}

/// Query text and statement prefix for one table.
struct ExportPlan {
    target: String,
    select: String,
    insert_prefix: String,
    column_count: usize,
    has_identity: bool,
}

impl ExportPlan {
    fn new(table: &Table, spec: &TableExportSpec) -> Result<Self> {
        let columns: Vec<&Column> = table.insertable_columns().collect();
        if columns.is_empty() {
            return Err(ScriptGenError::Config(format!(
                "table {} has no insertable columns",
                table.full_name()
            )));
        }

        let target = if table.schema.eq_ignore_ascii_case(DEFAULT_SCHEMA) {
            quote_mssql(&table.name)?
        } else {
            qualify_mssql(&table.schema, &table.name)?
        };

        let select_list = columns
            .iter()
            .map(|c| quote_mssql(&c.name))
            .collect::<Result<Vec<_>>>()?
            .join(", ");
        let insert_list = columns
            .iter()
            .map(|c| quote_if_needed(&c.name))
            .collect::<Result<Vec<_>>>()?
            .join(", ");

        let mut select = if spec.row_limit > 0 {
            format!("select top {} {} from {}", spec.row_limit, select_list, target)
        } else {
            format!("select {} from {}", select_list, target)
        };
        if let Some(where_clause) = &spec.where_clause {
            select.push_str(&format!(" WHERE ({})", where_clause));
        }

        Ok(Self {
            insert_prefix: format!("insert into {} ({}) values (", target, insert_list),
            target,
            select,
            column_count: columns.len(),
            has_identity: table.has_identity(),
        })
    }
}

/// Writes one INSERT line per row as rows arrive.
struct InsertSink<'s, W: Write> {
    out: &'s mut ScriptWriter<W>,
    prefix: &'s str,
    expected_columns: usize,
    format: &'s FormatContext,
}

impl<W: Write> RowSink for InsertSink<'_, W> {
    fn columns(&mut self, names: &[String]) -> Result<()> {
        if names.len() != self.expected_columns {
            return Err(ScriptGenError::Config(format!(
                "expected {} result columns, got {}",
                self.expected_columns,
                names.len()
            )));
        }
        Ok(())
    }

    fn row(&mut self, values: &[SqlValue<'_>]) -> Result<()> {
        let literals: Vec<String> = values.iter().map(|v| self.format.literal(v)).collect();
        self.out
            .verbatim_line(&format!("{}{})", self.prefix, literals.join(", ")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ObjectKind;
    use crate::testing::{column, identity_column, table, MemoryCatalog};

    fn spec(name: &str, row_limit: u32, where_clause: Option<&str>) -> TableExportSpec {
        TableExportSpec {
            table_name: name.to_string(),
            row_limit,
            where_clause: where_clause.map(String::from),
        }
    }

    async fn export(catalog: &MemoryCatalog, specs: &[TableExportSpec]) -> Result<String> {
        let exporter = ValueExporter::new(catalog, catalog, FormatContext::invariant());
        let mut out = ScriptWriter::new(Vec::new());
        exporter.export(specs, &mut out).await?;
        Ok(String::from_utf8(out.finish()?).unwrap())
    }

    fn users_catalog() -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new().with_rows(
            "Users",
            &["Id", "Name"],
            vec![
                vec![SqlValue::I32(1), SqlValue::from("Ann")],
                vec![SqlValue::I32(2), SqlValue::Null],
            ],
        );
        catalog.tables = vec![table(
            "Users",
            vec![column("Id", "int"), column("Name", "nvarchar")],
        )];
        catalog
    }

    #[tokio::test]
    async fn test_users_scenario() {
        let script = export(&users_catalog(), &[spec("Users", 0, None)])
            .await
            .unwrap();
        assert_eq!(
            script,
            "-- Users\r\n\
             insert into [Users] (Id, Name) values (1, 'Ann')\r\n\
             insert into [Users] (Id, Name) values (2, null)\r\n\
             GO\r\n\
             \r\n"
        );
    }

    #[tokio::test]
    async fn test_identity_bracketing() {
        let mut catalog = MemoryCatalog::new().with_rows(
            "Orders",
            &["Id", "Note"],
            vec![vec![SqlValue::I32(10), SqlValue::from("O'Brien")]],
        );
        catalog.tables = vec![table(
            "Orders",
            vec![identity_column("Id"), column("Note", "varchar")],
        )];

        let script = export(&catalog, &[spec("orders", 0, None)]).await.unwrap();
        assert_eq!(
            script,
            "-- Orders\r\n\
             SET IDENTITY_INSERT [Orders] ON\r\n\
             GO\r\n\
             insert into [Orders] (Id, Note) values (10, 'O''Brien')\r\n\
             GO\r\n\
             SET IDENTITY_INSERT [Orders] OFF\r\n\
             GO\r\n\
             \r\n"
        );
    }

    #[tokio::test]
    async fn test_multiline_text_kept_verbatim() {
        let mut catalog = MemoryCatalog::new().with_rows(
            "Notes",
            &["Body"],
            vec![vec![SqlValue::from("line 1\nline 2")]],
        );
        catalog.tables = vec![table("Notes", vec![column("Body", "nvarchar")])];

        let script = export(&catalog, &[spec("Notes", 0, None)]).await.unwrap();
        assert!(script.contains("values ('line 1\nline 2')\r\n"));
    }

    #[tokio::test]
    async fn test_row_limit_and_where() {
        let rows = (1..=100).map(|i| vec![SqlValue::I32(i)]).collect();
        let mut catalog = MemoryCatalog::new().with_rows("Big", &["N"], rows);
        catalog.tables = vec![table("Big", vec![column("N", "int")])];

        let script = export(&catalog, &[spec("Big", 5, Some("N > 0"))])
            .await
            .unwrap();
        assert!(script.starts_with("-- Big x 5\r\n"));
        assert_eq!(script.matches("insert into [Big]").count(), 5);
        assert_eq!(
            catalog.executed(),
            vec!["select top 5 [N] from [Big] WHERE (N > 0)".to_string()]
        );
    }

    #[tokio::test]
    async fn test_zero_rows_keeps_header_and_separator() {
        let mut catalog = MemoryCatalog::new().with_rows("Empty", &["Id"], vec![]);
        catalog.tables = vec![table("Empty", vec![column("Id", "int")])];

        let script = export(&catalog, &[spec("Empty", 0, None)]).await.unwrap();
        assert_eq!(script, "-- Empty\r\nGO\r\n\r\n");
    }

    #[tokio::test]
    async fn test_projection_skips_generated_columns() {
        let mut total = column("Total", "int");
        total.computed_definition = Some("([A]+(1))".into());
        let mut catalog = MemoryCatalog::new().with_rows(
            "Calc",
            &["A", "Order Date"],
            vec![vec![SqlValue::I32(1), SqlValue::Null]],
        );
        catalog.tables = vec![table(
            "Calc",
            vec![
                column("A", "int"),
                column("Ver", "timestamp"),
                total,
                column("Order Date", "datetime"),
            ],
        )];

        let script = export(&catalog, &[spec("Calc", 0, None)]).await.unwrap();
        assert!(script.contains("insert into [Calc] (A, [Order Date]) values (1, null)"));
        assert_eq!(
            catalog.executed(),
            vec!["select [A], [Order Date] from [Calc]".to_string()]
        );
    }

    #[tokio::test]
    async fn test_non_default_schema_is_qualified() {
        let mut catalog = MemoryCatalog::new().with_rows("Rates", &["Id"], vec![vec![SqlValue::I32(1)]]);
        let mut rates = table("Rates", vec![column("Id", "int")]);
        rates.schema = "fx".into();
        catalog.tables = vec![rates];

        let script = export(&catalog, &[spec("Rates", 0, None)]).await.unwrap();
        assert!(script.contains("insert into [fx].[Rates] (Id) values (1)"));
    }

    fn rates_catalog(schemas: &[&str]) -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new().with_rows(
            "Rates",
            &["Id"],
            vec![vec![SqlValue::I32(1)]],
        );
        catalog.tables = schemas
            .iter()
            .map(|schema| Table {
                schema: schema.to_string(),
                ..table("Rates", vec![column("Id", "int")])
            })
            .collect();
        catalog
    }

    #[tokio::test]
    async fn test_same_name_in_two_schemas_prefers_dbo() {
        for schemas in [["fx", "dbo"], ["dbo", "fx"]] {
            let script = export(&rates_catalog(&schemas), &[spec("Rates", 0, None)])
                .await
                .unwrap();
            assert!(script.contains("insert into [Rates] (Id) values (1)\r\n"));
        }
    }

    #[tokio::test]
    async fn test_same_name_outside_dbo_takes_ordinal_first() {
        for schemas in [["sales", "fx"], ["fx", "sales"]] {
            let script = export(&rates_catalog(&schemas), &[spec("rates", 0, None)])
                .await
                .unwrap();
            assert!(script.contains("insert into [fx].[Rates] (Id) values (1)\r\n"));
        }
    }

    #[tokio::test]
    async fn test_null_binary_written_as_null() {
        let mut catalog = MemoryCatalog::new().with_rows(
            "Blobs",
            &["Id", "Payload"],
            vec![
                vec![SqlValue::I32(1), SqlValue::Null],
                vec![SqlValue::I32(2), SqlValue::from(vec![0xAB_u8, 0x01])],
            ],
        );
        catalog.tables = vec![table(
            "Blobs",
            vec![column("Id", "int"), column("Payload", "varbinary")],
        )];

        let script = export(&catalog, &[spec("Blobs", 0, None)]).await.unwrap();
        assert!(script.contains("insert into [Blobs] (Id, Payload) values (1, null)\r\n"));
        assert!(script.contains("insert into [Blobs] (Id, Payload) values (2, 0xAB01)\r\n"));
    }

    #[tokio::test]
    async fn test_unknown_table_is_config_error() {
        let err = export(&users_catalog(), &[spec("Missing", 0, None)])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: Can't find table Missing");
    }

    #[tokio::test]
    async fn test_query_failure_names_table_and_aborts() {
        let mut catalog = users_catalog();
        catalog.tables.push(table("Broken", vec![column("Id", "int")]));

        let err = export(
            &catalog,
            &[spec("Broken", 0, None), spec("Users", 0, None)],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ScriptGenError::Query { ref table, .. } if table == "Broken"));
        assert!(err.format_detailed().contains("Invalid object name 'Broken'"));
        // Users was never queried.
        assert_eq!(catalog.executed().len(), 1);
    }

    #[tokio::test]
    async fn test_catalog_failure_propagates() {
        let mut catalog = users_catalog();
        catalog.fail_on = Some(ObjectKind::Table);
        let err = export(&catalog, &[spec("Users", 0, None)]).await.unwrap_err();
        assert!(matches!(err, ScriptGenError::Catalog { .. }));
    }
}
