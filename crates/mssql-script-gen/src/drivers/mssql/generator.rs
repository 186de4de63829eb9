//! T-SQL statement generation for catalog objects.

use tracing::warn;

use crate::core::identifier::{qualify_mssql, quote_mssql};
use crate::core::{
    CatalogObject, CheckConstraint, Column, ForeignKey, Index, IndexColumn, Module,
    ScriptGenerator, ScriptOptions, Table, UserType, UserTypeKind,
};
use crate::error::{Result, ScriptGenError};

/// SQL Server statement generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlGenerator;

impl ScriptGenerator for MssqlGenerator {
    fn script_table(&self, table: &Table, opts: &ScriptOptions) -> Result<Vec<String>> {
        let target = qualify_mssql(&table.schema, &table.name)?;
        let mut statements = vec![format!(
            "CREATE TABLE {}(\r\n{}\r\n)",
            target,
            column_list(&table.columns)?
        )];

        if opts.with_defaults {
            for (column, default) in table.default_constraints() {
                statements.push(format!(
                    "ALTER TABLE {} ADD CONSTRAINT {} DEFAULT {} FOR {}",
                    target,
                    quote_mssql(&default.name)?,
                    default.definition,
                    quote_mssql(&column.name)?
                ));
            }
        }

        Ok(statements)
    }

    fn script_index(
        &self,
        table: &Table,
        index: &Index,
        opts: &ScriptOptions,
    ) -> Result<Vec<String>> {
        if index.columns.is_empty() {
            return Err(ScriptGenError::catalog(
                index.full_name(),
                "index has no key columns",
            ));
        }

        let target = qualify_mssql(&table.schema, &table.name)?;
        let clustering = if index.is_clustered {
            "CLUSTERED"
        } else {
            "NONCLUSTERED"
        };
        let keys = key_list(&index.columns)?;

        if index.is_constraint() {
            let kind = if index.is_primary_key {
                "PRIMARY KEY"
            } else {
                "UNIQUE"
            };
            return Ok(vec![format!(
                "ALTER TABLE {} ADD CONSTRAINT {} {} {} ({})",
                target,
                quote_mssql(&index.name)?,
                kind,
                clustering,
                keys
            )]);
        }

        let mut sql = format!(
            "CREATE {}{} INDEX {} ON {} ({})",
            if index.is_unique { "UNIQUE " } else { "" },
            clustering,
            quote_mssql(&index.name)?,
            target,
            keys
        );

        if !index.include_cols.is_empty() {
            if opts.target_version.supports_included_columns() {
                sql.push_str(&format!(" INCLUDE ({})", name_list(&index.include_cols)?));
            } else {
                warn!(
                    "{}: included columns dropped for {:?}",
                    index.full_name(),
                    opts.target_version
                );
            }
        }

        if let Some(filter) = &index.filter_definition {
            if opts.target_version.supports_filtered_indexes() {
                sql.push_str(&format!(" WHERE {}", filter));
            } else {
                warn!(
                    "{}: index filter dropped for {:?}",
                    index.full_name(),
                    opts.target_version
                );
            }
        }

        Ok(vec![sql])
    }

    fn script_foreign_key(
        &self,
        table: &Table,
        fk: &ForeignKey,
        opts: &ScriptOptions,
    ) -> Result<Vec<String>> {
        let mut sql = format!(
            "ALTER TABLE {} {}ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            qualify_mssql(&table.schema, &table.name)?,
            check_clause(opts),
            quote_mssql(&fk.name)?,
            name_list(&fk.columns)?,
            qualify_mssql(&fk.ref_schema, &fk.ref_table)?,
            name_list(&fk.ref_columns)?
        );

        if let Some(action) = referential_action(&fk.on_delete) {
            sql.push_str(&format!(" ON DELETE {}", action));
        }
        if let Some(action) = referential_action(&fk.on_update) {
            sql.push_str(&format!(" ON UPDATE {}", action));
        }

        Ok(vec![sql])
    }

    fn script_check(
        &self,
        table: &Table,
        check: &CheckConstraint,
        opts: &ScriptOptions,
    ) -> Result<Vec<String>> {
        Ok(vec![format!(
            "ALTER TABLE {} {}ADD CONSTRAINT {} CHECK {}",
            qualify_mssql(&table.schema, &table.name)?,
            check_clause(opts),
            quote_mssql(&check.name)?,
            check.definition
        )])
    }

    fn script_module(&self, module: &Module, opts: &ScriptOptions) -> Result<Vec<String>> {
        let Some(definition) = module.definition.as_deref() else {
            warn!(
                "{} {}: definition not available (encrypted?), skipped",
                module.kind,
                module.full_name()
            );
            return Ok(Vec::new());
        };

        let mut statements = Vec::with_capacity(3);
        if opts.with_session_settings {
            statements.push(format!("SET ANSI_NULLS {}", on_off(module.uses_ansi_nulls)));
            statements.push(format!(
                "SET QUOTED_IDENTIFIER {}",
                on_off(module.uses_quoted_identifier)
            ));
        }
        statements.push(definition.to_string());
        Ok(statements)
    }

    fn script_user_type(&self, user_type: &UserType, opts: &ScriptOptions) -> Result<Vec<String>> {
        let target = qualify_mssql(&user_type.schema, &user_type.name)?;

        let sql = match &user_type.kind {
            UserTypeKind::Clr {
                assembly,
                class_name,
            } => format!(
                "CREATE TYPE {} EXTERNAL NAME {}.{}",
                target,
                quote_mssql(assembly)?,
                quote_mssql(class_name)?
            ),
            UserTypeKind::Alias {
                base_type,
                max_length,
                precision,
                scale,
                is_nullable,
            } => format!(
                "CREATE TYPE {} FROM {} {}",
                target,
                format_mssql_type(base_type, *max_length, *precision, *scale),
                null_clause(*is_nullable)
            ),
            UserTypeKind::Table { columns } => {
                if !opts.target_version.supports_table_types() {
                    warn!(
                        "Table type {} skipped: not available in {:?}",
                        user_type.full_name(),
                        opts.target_version
                    );
                    return Ok(Vec::new());
                }
                format!("CREATE TYPE {} AS TABLE(\r\n{}\r\n)", target, column_list(columns)?)
            }
        };

        Ok(vec![sql])
    }
}

fn column_list(columns: &[Column]) -> Result<String> {
    let lines = columns
        .iter()
        .map(|c| column_definition(c).map(|d| format!("\t{}", d)))
        .collect::<Result<Vec<_>>>()?;
    Ok(lines.join(",\r\n"))
}

fn column_definition(column: &Column) -> Result<String> {
    let name = quote_mssql(&column.name)?;

    if let Some(expr) = &column.computed_definition {
        let persisted = if column.is_persisted { " PERSISTED" } else { "" };
        return Ok(format!("{} AS {}{}", name, expr, persisted));
    }

    let mut def = format!(
        "{} {}",
        name,
        format_mssql_type(
            &column.data_type,
            column.max_length,
            column.precision,
            column.scale
        )
    );
    if column.is_identity {
        def.push_str(&format!(
            " IDENTITY({},{})",
            column.identity_seed, column.identity_increment
        ));
    }
    def.push(' ');
    def.push_str(null_clause(column.is_nullable));
    Ok(def)
}

fn key_list(columns: &[IndexColumn]) -> Result<String> {
    let keys = columns
        .iter()
        .map(|c| {
            let order = if c.descending { "DESC" } else { "ASC" };
            quote_mssql(&c.name).map(|q| format!("{} {}", q, order))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(keys.join(", "))
}

fn name_list(names: &[String]) -> Result<String> {
    let quoted = names
        .iter()
        .map(|n| quote_mssql(n))
        .collect::<Result<Vec<_>>>()?;
    Ok(quoted.join(", "))
}

fn check_clause(opts: &ScriptOptions) -> &'static str {
    if opts.with_check {
        "WITH CHECK "
    } else {
        "WITH NOCHECK "
    }
}

/// `NO_ACTION` is the default and is not spelled out.
fn referential_action(action: &str) -> Option<String> {
    match action.trim() {
        "" => None,
        a if a.eq_ignore_ascii_case("NO_ACTION") => None,
        a => Some(a.replace('_', " ")),
    }
}

fn null_clause(is_nullable: bool) -> &'static str {
    if is_nullable {
        "NULL"
    } else {
        "NOT NULL"
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

/// Column type text. Lengths are in characters for the string types and
/// `-1` means `max`.
pub(crate) fn format_mssql_type(
    data_type: &str,
    max_length: i32,
    precision: i32,
    scale: i32,
) -> String {
    let lower = data_type.to_lowercase();
    match lower.as_str() {
        "float" => {
            if precision > 0 && precision != 53 {
                format!("float({})", precision)
            } else {
                "float".to_string()
            }
        }
        "decimal" | "numeric" => {
            if precision > 0 {
                format!("{}({}, {})", data_type, precision, scale)
            } else {
                format!("{}(18, 0)", data_type)
            }
        }
        "datetime2" | "time" | "datetimeoffset" => {
            if scale != 7 {
                format!("{}({})", data_type, scale)
            } else {
                data_type.to_string()
            }
        }
        "char" | "varchar" | "nchar" | "nvarchar" | "binary" | "varbinary" => {
            if max_length == -1 {
                format!("{}(max)", data_type)
            } else if max_length > 0 {
                format!("{}({})", data_type, max_length)
            } else {
                data_type.to_string()
            }
        }
        _ => data_type.to_string(),
    }
}
