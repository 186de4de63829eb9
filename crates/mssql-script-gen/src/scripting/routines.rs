//! Views, procedures, functions and triggers: guarded drops, then creates.
//!
//! Each object gets an `IF EXISTS ... DROP` statement before any CREATE is
//! emitted, so the script can be re-run against a database that already has
//! them. Drops and creates both follow the ordinal name order.

use std::io::Write;

use tracing::{info, warn};

use crate::config::TargetVersion;
use crate::core::identifier::{qualify_mssql, quote_mssql};
use crate::core::{
    Catalog, CatalogObject, Module, ObjectKind, ScriptGenerator, ScriptOptions, TriggerScope,
};
use crate::error::{Result, ScriptGenError};
use crate::values::literal::quote_string;
use crate::writer::ScriptWriter;

use super::{include_all, select_objects};

/// First server major version with database-scoped (DDL) triggers.
const DATABASE_TRIGGER_MIN_VERSION: u8 = 9;

pub async fn script_views<W: Write>(
    catalog: &dyn Catalog,
    generator: &dyn ScriptGenerator,
    version: TargetVersion,
    out: &mut ScriptWriter<W>,
) -> Result<usize> {
    let views = select_objects(catalog.views().await?, include_all);
    info!("Scripting {} views", views.len());
    drop_then_create(&views, generator, version, out)
}

pub async fn script_procedures<W: Write>(
    catalog: &dyn Catalog,
    generator: &dyn ScriptGenerator,
    version: TargetVersion,
    out: &mut ScriptWriter<W>,
) -> Result<usize> {
    let procedures = select_objects(catalog.procedures().await?, include_all);
    info!("Scripting {} procedures", procedures.len());
    drop_then_create(&procedures, generator, version, out)
}

pub async fn script_functions<W: Write>(
    catalog: &dyn Catalog,
    generator: &dyn ScriptGenerator,
    version: TargetVersion,
    out: &mut ScriptWriter<W>,
) -> Result<usize> {
    let functions = select_objects(catalog.functions().await?, include_all);
    info!("Scripting {} functions", functions.len());
    drop_then_create(&functions, generator, version, out)
}

/// Table triggers of every non-system table, plus database triggers when the
/// server has them.
pub async fn script_triggers<W: Write>(
    catalog: &dyn Catalog,
    generator: &dyn ScriptGenerator,
    version: TargetVersion,
    out: &mut ScriptWriter<W>,
) -> Result<usize> {
    let tables = select_objects(catalog.tables().await?, include_all);

    let mut triggers = Vec::new();
    for table in &tables {
        triggers.extend(catalog.table_triggers(table).await?);
    }

    if catalog.server_major_version().await? >= DATABASE_TRIGGER_MIN_VERSION {
        let database_triggers = catalog.database_triggers().await?;
        if !database_triggers.is_empty() && version < TargetVersion::Version90 {
            warn!(
                "Skipping {} database triggers: not supported by target version {:?}",
                database_triggers.len(),
                version
            );
        } else {
            triggers.extend(database_triggers);
        }
    }

    let triggers = select_objects(triggers, include_all);
    info!("Scripting {} triggers", triggers.len());
    drop_then_create(&triggers, generator, version, out)
}

fn drop_then_create<W: Write>(
    modules: &[Module],
    generator: &dyn ScriptGenerator,
    version: TargetVersion,
    out: &mut ScriptWriter<W>,
) -> Result<usize> {
    out.section("DELETE OLD")?;
    for module in modules {
        out.statement(&drop_statement(module, version)?)?;
    }

    out.blank_line()?;
    out.section("CREATE NEW")?;
    let opts = ScriptOptions::module(version);
    for module in modules {
        out.statements(generator.script_module(module, &opts)?)?;
    }

    Ok(modules.len())
}

/// Existence-guarded DROP for one module.
pub fn drop_statement(module: &Module, version: TargetVersion) -> Result<String> {
    let legacy = version < TargetVersion::Version90;

    let statement = match (module.kind, &module.trigger_scope) {
        (ObjectKind::Trigger, Some(TriggerScope::Database)) => format!(
            "IF EXISTS (SELECT * FROM sys.triggers WHERE parent_class = 0 AND name = N{})\r\n\tDROP TRIGGER {} ON DATABASE",
            quote_string(module.name()),
            quote_mssql(module.name())?
        ),
        (ObjectKind::Trigger, _) => {
            let qualified = qualify_mssql(module.schema(), module.name())?;
            let guard = if legacy {
                format!(
                    "SELECT * FROM dbo.sysobjects WHERE id = OBJECT_ID(N{}) AND OBJECTPROPERTY(id, N'IsTrigger') = 1",
                    quote_string(&qualified)
                )
            } else {
                format!(
                    "SELECT * FROM sys.triggers WHERE object_id = OBJECT_ID(N{})",
                    quote_string(&qualified)
                )
            };
            format!("IF EXISTS ({})\r\n\tDROP TRIGGER {}", guard, qualified)
        }
        (ObjectKind::Function, _) => {
            let qualified = qualify_mssql(module.schema(), module.name())?;
            let guard = if legacy {
                format!(
                    "SELECT * FROM dbo.sysobjects WHERE id = OBJECT_ID(N{}) AND xtype in (N'FN', N'IF', N'TF')",
                    quote_string(&qualified)
                )
            } else {
                format!(
                    "SELECT * FROM sys.objects WHERE object_id = OBJECT_ID(N{}) AND type in (N'FN', N'IF', N'TF', N'FS', N'FT')",
                    quote_string(&qualified)
                )
            };
            format!("IF EXISTS ({})\r\n\tDROP FUNCTION {}", guard, qualified)
        }
        (ObjectKind::View, _) => object_property_drop(module, "IsView", "VIEW")?,
        (ObjectKind::Procedure, _) => object_property_drop(module, "IsProcedure", "PROCEDURE")?,
        (kind, _) => {
            return Err(ScriptGenError::catalog(
                module.full_name(),
                format!("cannot drop a {} as a module", kind),
            ))
        }
    };

    Ok(statement)
}

/// `sysobjects` guard, valid on every target version.
fn object_property_drop(module: &Module, property: &str, keyword: &str) -> Result<String> {
    let qualified = qualify_mssql(module.schema(), module.name())?;
    Ok(format!(
        "IF EXISTS (SELECT * FROM dbo.sysobjects WHERE id = OBJECT_ID(N{}) AND OBJECTPROPERTY(id, N'{}') = 1)\r\n\tDROP {} {}",
        quote_string(&qualified),
        property,
        keyword,
        qualified
    ))
}
