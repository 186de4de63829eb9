//! Table scripting: tables, then indexes, then foreign keys, then checks.
//!
//! Constraints that reference other tables are only emitted once every table
//! exists, so the script replays against an empty database regardless of
//! inter-table dependencies.

use std::io::Write;

use tracing::{debug, info};

use crate::config::TargetVersion;
use crate::core::{ordinal_cmp, Catalog, CatalogObject, ScriptGenerator, ScriptOptions, Table};
use crate::error::Result;
use crate::writer::ScriptWriter;

use super::select_objects;

/// Script every non-system table whose name passes `include`.
///
/// Returns the number of tables scripted.
pub async fn script_tables<W, F>(
    catalog: &dyn Catalog,
    generator: &dyn ScriptGenerator,
    version: TargetVersion,
    include: F,
    out: &mut ScriptWriter<W>,
) -> Result<usize>
where
    W: Write,
    F: Fn(&str) -> bool,
{
    let mut tables = select_objects(catalog.tables().await?, include);
    for table in &mut tables {
        catalog.load_table_metadata(table).await?;
        debug!(
            "Loaded {}: {} columns, {} indexes, {} foreign keys, {} checks",
            table.full_name(),
            table.columns.len(),
            table.indexes.len(),
            table.foreign_keys.len(),
            table.check_constraints.len()
        );
    }
    info!("Scripting {} tables", tables.len());

    let table_opts = ScriptOptions::table_phase(version);
    let constraint_opts = ScriptOptions::constraint_phase(version);

    out.section("TABLES")?;
    for table in &tables {
        out.statements(generator.script_table(table, &table_opts)?)?;
    }

    out.blank_line()?;
    out.section("INDEXES")?;
    for (table, index) in children(&tables, |t| &t.indexes) {
        out.statements(generator.script_index(table, index, &constraint_opts)?)?;
    }

    out.blank_line()?;
    out.section("FOREIGN KEYS")?;
    for (table, fk) in children(&tables, |t| &t.foreign_keys) {
        out.statements(generator.script_foreign_key(table, fk, &constraint_opts)?)?;
    }

    out.blank_line()?;
    out.section("CHECKS")?;
    for (table, check) in children(&tables, |t| &t.check_constraints) {
        out.statements(generator.script_check(table, check, &constraint_opts)?)?;
    }

    Ok(tables.len())
}

/// Child objects of all tables, sorted by their own name across tables.
fn children<'t, C, P>(tables: &'t [Table], pick: P) -> Vec<(&'t Table, &'t C)>
where
    C: CatalogObject,
    P: Fn(&'t Table) -> &'t Vec<C>,
{
    let mut all: Vec<(&Table, &C)> = tables
        .iter()
        .flat_map(|t| pick(t).iter().map(move |c| (t, c)))
        .collect();
    all.sort_by(|a, b| ordinal_cmp(a.1, b.1).then_with(|| ordinal_cmp(a.0, b.0)));
    all
}
