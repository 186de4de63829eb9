//! Scripting engine: object selection, ordering and emission per category.
//!
//! Every category follows the same steps: enumerate candidates from the
//! [`Catalog`](crate::core::Catalog), drop system objects, apply the name
//! predicate, sort ordinally, then emit through a
//! [`ScriptWriter`](crate::writer::ScriptWriter). Sorting makes repeated runs
//! against an unchanged schema byte-identical.

pub mod routines;
pub mod tables;
pub mod types;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{ordinal_cmp, CatalogObject};

pub use routines::{drop_statement, script_functions, script_procedures, script_triggers, script_views};
pub use tables::script_tables;
pub use types::script_user_types;

/// Output category, one per configuration section kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Tables,
    Triggers,
    UserTypes,
    Procedures,
    Views,
    Functions,
    Values,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Tables => "tables",
            Category::Triggers => "triggers",
            Category::UserTypes => "user defined types",
            Category::Procedures => "procedures",
            Category::Views => "views",
            Category::Functions => "functions",
            Category::Values => "values",
        };
        f.write_str(s)
    }
}

/// Drop system objects, keep those whose name passes `include`, sort ordinally.
pub fn select_objects<T, F>(objects: Vec<T>, include: F) -> Vec<T>
where
    T: CatalogObject,
    F: Fn(&str) -> bool,
{
    let mut selected: Vec<T> = objects
        .into_iter()
        .filter(|o| !o.is_system_object())
        .filter(|o| include(o.name()))
        .collect();
    selected.sort_by(ordinal_cmp);
    selected
}

/// Predicate that accepts every name.
pub fn include_all(_: &str) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ObjectKind;
    use crate::testing::SchemaObject;

    fn obj(name: &str, system: bool) -> SchemaObject {
        SchemaObject {
            name: name.into(),
            schema: "dbo".into(),
            kind: ObjectKind::Table,
            is_system_object: system,
        }
    }

    #[test]
    fn test_select_objects_drops_system_and_sorts() {
        let selected = select_objects(
            vec![obj("zeta", false), obj("sysdiagrams", true), obj("Alpha", false), obj("beta", false)],
            include_all,
        );
        let names: Vec<&str> = selected.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_select_objects_applies_predicate() {
        let selected = select_objects(vec![obj("Orders", false), obj("Users", false)], |n| {
            n.starts_with('O')
        });
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Orders");
    }

    #[test]
    fn test_select_objects_is_stable_across_input_order() {
        let a = select_objects(vec![obj("b", false), obj("a", false), obj("c", false)], include_all);
        let b = select_objects(vec![obj("c", false), obj("b", false), obj("a", false)], include_all);
        assert_eq!(a, b);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::UserTypes.to_string(), "user defined types");
        assert_eq!(
            serde_json::to_string(&Category::UserTypes).unwrap(),
            "\"userTypes\""
        );
    }
}
