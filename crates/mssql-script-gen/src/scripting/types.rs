//! User-defined types, in three sections: CLR types, alias data types and
//! table types.

use std::io::Write;

use tracing::info;

use crate::config::TargetVersion;
use crate::core::{Catalog, ScriptGenerator, ScriptOptions, UserType, UserTypeKind};
use crate::error::Result;
use crate::writer::ScriptWriter;

use super::{include_all, select_objects};

pub async fn script_user_types<W: Write>(
    catalog: &dyn Catalog,
    generator: &dyn ScriptGenerator,
    version: TargetVersion,
    out: &mut ScriptWriter<W>,
) -> Result<usize> {
    let types = select_objects(catalog.user_types().await?, include_all);
    info!("Scripting {} user defined types", types.len());

    let opts = ScriptOptions::user_type(version);
    let sections: [(&str, fn(&UserTypeKind) -> bool); 3] = [
        ("User Defined Types", |k| matches!(k, UserTypeKind::Clr { .. })),
        ("User Defined Data Types", |k| matches!(k, UserTypeKind::Alias { .. })),
        ("User Defined Table Types", |k| matches!(k, UserTypeKind::Table { .. })),
    ];

    for (title, belongs) in sections {
        out.section(title)?;
        for user_type in types.iter().filter(|t: &&UserType| belongs(&t.kind)) {
            out.statements(generator.script_user_type(user_type, &opts)?)?;
        }
        out.blank_line()?;
    }

    Ok(types.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::mssql::MssqlGenerator;
    use crate::testing::{column, MemoryCatalog};

    fn user_type(name: &str, kind: UserTypeKind) -> UserType {
        UserType {
            name: name.into(),
            schema: "dbo".into(),
            is_system_object: false,
            kind,
        }
    }

    fn catalog() -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new();
        catalog.user_types = vec![
            user_type(
                "Phone",
                UserTypeKind::Alias {
                    base_type: "varchar".into(),
                    max_length: 20,
                    precision: 0,
                    scale: 0,
                    is_nullable: true,
                },
            ),
            user_type(
                "IdList",
                UserTypeKind::Table {
                    columns: vec![column("Id", "int")],
                },
            ),
            user_type(
                "Email",
                UserTypeKind::Alias {
                    base_type: "nvarchar".into(),
                    max_length: 256,
                    precision: 0,
                    scale: 0,
                    is_nullable: false,
                },
            ),
            user_type(
                "Point",
                UserTypeKind::Clr {
                    assembly: "Geo".into(),
                    class_name: "Geo.Point".into(),
                },
            ),
        ];
        catalog
    }

    async fn render(version: TargetVersion) -> (usize, String) {
        let mut out = ScriptWriter::new(Vec::new());
        let count = script_user_types(&catalog(), &MssqlGenerator, version, &mut out)
            .await
            .unwrap();
        (count, String::from_utf8(out.finish().unwrap()).unwrap())
    }

    #[tokio::test]
    async fn test_sections_in_order_and_sorted() {
        let (count, script) = render(TargetVersion::Version100).await;
        assert_eq!(count, 4);

        let clr = script.find("-- User Defined Types").unwrap();
        let point = script.find("CREATE TYPE [dbo].[Point]").unwrap();
        let alias = script.find("-- User Defined Data Types").unwrap();
        let email = script.find("CREATE TYPE [dbo].[Email]").unwrap();
        let phone = script.find("CREATE TYPE [dbo].[Phone]").unwrap();
        let table = script.find("-- User Defined Table Types").unwrap();
        let id_list = script.find("CREATE TYPE [dbo].[IdList] AS TABLE").unwrap();

        assert!(clr < point && point < alias);
        assert!(alias < email && email < phone && phone < table);
        assert!(table < id_list);
    }

    #[tokio::test]
    async fn test_table_types_skipped_before_2008() {
        let (_, script) = render(TargetVersion::Version90).await;
        assert!(script.contains("-- User Defined Table Types"));
        assert!(!script.contains("AS TABLE"));
        assert!(script.contains("CREATE TYPE [dbo].[Phone]"));
    }
}
