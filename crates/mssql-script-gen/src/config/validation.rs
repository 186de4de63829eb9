//! Configuration validation.

use super::Config;
use crate::error::{Result, ScriptGenError};

/// Validate the configuration.
///
/// Everything that can be checked without a database connection is checked
/// here, so a bad options file fails before any output is produced.
pub fn validate(config: &Config) -> Result<()> {
    config.target_version()?;

    for section in &config.script_tables {
        require_output_file("scriptTables", &section.output_file)?;
        // Compiling reports the first bad pattern by name.
        section.name_filter()?;
    }

    for (name, sections) in [
        ("scriptTriggers", &config.script_triggers),
        ("scriptUserDefinedTypes", &config.script_user_types),
        ("scriptProcs", &config.script_procs),
        ("scriptViews", &config.script_views),
        ("scriptUDFs", &config.script_udfs),
    ] {
        for section in sections {
            require_output_file(name, &section.output_file)?;
        }
    }

    for section in &config.script_values {
        require_output_file("scriptValues", &section.output_file)?;
        for table in &section.tables {
            if table.name.trim().is_empty() {
                return Err(ScriptGenError::Config(
                    "scriptValues/table requires a name attribute".into(),
                ));
            }
            table.to_export_spec()?;
        }
    }

    Ok(())
}

fn require_output_file(section: &str, output_file: &str) -> Result<()> {
    if output_file.trim().is_empty() {
        return Err(ScriptGenError::Config(format!(
            "{} requires a non-empty outputFile attribute",
            section
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputSection, ValuesSection, ValuesTableEntry};

    fn empty_config() -> Config {
        quick_xml::de::from_str("<scriptOptions />").unwrap()
    }

    #[test]
    fn test_valid_config() {
        let config = empty_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_output_file() {
        let mut config = empty_config();
        config.script_views.push(OutputSection {
            output_file: "  ".to_string(),
        });
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("scriptViews"));
    }

    #[test]
    fn test_values_table_without_name() {
        let mut config = empty_config();
        config.script_values.push(ValuesSection {
            output_file: "values.sql".to_string(),
            tables: vec![ValuesTableEntry {
                name: String::new(),
                top: None,
                where_clause: None,
            }],
        });
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_negative_top_rejected() {
        let mut config = empty_config();
        config.script_values.push(ValuesSection {
            output_file: "values.sql".to_string(),
            tables: vec![ValuesTableEntry {
                name: "Users".to_string(),
                top: Some("-1".to_string()),
                where_clause: None,
            }],
        });
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("top must be a non-negative integer"));
    }
}
