//! Identifier validation and quoting for generated T-SQL.
//!
//! Identifiers cannot be parameterized, so every name that ends up in a
//! generated script goes through this module. Names are validated (no null
//! bytes, bounded length) and then either bracket-quoted with `]` doubled, or
//! emitted bare when they are plain regular identifiers.

use crate::error::{Result, ScriptGenError};

/// SQL Server's identifier limit (`sysname` is `nvarchar(128)`).
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Reserved words that force bracketing even when the name is otherwise plain.
const RESERVED: &[&str] = &[
    "add", "all", "alter", "and", "any", "as", "asc", "authorization", "backup", "begin",
    "between", "break", "browse", "bulk", "by", "cascade", "case", "check", "checkpoint",
    "close", "clustered", "coalesce", "collate", "column", "commit", "compute", "constraint",
    "contains", "continue", "convert", "create", "cross", "current", "cursor", "database",
    "dbcc", "deallocate", "declare", "default", "delete", "deny", "desc", "distinct",
    "distributed", "double", "drop", "else", "end", "errlvl", "escape", "except", "exec",
    "execute", "exists", "exit", "external", "fetch", "file", "fillfactor", "for", "foreign",
    "from", "full", "function", "goto", "grant", "group", "having", "holdlock", "identity",
    "if", "in", "index", "inner", "insert", "intersect", "into", "is", "join", "key", "kill",
    "left", "like", "lineno", "merge", "national", "nocheck", "nonclustered", "not", "null",
    "nullif", "of", "off", "offsets", "on", "open", "option", "or", "order", "outer", "over",
    "percent", "pivot", "plan", "precision", "primary", "print", "proc", "procedure",
    "public", "raiserror", "read", "reconfigure", "references", "replication", "restore",
    "restrict", "return", "revert", "revoke", "right", "rollback", "rowcount", "rowguidcol",
    "rule", "save", "schema", "select", "session_user", "set", "setuser", "shutdown", "some",
    "statistics", "system_user", "table", "tablesample", "textsize", "then", "to", "top",
    "tran", "transaction", "trigger", "truncate", "union", "unique", "unpivot", "update",
    "updatetext", "use", "user", "values", "varying", "view", "waitfor", "when", "where",
    "while", "with", "writetext",
];

/// Validate an identifier.
///
/// Rejects empty names, names containing null bytes and names longer than
/// SQL Server allows.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ScriptGenError::Config(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(ScriptGenError::Config(format!(
            "Identifier contains null byte: {:?}",
            name
        )));
    }

    if name.chars().count() > MAX_IDENTIFIER_LENGTH {
        return Err(ScriptGenError::Config(format!(
            "Identifier exceeds maximum length of {} characters: {:?}",
            MAX_IDENTIFIER_LENGTH, name
        )));
    }

    Ok(())
}

/// Quote a SQL Server identifier using brackets.
///
/// ```ignore
/// assert_eq!(quote_mssql("users")?, "[users]");
/// assert_eq!(quote_mssql("table]name")?, "[table]]name]");
/// ```
pub fn quote_mssql(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(bracket(name))
}

/// Qualify a SQL Server object name with its schema: `[schema].[name]`.
pub fn qualify_mssql(schema: &str, name: &str) -> Result<String> {
    Ok(format!("{}.{}", quote_mssql(schema)?, quote_mssql(name)?))
}

/// Emit a name bare when it is a regular identifier, bracketed otherwise.
///
/// Used for column lists in generated INSERT statements, where `Id` reads
/// better than `[Id]` but `Order Date` or `select` still need brackets.
pub fn quote_if_needed(name: &str) -> Result<String> {
    validate_identifier(name)?;
    if is_regular_identifier(name) {
        Ok(name.to_string())
    } else {
        Ok(bracket(name))
    }
}

/// Whether `name` follows the rules for regular (unquoted) identifiers.
pub fn is_regular_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let first_ok = match chars.next() {
        Some(c) => c.is_alphabetic() || c == '_' || c == '@' || c == '#',
        None => false,
    };

    first_ok
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '@' | '#' | '$'))
        && !RESERVED.contains(&name.to_ascii_lowercase().as_str())
}

fn bracket(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier_normal() {
        assert!(validate_identifier("users").is_ok());
        assert!(validate_identifier("Order Details").is_ok());
    }

    #[test]
    fn test_validate_identifier_rejects_empty() {
        assert!(validate_identifier("").is_err());
    }

    #[test]
    fn test_validate_identifier_rejects_null_byte() {
        let err = validate_identifier("users\0; DROP TABLE x").unwrap_err();
        assert!(err.to_string().contains("null byte"));
    }

    #[test]
    fn test_validate_identifier_length_limit() {
        assert!(validate_identifier(&"a".repeat(128)).is_ok());
        assert!(validate_identifier(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_quote_mssql_normal() {
        assert_eq!(quote_mssql("users").unwrap(), "[users]");
        assert_eq!(quote_mssql("Order Details").unwrap(), "[Order Details]");
    }

    #[test]
    fn test_quote_mssql_escapes_bracket() {
        assert_eq!(quote_mssql("table]name").unwrap(), "[table]]name]");
    }

    #[test]
    fn test_quote_mssql_injection_safely_quoted() {
        let quoted = quote_mssql("x]; DROP TABLE users; --").unwrap();
        assert_eq!(quoted, "[x]]; DROP TABLE users; --]");
    }

    #[test]
    fn test_qualify_mssql() {
        assert_eq!(qualify_mssql("dbo", "Users").unwrap(), "[dbo].[Users]");
        assert!(qualify_mssql("", "Users").is_err());
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("Id").unwrap(), "Id");
        assert_eq!(quote_if_needed("first_name").unwrap(), "first_name");
        assert_eq!(quote_if_needed("Order Date").unwrap(), "[Order Date]");
        assert_eq!(quote_if_needed("2fa").unwrap(), "[2fa]");
        assert_eq!(quote_if_needed("Key").unwrap(), "[Key]");
        assert_eq!(quote_if_needed("a]b").unwrap(), "[a]]b]");
    }
}
