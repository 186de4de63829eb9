//! Error types for the scripting library.

use thiserror::Error;

/// Exit code for configuration and usage errors.
pub const EXIT_CONFIG_ERROR: u8 = 1;

/// Exit code for database connection, catalog and query errors.
pub const EXIT_DATABASE_ERROR: u8 = 2;

/// Exit code for file system errors.
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for scripting operations.
#[derive(Error, Debug)]
pub enum ScriptGenError {
    /// Configuration error (missing attribute, missing server/database, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// An include/exclude pattern failed to compile.
    #[error("Invalid RegEx: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Malformed options document.
    #[error("Options file error: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// Source database connection or query error
    #[error("Source database error: {0}")]
    Source(#[from] tiberius::error::Error),

    /// Connection pool error with context
    #[error("Pool error: {message}\n  Context: {context}")]
    Pool { message: String, context: String },

    /// Catalog enumeration failed for a specific object
    #[error("Catalog access failed for {object}: {message}")]
    Catalog { object: String, message: String },

    /// Row query failed for a specific table
    #[error("Value export failed for table {table}")]
    Query {
        table: String,
        #[source]
        source: Box<ScriptGenError>,
    },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScriptGenError {
    /// Create a Pool error with context about where it occurred
    pub fn pool(message: impl ToString, context: impl Into<String>) -> Self {
        ScriptGenError::Pool {
            message: message.to_string(),
            context: context.into(),
        }
    }

    /// Create a Catalog error
    pub fn catalog(object: impl Into<String>, message: impl ToString) -> Self {
        ScriptGenError::Catalog {
            object: object.into(),
            message: message.to_string(),
        }
    }

    /// Wrap a row query failure with the table it was reading
    pub fn query(table: impl Into<String>, source: ScriptGenError) -> Self {
        ScriptGenError::Query {
            table: table.into(),
            source: Box::new(source),
        }
    }

    /// Process exit code for this error category.
    pub fn exit_code(&self) -> u8 {
        match self {
            ScriptGenError::Config(_)
            | ScriptGenError::InvalidPattern { .. }
            | ScriptGenError::Xml(_)
            | ScriptGenError::Json(_) => EXIT_CONFIG_ERROR,
            ScriptGenError::Source(_)
            | ScriptGenError::Pool { .. }
            | ScriptGenError::Catalog { .. }
            | ScriptGenError::Query { .. } => EXIT_DATABASE_ERROR,
            ScriptGenError::Io(_) => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for scripting operations.
pub type Result<T> = std::result::Result<T, ScriptGenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            ScriptGenError::Config("x".into()).exit_code(),
            EXIT_CONFIG_ERROR
        );
        assert_eq!(
            ScriptGenError::query("Users", ScriptGenError::Config("bad where".into())).exit_code(),
            EXIT_DATABASE_ERROR
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(ScriptGenError::from(io).exit_code(), EXIT_IO_ERROR);
    }

    #[test]
    fn test_invalid_pattern_names_pattern_and_cause() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = ScriptGenError::InvalidPattern {
            pattern: "(unclosed".into(),
            source,
        };
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: Invalid RegEx: (unclosed"));
        assert!(detailed.contains("Caused by:"));
        assert_eq!(err.exit_code(), EXIT_CONFIG_ERROR);
    }

    #[test]
    fn test_query_error_keeps_cause_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "Invalid column name 'x'");
        let err = ScriptGenError::query("Orders", ScriptGenError::from(io));
        assert_eq!(err.to_string(), "Value export failed for table Orders");

        let detailed = err.format_detailed();
        assert!(detailed.contains("Caused by:\n  1: IO error: Invalid column name 'x'"));
        assert!(detailed.contains("Caused by:\n  2: Invalid column name 'x'"));
    }
}
