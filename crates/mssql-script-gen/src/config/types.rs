//! Configuration type definitions for the XML options document.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScriptGenError};

/// Root `scriptOptions` element.
///
/// Connection attributes are optional here; [`Config::connection`] merges them
/// with positional command-line values.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename = "scriptOptions")]
pub struct Config {
    /// SQL Server host, optionally `host,port`.
    #[serde(rename = "@server", default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Database name.
    #[serde(rename = "@database", default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// SQL login. Absent together with `password` means integrated authentication.
    #[serde(rename = "@user", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// SQL login password.
    #[serde(rename = "@password", default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Target dialect version (default: SQL2005).
    #[serde(rename = "@sqlVersion", default, skip_serializing_if = "Option::is_none")]
    pub sql_version: Option<String>,

    /// TCP port (default: 1433). Ignored when `server` carries `host,port`.
    #[serde(rename = "@port", default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Encrypt connection (default: true).
    #[serde(rename = "@encrypt", default = "default_true")]
    pub encrypt: bool,

    /// Trust server certificate (default: false).
    #[serde(rename = "@trustServerCertificate", default)]
    pub trust_server_cert: bool,

    /// Table scripting sections.
    #[serde(rename = "scriptTables", default)]
    pub script_tables: Vec<TablesSection>,

    /// Trigger scripting sections.
    #[serde(rename = "scriptTriggers", default)]
    pub script_triggers: Vec<OutputSection>,

    /// User-defined type scripting sections.
    #[serde(rename = "scriptUserDefinedTypes", default)]
    pub script_user_types: Vec<OutputSection>,

    /// Stored procedure scripting sections.
    #[serde(rename = "scriptProcs", default)]
    pub script_procs: Vec<OutputSection>,

    /// View scripting sections.
    #[serde(rename = "scriptViews", default)]
    pub script_views: Vec<OutputSection>,

    /// User-defined function scripting sections.
    #[serde(rename = "scriptUDFs", default)]
    pub script_udfs: Vec<OutputSection>,

    /// Row data scripting sections.
    #[serde(rename = "scriptValues", default)]
    pub script_values: Vec<ValuesSection>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("sql_version", &self.sql_version)
            .field("port", &self.port)
            .field("encrypt", &self.encrypt)
            .field("trust_server_cert", &self.trust_server_cert)
            .field("script_tables", &self.script_tables)
            .field("script_triggers", &self.script_triggers)
            .field("script_user_types", &self.script_user_types)
            .field("script_procs", &self.script_procs)
            .field("script_views", &self.script_views)
            .field("script_udfs", &self.script_udfs)
            .field("script_values", &self.script_values)
            .finish()
    }
}

/// A section that only names its output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Output file, relative to the output directory.
    #[serde(rename = "@outputFile")]
    pub output_file: String,
}

/// `scriptTables` section with include/exclude patterns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablesSection {
    /// Output file, relative to the output directory.
    #[serde(rename = "@outputFile")]
    pub output_file: String,

    /// Include patterns, in document order.
    #[serde(rename = "include", default)]
    pub include: Vec<PatternEntry>,

    /// Exclude patterns, in document order.
    #[serde(rename = "exclude", default)]
    pub exclude: Vec<PatternEntry>,
}

/// An `include` or `exclude` element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternEntry {
    /// Regular expression tested against table names.
    #[serde(rename = "@match")]
    pub pattern: String,
}

/// `scriptValues` section listing tables whose rows are exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuesSection {
    /// Output file, relative to the output directory.
    #[serde(rename = "@outputFile")]
    pub output_file: String,

    /// Tables to export, in document order.
    #[serde(rename = "table", default)]
    pub tables: Vec<ValuesTableEntry>,
}

/// A `table` element inside `scriptValues`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuesTableEntry {
    /// Table name (matched case-insensitively against the catalog).
    #[serde(rename = "@name", default)]
    pub name: String,

    /// Row cap; absent or 0 means unlimited.
    #[serde(rename = "@top", default, skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,

    /// WHERE fragment appended verbatim.
    #[serde(rename = "@where", default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,
}

/// One table's row export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableExportSpec {
    /// Table name as configured.
    pub table_name: String,

    /// Maximum rows to export (0 = unlimited).
    pub row_limit: u32,

    /// Optional WHERE fragment, trusted and unescaped.
    pub where_clause: Option<String>,
}

impl ValuesTableEntry {
    /// Convert to an export spec, parsing the row cap.
    pub fn to_export_spec(&self) -> Result<TableExportSpec> {
        let row_limit = match self.top.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(top) => top.parse::<u32>().map_err(|_| {
                ScriptGenError::Config(format!(
                    "table {}: top must be a non-negative integer, got '{}'",
                    self.name, top
                ))
            })?,
        };

        let where_clause = self
            .where_clause
            .as_ref()
            .filter(|w| !w.trim().is_empty())
            .cloned();

        Ok(TableExportSpec {
            table_name: self.name.clone(),
            row_limit,
            where_clause,
        })
    }
}

impl ValuesSection {
    /// Export specs for every configured table, in document order.
    pub fn export_specs(&self) -> Result<Vec<TableExportSpec>> {
        self.tables.iter().map(|t| t.to_export_spec()).collect()
    }
}

/// SQL dialect version the generated scripts target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetVersion {
    /// SQL Server 2000.
    Version80,
    /// SQL Server 2005.
    Version90,
    /// SQL Server 2008.
    Version100,
    /// SQL Server 2008 R2.
    Version105,
    /// SQL Server 2012.
    Version110,
    /// SQL Server 2014.
    Version120,
    /// SQL Server 2016.
    Version130,
    /// SQL Server 2017.
    Version140,
    /// SQL Server 2019.
    Version150,
    /// SQL Server 2022.
    Version160,
}

impl Default for TargetVersion {
    fn default() -> Self {
        TargetVersion::Version90
    }
}

impl TargetVersion {
    /// Parse a `sqlVersion` attribute value.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim() {
            "SQL2000" | "Version80" => Ok(TargetVersion::Version80),
            "SQL2005" | "Version90" => Ok(TargetVersion::Version90),
            "SQL2008" | "Version100" => Ok(TargetVersion::Version100),
            "SQL2008R2" | "Version105" => Ok(TargetVersion::Version105),
            "Version110" => Ok(TargetVersion::Version110),
            "Version120" => Ok(TargetVersion::Version120),
            "Version130" => Ok(TargetVersion::Version130),
            "Version140" => Ok(TargetVersion::Version140),
            "Version150" => Ok(TargetVersion::Version150),
            "Version160" => Ok(TargetVersion::Version160),
            other => Err(ScriptGenError::Config(format!(
                "Invalid target server version specified: '{}'. Valid values: \
                 SQL2000, SQL2005, SQL2008, SQL2008R2, Version80..Version160",
                other
            ))),
        }
    }

    /// Whether index definitions may carry INCLUDE columns.
    pub fn supports_included_columns(self) -> bool {
        self >= TargetVersion::Version90
    }

    /// Whether filtered indexes and table types exist.
    pub fn supports_filtered_indexes(self) -> bool {
        self >= TargetVersion::Version100
    }

    /// Whether user-defined table types exist.
    pub fn supports_table_types(self) -> bool {
        self >= TargetVersion::Version100
    }
}

/// Resolved connection settings.
#[derive(Clone)]
pub struct ConnectionSettings {
    /// Host name.
    pub host: String,

    /// TCP port.
    pub port: u16,

    /// Database name.
    pub database: String,

    /// SQL login; `None` selects integrated authentication.
    pub user: Option<String>,

    /// SQL login password.
    pub password: Option<String>,

    /// Encrypt connection.
    pub encrypt: bool,

    /// Trust server certificate.
    pub trust_server_cert: bool,
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("encrypt", &self.encrypt)
            .field("trust_server_cert", &self.trust_server_cert)
            .finish()
    }
}

impl ConnectionSettings {
    /// Whether SQL Server authentication credentials are present.
    pub fn uses_sql_auth(&self) -> bool {
        self.user.as_deref().is_some_and(|u| !u.is_empty())
            || self.password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) const DEFAULT_MSSQL_PORT: u16 = 1433;
