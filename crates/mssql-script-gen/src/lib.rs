//! # mssql-script-gen
//!
//! Script SQL Server schema objects and table data into re-runnable,
//! deterministic SQL files.
//!
//! A run reads an XML options document naming one output file per section
//! and writes, in order: tables (with indexes, foreign keys and checks
//! deferred until every table exists), triggers, user-defined types,
//! procedures, views, functions and row values as INSERT statements.
//! Routines are scripted drop-before-create so the files replay cleanly
//! against a database that already has them.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mssql_script_gen::{Config, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> mssql_script_gen::Result<()> {
//!     let config = Config::load("options.xml")?;
//!     let settings = config.connection(Some("localhost"), Some("Sales"))?;
//!     let orchestrator = Orchestrator::connect(config, &settings, "scripts").await?;
//!     let result = orchestrator.run().await?;
//!     println!("Wrote {} files", result.files.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod drivers;
pub mod error;
pub mod filter;
pub mod orchestrator;
pub mod scripting;
pub mod values;
pub mod writer;

#[cfg(test)]
mod testing;

// Re-exports for convenient access
pub use config::{Config, ConnectionSettings, TableExportSpec, TargetVersion};
pub use error::{Result, ScriptGenError};
pub use filter::{NameFilter, NameFilterSpec};
pub use orchestrator::{Orchestrator, ScriptFileResult, ScriptRunResult};
pub use scripting::Category;
pub use values::{FormatContext, ValueExporter};
pub use writer::ScriptWriter;
