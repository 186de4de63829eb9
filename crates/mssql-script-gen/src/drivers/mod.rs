//! Database driver implementations of the core traits.
//!
//! - [`mssql`]: Microsoft SQL Server catalog, row source and generator

pub mod mssql;

pub use mssql::{MssqlCatalog, MssqlGenerator};
