//! Microsoft SQL Server driver.
//!
//! - [`MssqlCatalog`]: catalog metadata and row streaming over tiberius
//! - [`MssqlGenerator`]: T-SQL statement text for catalog objects

mod catalog;
mod connection;
mod generator;

pub use catalog::MssqlCatalog;
pub use generator::MssqlGenerator;
