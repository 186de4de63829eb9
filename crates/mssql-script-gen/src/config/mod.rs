//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::Path;

use crate::error::{Result, ScriptGenError};
use crate::filter::NameFilter;

impl Config {
    /// Load configuration from an XML options file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_xml(&content)
    }

    /// Parse configuration from an XML string.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let config: Config = quick_xml::de::from_str(xml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Parsed target dialect version.
    pub fn target_version(&self) -> Result<TargetVersion> {
        match self.sql_version.as_deref() {
            Some(v) => TargetVersion::parse(v),
            None => Ok(TargetVersion::default()),
        }
    }

    /// Resolve connection settings.
    ///
    /// Attributes present in the options file win over the positional
    /// `server`/`database` values given on the command line.
    pub fn connection(
        &self,
        server: Option<&str>,
        database: Option<&str>,
    ) -> Result<ConnectionSettings> {
        let server = self
            .server
            .as_deref()
            .or(server)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ScriptGenError::Config("server not specified".into()))?;

        let database = self
            .database
            .as_deref()
            .or(database)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ScriptGenError::Config("database not specified".into()))?;

        let (host, port) = split_host_port(server, self.port.unwrap_or(DEFAULT_MSSQL_PORT))?;

        Ok(ConnectionSettings {
            host,
            port,
            database: database.to_string(),
            user: self.user.clone(),
            password: self.password.clone(),
            encrypt: self.encrypt,
            trust_server_cert: self.trust_server_cert,
        })
    }
}

impl TablesSection {
    /// Compile this section's include/exclude patterns.
    pub fn name_filter(&self) -> Result<NameFilter> {
        NameFilter::new(
            self.include.iter().map(|p| p.pattern.as_str()),
            self.exclude.iter().map(|p| p.pattern.as_str()),
        )
    }
}

/// Split `host,port` into its parts, falling back to `default_port`.
fn split_host_port(server: &str, default_port: u16) -> Result<(String, u16)> {
    match server.split_once(',') {
        Some((host, port)) => {
            let port = port.trim().parse::<u16>().map_err(|_| {
                ScriptGenError::Config(format!("invalid port in server '{}'", server))
            })?;
            Ok((host.trim().to_string(), port))
        }
        None => Ok((server.trim().to_string(), default_port)),
    }
}
