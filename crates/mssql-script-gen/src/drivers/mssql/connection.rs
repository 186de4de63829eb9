//! Tiberius connection management.
//!
//! The scripting run is strictly sequential, so the pool holds a single
//! connection: each catalog call or row query checks it out and returns it
//! when the guard drops, on success and error paths alike.

use std::time::Duration;

use async_trait::async_trait;
use bb8::Pool;
use tiberius::{AuthMethod, Client, Config, EncryptionLevel};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{info, warn};

use crate::config::ConnectionSettings;
use crate::error::{Result, ScriptGenError};

/// Connection acquisition timeout (30 seconds).
const POOL_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// TCP keepalive interval (30 seconds).
const TCP_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

pub(crate) type MssqlClient = Client<Compat<TcpStream>>;

/// Connection manager for the bb8 pool.
#[derive(Clone)]
pub(crate) struct TiberiusConnectionManager {
    config: Config,
}

impl TiberiusConnectionManager {
    pub(crate) fn new(settings: &ConnectionSettings) -> Result<Self> {
        Ok(Self {
            config: build_config(settings)?,
        })
    }
}

fn build_config(settings: &ConnectionSettings) -> Result<Config> {
    let mut config = Config::new();
    config.host(&settings.host);
    config.port(settings.port);
    config.database(&settings.database);
    config.authentication(auth_method(settings)?);

    if settings.encrypt {
        if settings.trust_server_cert {
            config.trust_cert();
        }
        config.encryption(EncryptionLevel::Required);
    } else {
        config.encryption(EncryptionLevel::NotSupported);
    }

    Ok(config)
}

/// SQL Server authentication when a user or password is configured,
/// integrated authentication otherwise.
fn auth_method(settings: &ConnectionSettings) -> Result<AuthMethod> {
    if settings.uses_sql_auth() {
        return Ok(AuthMethod::sql_server(
            settings.user.as_deref().unwrap_or_default(),
            settings.password.as_deref().unwrap_or_default(),
        ));
    }
    integrated_auth()
}

#[cfg(feature = "integrated-auth")]
fn integrated_auth() -> Result<AuthMethod> {
    info!("Using integrated authentication");
    Ok(AuthMethod::Integrated)
}

#[cfg(not(feature = "integrated-auth"))]
fn integrated_auth() -> Result<AuthMethod> {
    Err(ScriptGenError::Config(
        "no user/password configured and integrated authentication is not available \
         (rebuild with the `integrated-auth` feature)"
            .into(),
    ))
}

#[async_trait]
impl bb8::ManageConnection for TiberiusConnectionManager {
    type Connection = MssqlClient;
    type Error = tiberius::error::Error;

    async fn connect(&self) -> std::result::Result<Self::Connection, Self::Error> {
        let config = self.config.clone();
        let tcp = TcpStream::connect(config.get_addr()).await.map_err(|e| {
            tiberius::error::Error::Io {
                kind: e.kind(),
                message: e.to_string(),
            }
        })?;

        tcp.set_nodelay(true).ok();

        // Enable TCP keepalives; long value exports can leave the socket idle
        // while the server runs a slow query.
        let std_tcp = tcp.into_std().map_err(|e| tiberius::error::Error::Io {
            kind: e.kind(),
            message: format!("Failed to convert socket: {}", e),
        })?;
        let socket = socket2::Socket::from(std_tcp);
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(TCP_KEEPALIVE_INTERVAL)
            .with_interval(TCP_KEEPALIVE_INTERVAL);
        if let Err(e) = socket.set_tcp_keepalive(&keepalive) {
            warn!("Failed to set TCP keepalive on MSSQL connection: {}", e);
        }

        let std_tcp: std::net::TcpStream = socket.into();
        std_tcp.set_nonblocking(true).ok();
        let tcp = TcpStream::from_std(std_tcp).map_err(|e| tiberius::error::Error::Io {
            kind: e.kind(),
            message: format!("Failed to convert socket: {}", e),
        })?;

        Client::connect(config, tcp.compat_write()).await
    }

    async fn is_valid(&self, conn: &mut Self::Connection) -> std::result::Result<(), Self::Error> {
        conn.simple_query("SELECT 1").await?.into_row().await?;
        Ok(())
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}

/// Build the single-connection pool and verify the server answers.
pub(crate) async fn connect_pool(
    settings: &ConnectionSettings,
) -> Result<Pool<TiberiusConnectionManager>> {
    let manager = TiberiusConnectionManager::new(settings)?;
    let pool = Pool::builder()
        .max_size(1)
        .connection_timeout(POOL_CONNECTION_TIMEOUT)
        .test_on_check_out(false)
        .build(manager)
        .await
        .map_err(|e| ScriptGenError::pool(e, "creating MSSQL connection pool"))?;

    {
        let mut conn = pool
            .get()
            .await
            .map_err(|e| ScriptGenError::pool(e, "testing MSSQL connection"))?;
        conn.simple_query("SELECT 1").await?.into_row().await?;
    }

    info!(
        "Connected to MSSQL: {}:{}/{}",
        settings.host, settings.port, settings.database
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(user: Option<&str>, password: Option<&str>) -> ConnectionSettings {
        ConnectionSettings {
            host: "localhost".into(),
            port: 1433,
            database: "Sales".into(),
            user: user.map(String::from),
            password: password.map(String::from),
            encrypt: true,
            trust_server_cert: true,
        }
    }

    #[test]
    fn test_sql_auth_selected_with_credentials() {
        let method = auth_method(&settings(Some("sa"), Some("pw"))).unwrap();
        assert!(matches!(method, AuthMethod::SqlServer(_)));
    }

    #[test]
    fn test_password_alone_selects_sql_auth() {
        assert!(auth_method(&settings(None, Some("pw"))).is_ok());
    }

    #[cfg(not(feature = "integrated-auth"))]
    #[test]
    fn test_integrated_auth_requires_feature() {
        let err = auth_method(&settings(None, None)).unwrap_err();
        assert!(matches!(err, ScriptGenError::Config(_)));
        assert!(err.to_string().contains("integrated-auth"));
    }

    #[test]
    fn test_manager_builds_config() {
        let manager = TiberiusConnectionManager::new(&settings(Some("sa"), Some("pw"))).unwrap();
        assert_eq!(manager.config.get_addr(), "localhost:1433");
    }
}
