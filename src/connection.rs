//! Connection Module
//!
//! Opens and owns the single SQL Server connection used to apply the schema.
//!
//! This module wraps a `tiberius::Client` and provides:
//! - Connection string validation (ADO.NET `key=value;` format)
//! - Connection establishment with a connect timeout and gateway redirects
//! - Blocking execution on top of the async driver
//!
//! The driver is async; a private current-thread tokio runtime drives it so
//! callers see plain blocking calls.

use std::time::{Duration, Instant};
use tiberius::{Client, Config};
use tokio::net::TcpStream;
use tokio::runtime::{Builder, Runtime};
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

/// Connect timeout used when none is configured (SqlClient's default)
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

type MssqlClient = Client<Compat<TcpStream>>;

/// Connection error type
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Connection string rejected before any network activity
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),
    /// Login, TLS or protocol error from the driver
    #[error("SQL Server error: {0}")]
    Mssql(#[from] tiberius::error::Error),
    /// Socket or runtime setup error
    #[error("Connection I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The server did not complete the handshake in time
    #[error("Timed out after {}s connecting to {addr}", .timeout.as_secs())]
    Timeout { addr: String, timeout: Duration },
}

/// An open SQL Server connection.
///
/// The socket is released when the value is dropped; [`MssqlConnection::close`]
/// additionally ends the session cleanly.
pub struct MssqlConnection {
    // Declared before `runtime` so the socket is dropped while the reactor is alive
    client: MssqlClient,
    runtime: Runtime,
    addr: String,
}

impl MssqlConnection {
    /// Run a statement that returns no rows, returning the rows affected
    pub fn execute(&mut self, sql: &str) -> Result<u64, tiberius::error::Error> {
        let result = self.runtime.block_on(self.client.execute(sql, &[]))?;
        Ok(result.rows_affected().iter().sum())
    }

    /// Server address this connection was opened against (`host:port`)
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Close the session
    pub fn close(self) -> Result<(), ConnectionError> {
        let MssqlConnection {
            client,
            runtime,
            addr,
        } = self;
        runtime.block_on(client.close())?;
        log::info!("Closed connection to {}", addr);
        Ok(())
    }
}

/// Establishes a connection using [`DEFAULT_CONNECT_TIMEOUT`]
///
/// # Examples
///
/// ```no_run
/// use dataverse_to_sql::connection::connect;
///
/// let conn = connect("Server=tcp:localhost,1433;Database=crm;User Id=sa;Password=secret;TrustServerCertificate=true")?;
/// conn.close()?;
/// # Ok::<(), dataverse_to_sql::connection::ConnectionError>(())
/// ```
pub fn connect(connection_string: &str) -> Result<MssqlConnection, ConnectionError> {
    connect_with_timeout(connection_string, DEFAULT_CONNECT_TIMEOUT)
}

/// Establishes a connection, giving up after `timeout`
pub fn connect_with_timeout(
    connection_string: &str,
    timeout: Duration,
) -> Result<MssqlConnection, ConnectionError> {
    validate_connection_string(connection_string)?;

    let config = Config::from_ado_string(connection_string)
        .map_err(|e| ConnectionError::InvalidConnectionString(e.to_string()))?;
    let addr = config.get_addr();

    let runtime = Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()?;

    let start = Instant::now();
    let client = runtime
        .block_on(async { tokio::time::timeout(timeout, open_client(config)).await })
        .map_err(|_| ConnectionError::Timeout {
            addr: addr.clone(),
            timeout,
        })??;

    log::info!("Connected to {} in {:?}", addr, start.elapsed());
    Ok(MssqlConnection {
        client,
        runtime,
        addr,
    })
}

async fn open_client(mut config: Config) -> Result<MssqlClient, ConnectionError> {
    let tcp = TcpStream::connect(config.get_addr()).await?;
    tcp.set_nodelay(true)?;

    match Client::connect(config.clone(), tcp.compat_write()).await {
        Ok(client) => Ok(client),
        // Azure SQL gateways answer the login with the address of the actual node
        Err(tiberius::error::Error::Routing { host, port }) => {
            log::debug!("Login redirected to {}:{}", host, port);
            config.host(&host);
            config.port(port);

            let tcp = TcpStream::connect(config.get_addr()).await?;
            tcp.set_nodelay(true)?;
            Ok(Client::connect(config, tcp.compat_write()).await?)
        }
        Err(e) => Err(e.into()),
    }
}

/// Validates a connection string format
///
/// Accepts ADO.NET style strings: `;`-separated `key=value` pairs, e.g.
/// `Server=tcp:host,1433;Database=crm;User Id=sa;Password=secret`.
pub fn validate_connection_string(connection_string: &str) -> Result<(), ConnectionError> {
    if connection_string.trim().is_empty() {
        return Err(ConnectionError::InvalidConnectionString(
            "Connection string cannot be empty".to_string(),
        ));
    }

    let has_pair = connection_string
        .split(';')
        .filter_map(|part| part.split_once('='))
        .any(|(key, _)| !key.trim().is_empty());

    if !has_pair {
        return Err(ConnectionError::InvalidConnectionString(
            "Connection string must contain key=value pairs (Server=...;Database=...)".to_string(),
        ));
    }

    Ok(())
}
