//! Connection Descriptor
//!
//! Parses store connection strings. Two forms are accepted:
//! - URL form: `redis://[:password@]host[:port][/db]` (or `rediss://`), percent-encoded
//! - Option-list form: `host[:port][,host2...],password=...,defaultDatabase=N,ssl=true,connectTimeout=ms`
//!
//! Option-list values are taken verbatim, so passwords may contain `@`, `/` or `#`.

use std::time::Duration;

use ::redis::{ConnectionAddr, ConnectionInfo, IntoConnectionInfo, RedisConnectionInfo};

use crate::error::StoreError;

// == Public Constants ==
/// Port used when an endpoint does not name one
pub const DEFAULT_PORT: u16 = 6379;

/// Time allowed for the initial connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(5000);

// == Connection Descriptor ==
/// A parsed store connection string.
#[derive(Debug, Clone)]
pub struct ConnectionDescriptor {
    info: ConnectionInfo,
    connect_timeout: Duration,
}

impl ConnectionDescriptor {
    // == Parse ==
    /// Parses a connection string in either accepted form.
    ///
    /// Only the first endpoint of an option list is used. Unknown options are
    /// ignored, as is `abortConnect` since connections are never retried.
    pub fn parse(descriptor: &str) -> Result<Self, StoreError> {
        let descriptor = descriptor.trim();
        if descriptor.is_empty() {
            return Err(StoreError::InvalidDescriptor(
                "connection descriptor is empty".to_string(),
            ));
        }

        if descriptor.contains("://") {
            let info = descriptor
                .into_connection_info()
                .map_err(|e| StoreError::InvalidDescriptor(format!("invalid URL: {}", e)))?;
            return Ok(Self {
                info,
                connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            });
        }

        let mut endpoints = Vec::new();
        let mut password: Option<String> = None;
        let mut database: i64 = 0;
        let mut tls = false;
        let mut connect_timeout = DEFAULT_CONNECT_TIMEOUT;

        for part in descriptor.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((name, value)) = part.split_once('=') else {
                endpoints.push(part);
                continue;
            };

            let value = value.trim();
            match name.trim().to_ascii_lowercase().as_str() {
                "password" => password = Some(value.to_string()),
                "defaultdatabase" => {
                    database = value.parse().map_err(|_| {
                        StoreError::InvalidDescriptor(format!("invalid defaultDatabase '{}'", value))
                    })?
                }
                "ssl" => tls = parse_bool(value)?,
                "connecttimeout" => {
                    let millis: u64 = value.parse().map_err(|_| {
                        StoreError::InvalidDescriptor(format!("invalid connectTimeout '{}'", value))
                    })?;
                    connect_timeout = Duration::from_millis(millis);
                }
                _ => {}
            }
        }

        let endpoint = endpoints.first().ok_or_else(|| {
            StoreError::InvalidDescriptor(format!("no endpoint in '{}'", descriptor))
        })?;
        let (host, port) = split_endpoint(endpoint)?;
        let host = host.to_string();

        let addr = if tls {
            ConnectionAddr::TcpTls {
                host,
                port,
                insecure: false,
                tls_params: None,
            }
        } else {
            ConnectionAddr::Tcp(host, port)
        };

        Ok(Self {
            info: ConnectionInfo {
                addr,
                redis: RedisConnectionInfo {
                    db: database,
                    password,
                    ..Default::default()
                },
            },
            connect_timeout,
        })
    }

    /// Client connection details for the first endpoint.
    pub fn connection_info(&self) -> &ConnectionInfo {
        &self.info
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

// == Helpers ==
fn split_endpoint(endpoint: &str) -> Result<(&str, u16), StoreError> {
    match endpoint.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.parse().map_err(|_| {
                StoreError::InvalidDescriptor(format!("invalid port in endpoint '{}'", endpoint))
            })?;
            Ok((host, port))
        }
        None => Ok((endpoint, DEFAULT_PORT)),
    }
}

fn parse_bool(value: &str) -> Result<bool, StoreError> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(StoreError::InvalidDescriptor(format!(
            "expected true or false, got '{}'",
            other
        ))),
    }
}
