//! Failures that stop the server from starting or keep running.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Result of server startup and serve operations.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// What went wrong while bringing the server up or keeping it running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The resolved configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The listener could not bind the requested address.
    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The accept loop died after startup.
    #[error("runtime error: {0}")]
    Runtime(#[source] io::Error),
}

impl ServerError {
    /// Wraps a bind failure together with the address it was for.
    pub fn bind(address: SocketAddr, source: io::Error) -> Self {
        Self::Bind {
            address: address.to_string(),
            source,
        }
    }

    /// A remediation hint suitable for printing under the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig(_) => {
                Some("Check the server arguments and environment variables")
            }
            Self::Bind { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => {
                    Some("Ports below 1024 need elevated privileges; pick a higher port")
                }
                io::ErrorKind::AddrInUse => {
                    Some("Another process holds this port; stop it or pick a different port")
                }
                io::ErrorKind::AddrNotAvailable => {
                    Some("No interface has this address; check the HOST setting")
                }
                _ => Some("Check network configuration and firewall settings"),
            },
            Self::Runtime(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_error_carries_address() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let error = ServerError::bind(addr, io::Error::other("test"));

        assert!(error.to_string().contains("127.0.0.1:8080"));
    }

    #[test]
    fn bind_errors_have_suggestions() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let error = ServerError::bind(
            addr,
            io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        );

        assert!(error.suggestion().is_some());
    }

    #[test]
    fn runtime_errors_have_no_suggestion() {
        let error = ServerError::Runtime(io::Error::other("test"));
        assert!(error.suggestion().is_none());
    }
}
