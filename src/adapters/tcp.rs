use crate::core::Probe;
use crate::utils::error::{ProbeError, ProbeResult, Result};
use crate::utils::validation::validate_host_port;
use std::io::ErrorKind;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Succeeds as soon as any resolved address accepts a TCP connection.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(address: &str, timeout: Duration) -> Result<Self> {
        let (host, port) = validate_host_port("tcp", address)?;
        Ok(Self {
            host,
            port,
            timeout,
        })
    }

    fn resolve(&self) -> std::result::Result<Vec<SocketAddr>, ProbeError> {
        // 容器啟動時 DNS 可能尚未就緒，解析失敗視為暫時性錯誤
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| ProbeError::operational(format!("cannot resolve {}: {}", self.host, e)))?
            .collect();

        if addrs.is_empty() {
            return Err(ProbeError::operational(format!(
                "{} resolved to no addresses",
                self.host
            )));
        }
        Ok(addrs)
    }
}

impl Probe for TcpProbe {
    fn check(&mut self) -> ProbeResult {
        let mut last_error = None;

        for addr in self.resolve()? {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(_stream) => return Ok(()),
                Err(e) => {
                    tracing::debug!("TCP connect to {} failed: {}", addr, e);
                    last_error = Some(classify_io_error(&addr.to_string(), e));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| ProbeError::operational(format!("no address for {}", self.host))))
    }

    fn describe(&self) -> String {
        format!("tcp {}:{}", self.host, self.port)
    }
}

pub(crate) fn classify_io_error(target: &str, error: std::io::Error) -> ProbeError {
    match error.kind() {
        ErrorKind::ConnectionRefused => {
            ProbeError::refused(format!("{}: {}", target, error))
        }
        ErrorKind::PermissionDenied | ErrorKind::InvalidInput | ErrorKind::Unsupported => {
            ProbeError::fatal(error)
        }
        _ => ProbeError::operational(format!("{}: {}", target, error)),
    }
}
