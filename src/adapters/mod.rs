// Adapters layer: concrete probes and clocks for real systems.

pub mod clock;
pub mod http;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod tcp;

use crate::core::{Probe, Target};
use crate::utils::error::Result;
use std::time::Duration;

pub fn build_probe(target: &Target, timeout: Duration) -> Result<Box<dyn Probe>> {
    match target {
        Target::Tcp { address } => Ok(Box::new(tcp::TcpProbe::new(address, timeout)?)),
        Target::Http { url } => Ok(Box::new(http::HttpProbe::new(url, timeout)?)),
        #[cfg(feature = "postgres")]
        Target::Postgres { url } => Ok(Box::new(postgres::PostgresProbe::new(url, timeout)?)),
        #[cfg(not(feature = "postgres"))]
        Target::Postgres { .. } => Err(crate::utils::error::WaitError::ConfigError {
            message: "built without the `postgres` feature; use --tcp to probe the port instead"
                .to_string(),
        }),
    }
}
