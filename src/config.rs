use crate::domain::accumulator::Precision;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Runtime settings for the calculator service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Address of the embedded router endpoint.
    pub listen: SocketAddr,
    /// Port of the static web server, `0` disables it.
    pub web_port: u16,
    pub web_root: PathBuf,
    pub precision: Precision,
    pub debug: bool,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::LOCALHOST, 9000)),
            web_port: 8080,
            web_root: PathBuf::from("."),
            precision: Precision::DEFAULT,
            debug: false,
        }
    }
}

impl CalculatorConfig {
    /// Address of the static web server, if enabled.
    pub fn web_addr(&self) -> Option<SocketAddr> {
        (self.web_port != 0).then(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.web_port)))
    }

    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "rpc_calculator=debug,tower_http=debug"
        } else {
            "rpc_calculator=info"
        }
    }
}
