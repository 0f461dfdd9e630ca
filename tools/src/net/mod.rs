//! Network diagnostics — address classification, dns, ping and gateway.
//!
//! [`NetworkDiagnostics`] bundles the probes that need platform commands
//! or resolver settings; `ping_test` lives in [`ping`] and
//! `gateway_ping_test` in [`gateway`].

pub mod address;
pub mod dns;
pub mod gateway;
pub mod ping;

use std::sync::Arc;

use crate::command::{CommandRunner, SystemCommandRunner};
use crate::config::DiagnosticsConfig;
use dns::NameResolver;

pub use address::is_ip_address;
pub use dns::{check_dns_server, resolve_dns_name};
pub use gateway::{neighbor_table_contains, parse_default_gateway};

/// Host and gateway reachability checks
pub struct NetworkDiagnostics {
    runner: Arc<dyn CommandRunner>,
    resolver: NameResolver,
    nameserver: Option<String>,
    ping_count: u32,
    ping_wait_seconds: u32,
}

impl NetworkDiagnostics {
    /// Diagnostics backed by real processes
    pub fn new(config: &DiagnosticsConfig) -> Self {
        Self::with_runner(config, Arc::new(SystemCommandRunner))
    }

    pub fn with_runner(config: &DiagnosticsConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            resolver: NameResolver::new(config),
            nameserver: config.dns_server.clone(),
            ping_count: config.ping_count,
            ping_wait_seconds: config.ping_wait_seconds,
        }
    }
}
