//! net.dns — name resolution with nameserver liveness fallback
//!
//! When a name does not resolve, every configured nameserver is probed over
//! TCP so the narrative shows whether the servers themselves are reachable.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::config::DiagnosticsConfig;
use crate::diagnosis::{DiagnosticResult, FailureKind};

/// Check that a DNS server accepts TCP connections on `port`.
///
/// Liveness only: no query is sent and the connection is dropped at once.
pub async fn check_dns_server(server_ip: &str, port: u16, timeout: Duration) -> DiagnosticResult {
    if connect(server_ip, port, timeout).await {
        DiagnosticResult::ok(format!(
            "Successfully connected to DNS server {server_ip}:{port}\n"
        ))
    } else {
        DiagnosticResult::failed(
            FailureKind::NameserversUnreachable,
            format!("Failed to connect to DNS server {server_ip}:{port}\n"),
        )
    }
}

async fn connect(server_ip: &str, port: u16, timeout: Duration) -> bool {
    let ip: IpAddr = match server_ip.parse() {
        Ok(ip) => ip,
        Err(e) => {
            debug!(server_ip, error = %e, "Not a nameserver address");
            return false;
        }
    };
    let addr = SocketAddr::new(ip, port);

    match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(_stream)) => true,
        Ok(Err(e)) => {
            debug!(%addr, error = %e, "DNS server connection failed");
            false
        }
        Err(_) => {
            debug!(%addr, ?timeout, "DNS server connection timed out");
            false
        }
    }
}

/// Resolve `domain` with the default settings.
pub async fn resolve_dns_name(domain_name: &str, server_ip: Option<&str>) -> DiagnosticResult {
    NameResolver::default().resolve(domain_name, server_ip).await
}

/// Hostname resolver that explains its failures
pub struct NameResolver {
    /// Port for an override nameserver; system nameservers keep their own
    port: u16,
    probe_timeout: Duration,
    query_timeout: Duration,
    attempts: usize,
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new(&DiagnosticsConfig::default())
    }
}

impl NameResolver {
    pub fn new(config: &DiagnosticsConfig) -> Self {
        Self {
            port: config.dns_port,
            probe_timeout: config.probe_timeout(),
            query_timeout: config.query_timeout(),
            attempts: config.dns_query_attempts,
        }
    }

    /// Resolve `domain` through the system nameservers, or only through
    /// `server_ip` when given.
    pub async fn resolve(&self, domain: &str, server_ip: Option<&str>) -> DiagnosticResult {
        let (config, opts) = match self.resolver_config(server_ip) {
            Ok(conf) => conf,
            Err(e) => {
                warn!(domain, error = ?e, "Resolver configuration unavailable");
                let nameservers: Vec<(String, u16)> = server_ip
                    .map(|ip| vec![(ip.to_string(), self.port)])
                    .unwrap_or_default();
                return self.explain_failure(domain, &nameservers).await;
            }
        };

        let nameservers = nameserver_list(&config);
        let resolver = TokioAsyncResolver::tokio(config, opts);

        match resolver.lookup_ip(domain).await {
            Ok(lookup) => {
                let addresses: Vec<String> = lookup.iter().map(|ip| ip.to_string()).collect();
                info!(domain, ?addresses, "Resolved");
                DiagnosticResult::ok(format!(
                    "Resolved {domain} to [{}]",
                    addresses.join(", ")
                ))
            }
            Err(e) => {
                warn!(domain, error = %e, "DNS resolution failed");
                self.explain_failure(domain, &nameservers).await
            }
        }
    }

    fn resolver_config(&self, server_ip: Option<&str>) -> Result<(ResolverConfig, ResolverOpts)> {
        let (config, mut opts) = match server_ip {
            Some(ip) => {
                let ip: IpAddr = ip
                    .parse()
                    .with_context(|| format!("Invalid nameserver address: {ip}"))?;
                let mut config = ResolverConfig::new();
                config.add_name_server(NameServerConfig::new(
                    SocketAddr::new(ip, self.port),
                    Protocol::Udp,
                ));
                (config, ResolverOpts::default())
            }
            None => hickory_resolver::system_conf::read_system_conf()
                .context("Failed to read system resolver configuration")?,
        };

        opts.timeout = self.query_timeout;
        opts.attempts = self.attempts;
        Ok((config, opts))
    }

    /// Probe each nameserver and build the failure narrative.
    async fn explain_failure(
        &self,
        domain: &str,
        nameservers: &[(String, u16)],
    ) -> DiagnosticResult {
        let mut message =
            format!("Failed to resolve {domain}, the following dns servers are tested:\n");
        let mut any_reachable = false;

        for (ip, port) in nameservers {
            let probe = check_dns_server(ip, *port, self.probe_timeout).await;
            any_reachable |= probe.success();
            message.push_str(probe.message());
        }

        let kind = if any_reachable {
            FailureKind::NameNotFound
        } else {
            FailureKind::NameserversUnreachable
        };
        DiagnosticResult::failed(kind, message)
    }
}

/// Distinct nameserver addresses in configuration order.
///
/// The system configuration lists each server once per protocol.
fn nameserver_list(config: &ResolverConfig) -> Vec<(String, u16)> {
    let mut seen: Vec<SocketAddr> = Vec::new();
    for ns in config.name_servers() {
        if !seen.contains(&ns.socket_addr) {
            seen.push(ns.socket_addr);
        }
    }
    seen.into_iter()
        .map(|addr| (addr.ip().to_string(), addr.port()))
        .collect()
}
