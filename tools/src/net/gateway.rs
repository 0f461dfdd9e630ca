//! net.gateway — Find the default gateway and check it answers
//!
//! When the gateway does not answer ping, the neighbor table tells apart a
//! gateway the link layer knows about from one it has never seen.

use tracing::{info, warn};

use super::NetworkDiagnostics;
use crate::diagnosis::{DiagnosticResult, FailureKind};

const DEFAULT_ROUTE_MARKER: &str = "default via ";

/// Address following the first `default via ` in `ip route` output.
pub fn parse_default_gateway(route_output: &str) -> Option<String> {
    let start = route_output.find(DEFAULT_ROUTE_MARKER)? + DEFAULT_ROUTE_MARKER.len();
    let gateway: String = route_output[start..]
        .chars()
        .take_while(|c| !c.is_whitespace())
        .collect();

    if gateway.is_empty() {
        None
    } else {
        Some(gateway)
    }
}

/// True if `address` appears as a whole token in `ip neigh` output.
pub fn neighbor_table_contains(neighbor_output: &str, address: &str) -> bool {
    neighbor_output
        .split_whitespace()
        .any(|token| token == address)
}

impl NetworkDiagnostics {
    /// Ping the default gateway from the routing table.
    pub async fn gateway_ping_test(&self) -> DiagnosticResult {
        let routes = match self.query_table("route").await {
            Ok(output) => output,
            Err(captured) => return table_failure(captured),
        };

        let Some(gateway) = parse_default_gateway(&routes) else {
            warn!("No default route in routing table");
            return DiagnosticResult::failed(FailureKind::NoGateway, "Default gateway not found.");
        };
        info!(%gateway, "Found default gateway");

        let ping = self.ping_test(&gateway).await;
        if ping.success() {
            return ping;
        }

        let neighbors = match self.query_table("neigh").await {
            Ok(output) => output,
            Err(captured) => return table_failure(captured),
        };

        if neighbor_table_contains(&neighbors, &gateway) {
            DiagnosticResult::failed(
                FailureKind::Unreachable,
                format!("Gateway {gateway} is present in the ARP table, but ping failed"),
            )
        } else {
            DiagnosticResult::failed(
                FailureKind::Unreachable,
                format!("Gateway {gateway} not found in the ARP table."),
            )
        }
    }

    /// Run `ip <object>`; stdout on success, captured output otherwise.
    async fn query_table(&self, object: &str) -> Result<String, String> {
        match self.runner.run("ip", &[object]).await {
            Ok(output) if output.success => Ok(output.stdout),
            Ok(output) => {
                warn!(object, "ip command exited with an error");
                Err(output.combined())
            }
            Err(e) => {
                warn!(object, error = ?e, "Could not run ip");
                Err(format!("{e:#}"))
            }
        }
    }
}

fn table_failure(captured: String) -> DiagnosticResult {
    DiagnosticResult::failed(
        FailureKind::TableQuery,
        format!("Failed to retrieve default gateway: {captured}"),
    )
}
