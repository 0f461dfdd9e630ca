//! net.ping — Ping a host, resolving it first when it is a name

use tracing::{debug, info, warn};

use super::address::is_ip_address;
use super::NetworkDiagnostics;
use crate::diagnosis::{DiagnosticResult, FailureKind};

/// Used when the configured count is 0, which some pings treat as "forever"
const FALLBACK_PING_COUNT: u32 = 4;

impl NetworkDiagnostics {
    /// Ping `host`. Names are resolved first and a resolution failure is
    /// returned as is, without pinging.
    ///
    /// The ping exit status is the only success oracle; the raw output is
    /// embedded in the message unparsed.
    pub async fn ping_test(&self, host: &str) -> DiagnosticResult {
        if !is_ip_address(host) {
            let resolved = self.resolver.resolve(host, self.nameserver.as_deref()).await;
            if !resolved.success() {
                return resolved;
            }
            debug!(host, "{}", resolved.message());
        }

        let count = if self.ping_count == 0 {
            FALLBACK_PING_COUNT
        } else {
            self.ping_count
        };
        let count = count.to_string();
        let wait = self.ping_wait_seconds.to_string();
        let args = ["-c", count.as_str(), "-W", wait.as_str(), host];

        match self.runner.run("ping", &args).await {
            Ok(output) if output.success => {
                info!(host, "Ping successful");
                DiagnosticResult::ok(format!("Ping successful:\n{}", output.stdout))
            }
            Ok(output) => {
                warn!(host, "Ping failed");
                DiagnosticResult::failed(
                    FailureKind::Unreachable,
                    format!("Ping failed:\n{}", output.combined()),
                )
            }
            Err(e) => {
                warn!(host, error = ?e, "Could not run ping");
                DiagnosticResult::failed(FailureKind::Unreachable, format!("Ping failed:\n{e:#}"))
            }
        }
    }
}
