//! Diagnostic probe settings
//!
//! Deserialized from the `[diagnostics]` table of the netcheck config file.
//! Every field has a default, so an empty table is valid.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    /// Echo requests sent per ping
    #[serde(default = "default_ping_count")]
    pub ping_count: u32,
    /// Seconds ping waits for each reply
    #[serde(default = "default_ping_wait")]
    pub ping_wait_seconds: u32,
    /// Use this nameserver instead of the system ones
    #[serde(default)]
    pub dns_server: Option<String>,
    #[serde(default = "default_dns_port")]
    pub dns_port: u16,
    #[serde(default = "default_probe_timeout")]
    pub dns_probe_timeout_ms: u64,
    #[serde(default = "default_query_timeout")]
    pub dns_query_timeout_ms: u64,
    #[serde(default = "default_query_attempts")]
    pub dns_query_attempts: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            ping_count: default_ping_count(),
            ping_wait_seconds: default_ping_wait(),
            dns_server: None,
            dns_port: default_dns_port(),
            dns_probe_timeout_ms: default_probe_timeout(),
            dns_query_timeout_ms: default_query_timeout(),
            dns_query_attempts: default_query_attempts(),
        }
    }
}

impl DiagnosticsConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.dns_probe_timeout_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.dns_query_timeout_ms)
    }
}

fn default_ping_count() -> u32 { 4 }
fn default_ping_wait() -> u32 { 5 }
fn default_dns_port() -> u16 { 53 }
fn default_probe_timeout() -> u64 { 3000 }
fn default_query_timeout() -> u64 { 5000 }
fn default_query_attempts() -> usize { 2 }
