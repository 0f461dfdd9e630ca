//! netcheck tools — network diagnostic probes
//!
//! Every probe reports through a [`DiagnosticResult`]: a success flag, a
//! human-readable narrative and, on failure, the kind of failure. Probes
//! never return errors to their caller.

pub mod command;
pub mod config;
pub mod diagnosis;
pub mod net;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use config::DiagnosticsConfig;
pub use diagnosis::{DiagnosticResult, FailureKind};
pub use net::NetworkDiagnostics;
