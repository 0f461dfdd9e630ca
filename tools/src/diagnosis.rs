//! Diagnostic outcomes

use std::fmt;

/// Why a diagnostic failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Name did not resolve although at least one nameserver answered a connection
    NameNotFound,
    /// No configured nameserver accepted a connection
    NameserversUnreachable,
    /// Ping to a literal or resolved address failed
    Unreachable,
    /// The routing table has no default route
    NoGateway,
    /// A route/neighbor table command failed
    TableQuery,
}

impl FailureKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::NameNotFound => "name_not_found",
            Self::NameserversUnreachable => "nameservers_unreachable",
            Self::Unreachable => "unreachable",
            Self::NoGateway => "no_gateway",
            Self::TableQuery => "table_query",
        }
    }

    /// True for the two DNS resolution failure kinds
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::NameNotFound | Self::NameserversUnreachable)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one diagnostic: success flag plus narrative.
///
/// `failure()` is `None` exactly when the diagnostic succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticResult {
    success: bool,
    message: String,
    failure: Option<FailureKind>,
}

impl DiagnosticResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            failure: None,
        }
    }

    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            failure: Some(kind),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn failure(&self) -> Option<FailureKind> {
        self.failure
    }

    pub fn into_message(self) -> String {
        self.message
    }
}
