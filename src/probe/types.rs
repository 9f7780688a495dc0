use std::fmt;
use std::time::Duration;

/// A single `(host, port, timeout)` to try connecting to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl ProbeTarget {
    pub fn new<S: Into<String>>(host: S, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Outcome of one connection attempt. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl ProbeOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed<S: Into<String>>(error: S) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeAttempt {
    pub target: ProbeTarget,
    pub success: bool,
    pub error: Option<String>,
}

impl ProbeAttempt {
    pub fn new(target: ProbeTarget, outcome: ProbeOutcome) -> Self {
        Self {
            target,
            success: outcome.success,
            error: outcome.error,
        }
    }

    /// `host: ok` or `host: <error>`
    fn describe(&self) -> String {
        let outcome = if self.success {
            "ok"
        } else {
            self.error.as_deref().unwrap_or("failed")
        };
        format!("{}: {}", self.target.host, outcome)
    }
}

/// Final reachability answer for a workload.
///
/// When `online` is true, `winning_target` is the host that accepted the
/// connection and `diagnostic_summary` is `None`. When it is false,
/// `winning_target` is the first host tried and `diagnostic_summary` lists
/// every attempt in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityResult {
    pub online: bool,
    pub winning_target: Option<String>,
    pub diagnostic_summary: Option<String>,
    pub attempts: Vec<ProbeAttempt>,
}

impl ReachabilityResult {
    pub fn online(attempts: Vec<ProbeAttempt>) -> Self {
        let winning_target = attempts
            .iter()
            .rev()
            .find(|attempt| attempt.success)
            .map(|attempt| attempt.target.host.clone());

        Self {
            online: winning_target.is_some(),
            winning_target,
            diagnostic_summary: None,
            attempts,
        }
    }

    pub fn offline(attempts: Vec<ProbeAttempt>) -> Self {
        let winning_target = attempts.first().map(|attempt| attempt.target.host.clone());
        let summary = attempts
            .iter()
            .map(ProbeAttempt::describe)
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            online: false,
            winning_target,
            diagnostic_summary: (!summary.is_empty()).then_some(summary),
            attempts,
        }
    }
}
