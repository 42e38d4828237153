use std::time::Duration;

/// Classified result of one HTTP attempt.
///
/// Every variant but `Success` is a failure. The distinction only feeds diagnostics, the totals
/// treat them all the same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Success { latency: Duration },
    StatusMismatch { status: u16, latency: Duration },
    Timeout,
    Connection(String),
    Transport(String),
}

impl Attempt {
    pub fn classify(status: u16, expected: u16, latency: Duration) -> Self {
        if status == expected {
            Attempt::Success { latency }
        } else {
            Attempt::StatusMismatch { status, latency }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Attempt::Success { .. })
    }

    /// Round trip time, absent when no response arrived (transport error or timeout).
    pub fn latency(&self) -> Option<Duration> {
        match self {
            Attempt::Success { latency } | Attempt::StatusMismatch { latency, .. } => {
                Some(*latency)
            }
            _ => None,
        }
    }

    /// Short label, used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Attempt::Success { .. } => "success",
            Attempt::StatusMismatch { .. } => "status_mismatch",
            Attempt::Timeout => "timeout",
            Attempt::Connection(_) => "connection",
            Attempt::Transport(_) => "transport",
        }
    }
}
