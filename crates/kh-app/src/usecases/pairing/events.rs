use tokio::sync::mpsc;

/// Why a session ended in failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Cancelled,
    TimedOut,
    /// No HTTP response from the relay
    Transport,
    /// Poll answered with neither 2xx nor 418
    UnexpectedStatus(u16),
    /// 2xx body was not a valid import state
    InvalidResponse,
    /// Owner proof failed or the channel was already completed
    ImportRejected(&'static str),
    /// A request could not be signed; nothing was sent
    SigningFailed,
    /// Export upload answered with a non-2xx status
    ExportRejected(u16),
}

/// Snapshot of a session as seen through [`super::SessionOutcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Pending,
    Connected,
    Succeeded,
    Failed(FailureReason),
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Succeeded | SessionStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Peer proof verified; emitted at most once
    Connected { channel_id: String },
    /// Terminal outcome; emitted exactly once
    Finished {
        channel_id: String,
        status: SessionStatus,
    },
}

pub type SessionEvents = mpsc::Receiver<SessionEvent>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_succeeded_and_failed_are_terminal() {
        assert!(!SessionStatus::Pending.is_terminal());
        assert!(!SessionStatus::Connected.is_terminal());
        assert!(SessionStatus::Succeeded.is_terminal());
        assert!(SessionStatus::Failed(FailureReason::Cancelled).is_terminal());
    }
}
