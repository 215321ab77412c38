use tokio::sync::watch;

use super::events::{FailureReason, SessionStatus};

/// Awaitable view of a session's progress.
///
/// Cheap to clone; every clone observes the same status.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    status_rx: watch::Receiver<SessionStatus>,
}

impl SessionOutcome {
    pub(super) fn new(status_rx: watch::Receiver<SessionStatus>) -> Self {
        Self { status_rx }
    }

    pub fn status(&self) -> SessionStatus {
        *self.status_rx.borrow()
    }

    /// Resolve once the session reaches its terminal state.
    pub async fn wait(&mut self) -> Result<(), FailureReason> {
        let status = self
            .status_rx
            .wait_for(SessionStatus::is_terminal)
            .await
            .map(|status| *status)
            .unwrap_or(SessionStatus::Failed(FailureReason::Cancelled));
        match status {
            SessionStatus::Failed(reason) => Err(reason),
            _ => Ok(()),
        }
    }

    /// Resolve once the peer is verified, or fail if the session ends first.
    pub async fn wait_connected(&mut self) -> Result<(), FailureReason> {
        let status = self
            .status_rx
            .wait_for(|status| *status != SessionStatus::Pending)
            .await
            .map(|status| *status)
            .unwrap_or(SessionStatus::Failed(FailureReason::Cancelled));
        match status {
            SessionStatus::Failed(reason) => Err(reason),
            _ => Ok(()),
        }
    }
}
