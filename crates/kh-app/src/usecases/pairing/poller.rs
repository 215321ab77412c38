//! Relay polling loop
//!
//! One request per tick, never overlapping. The terminal flag is re-read after
//! every suspension so a cancelled or timed-out session issues nothing more.

use std::sync::Arc;

use kh_core::auth::HttpMethod;
use kh_core::import::{GetImportDataApiResponse, ImportDecision, ImportState};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::events::FailureReason;
use super::session::SessionInner;

enum PollStep {
    Continue,
    Stop,
}

pub(super) async fn run(inner: Arc<SessionInner>) {
    let period = inner.policy.interval();
    let deadline = inner.policy.deadline();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if inner.is_finished() {
            return;
        }
        if inner.created_at.elapsed() > deadline {
            inner.fail(FailureReason::TimedOut);
            return;
        }
        match poll_once(&inner).await {
            PollStep::Continue => {}
            PollStep::Stop => return,
        }
    }
}

async fn poll_once(inner: &SessionInner) -> PollStep {
    let request = match inner.sign(HttpMethod::Get, inner.import_url.clone(), None) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "refusing to send unsigned poll");
            inner.fail(FailureReason::SigningFailed);
            return PollStep::Stop;
        }
    };

    let result = inner.relay.send(request).await;
    if inner.is_finished() {
        return PollStep::Stop;
    }

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "poll failed");
            inner.fail(FailureReason::Transport);
            return PollStep::Stop;
        }
    };

    if response.is_maintenance() {
        debug!("relay in maintenance, polling again next tick");
        return PollStep::Continue;
    }
    if !response.is_success() {
        inner.fail(FailureReason::UnexpectedStatus(response.status));
        return PollStep::Stop;
    }

    let state = match GetImportDataApiResponse::decode(&response.body) {
        Ok(decoded) => decoded.import_state,
        Err(e) => {
            warn!(error = %e, "undecodable import state");
            inner.fail(FailureReason::InvalidResponse);
            return PollStep::Stop;
        }
    };
    debug!(state = state_name(&state), "import state");

    match ImportDecision::interpret(&state, &inner.channel_key.public_representation()) {
        ImportDecision::KeepPolling => PollStep::Continue,
        ImportDecision::Connected(owner_key) => {
            inner.mark_connected(owner_key);
            PollStep::Stop
        }
        ImportDecision::Terminate(reason) => {
            inner.fail(FailureReason::ImportRejected(reason));
            PollStep::Stop
        }
    }
}

fn state_name(state: &ImportState) -> &'static str {
    match state {
        ImportState::Initial => "Initial",
        ImportState::Accepted(_) => "Accepted",
        ImportState::Completed(_) => "Completed",
    }
}
