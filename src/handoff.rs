//! Integration facade: wires the HTTP relay and system clock into a session.

use std::sync::Arc;

use anyhow::Context;
use kh_app::{PairingSession, SessionError, SessionEvents, SessionOutcome};
use kh_core::config::KeyHandoffConfig;
use kh_core::ports::{ClockPort, RelayPort};
use kh_infra::{HttpRelayClient, SystemClock};
use tracing::info_span;

/// A started session and everything the host needs to follow it.
pub struct Handoff {
    pub session: PairingSession,
    pub events: SessionEvents,
    /// Deep link to show the owner device
    pub deep_link: String,
}

impl Handoff {
    pub fn outcome(&self) -> SessionOutcome {
        self.session.outcome()
    }
}

pub struct KeyHandoff {
    config: KeyHandoffConfig,
    relay: Arc<dyn RelayPort>,
    clock: Arc<dyn ClockPort>,
}

impl KeyHandoff {
    /// Production wiring: reqwest relay client and the system clock.
    pub fn new(config: KeyHandoffConfig) -> anyhow::Result<Self> {
        let relay = HttpRelayClient::new().context("Failed to build relay client")?;
        Ok(Self::with_ports(config, Arc::new(relay), Arc::new(SystemClock)))
    }

    pub fn with_ports(
        config: KeyHandoffConfig,
        relay: Arc<dyn RelayPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            config,
            relay,
            clock,
        }
    }

    /// Create a session for `name` and start polling.
    ///
    /// An empty name is `NameNotFound`. Must run inside a tokio runtime.
    pub fn initiate(&self, name: &str) -> Result<Handoff, SessionError> {
        let _entered = info_span!("handoff.initiate").entered();
        let (session, events) = PairingSession::new(
            name,
            &self.config.relay,
            self.config.polling,
            Arc::clone(&self.relay),
            Arc::clone(&self.clock),
        )?;
        let deep_link = session.connect()?;
        Ok(Handoff {
            session,
            events,
            deep_link,
        })
    }
}
