use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use kh_core::auth::{AuthError, AuthenticatedRequest, HttpMethod, RequestAuthenticator};
use kh_core::config::{ConfigError, PollingPolicy, RelayConfig};
use kh_core::crypto::{AsymmetricKey, KeyError};
use kh_core::encoding::Base64EncodedString;
use kh_core::ids::ChannelId;
use kh_core::import::{EncryptedPhrase, ExportedPhrase, WordListLanguage};
use kh_core::link::{DeepLink, LinkError};
use kh_core::ports::{ClockPort, RelayPort};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use url::Url;
use zeroize::Zeroizing;

use super::events::{FailureReason, SessionEvent, SessionEvents, SessionStatus};
use super::outcome::SessionOutcome;
use super::poller;

const EVENT_CHANNEL_CAPACITY: usize = 8;

/// Caller misuse, reported synchronously without touching the network
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidSessionState {
    #[error("session already finished")]
    Finished,

    #[error("peer not connected yet")]
    NotConnected,

    #[error("connect already called")]
    AlreadyConnected,

    #[error("export already started")]
    ExportInProgress,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("display name is empty")]
    NameNotFound,

    #[error("invalid session state: {0}")]
    InvalidSessionState(#[from] InvalidSessionState),

    #[error("deep link signature did not verify")]
    LinkSignatureNotVerified,

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to encode export payload: {0}")]
    Payload(String),
}

/// One pairing-and-export handshake with a single owner device.
///
/// Owns two fresh keys: the channel key names the relay channel and signs the
/// deep link, the auth key signs every relay request. Background work runs on
/// the current tokio runtime, so `connect` and `export_phrase` must be called
/// from within one.
///
/// Dropping the session cancels it.
pub struct PairingSession {
    inner: Arc<SessionInner>,
}

pub(super) struct SessionInner {
    pub(super) channel_id: ChannelId,
    pub(super) channel_key: AsymmetricKey,
    pub(super) policy: PollingPolicy,
    pub(super) import_url: Url,
    pub(super) relay: Arc<dyn RelayPort>,
    pub(super) created_at: Instant,
    export_url: Url,
    authenticator: RequestAuthenticator,
    clock: Arc<dyn ClockPort>,
    deep_link: DeepLink,
    connect_started: AtomicBool,
    export_started: AtomicBool,
    finished: AtomicBool,
    owner_key: OnceLock<AsymmetricKey>,
    poller: OnceLock<AbortHandle>,
    exporter: OnceLock<AbortHandle>,
    status_tx: watch::Sender<SessionStatus>,
    event_tx: mpsc::Sender<SessionEvent>,
}

impl PairingSession {
    pub fn new(
        name: &str,
        config: &RelayConfig,
        policy: PollingPolicy,
        relay: Arc<dyn RelayPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Result<(Self, SessionEvents), SessionError> {
        if name.is_empty() {
            return Err(SessionError::NameNotFound);
        }

        let channel_key = AsymmetricKey::generate()?;
        let auth_key = AsymmetricKey::generate()?;
        let channel_id = ChannelId::from_public_key(&channel_key);
        let import_url = config.endpoint(&format!("import/{}", channel_id))?;
        let export_url = config.endpoint(&format!("import/{}/encrypted", channel_id))?;
        let deep_link = DeepLink::create(config, &channel_key, name, clock.now_ms())?;

        let (status_tx, _) = watch::channel(SessionStatus::Pending);
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        info!(channel = %channel_id, "pairing session created");

        let inner = SessionInner {
            channel_id,
            channel_key,
            policy,
            import_url,
            relay,
            created_at: Instant::now(),
            export_url,
            authenticator: RequestAuthenticator::new(auth_key),
            clock,
            deep_link,
            connect_started: AtomicBool::new(false),
            export_started: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            owner_key: OnceLock::new(),
            poller: OnceLock::new(),
            exporter: OnceLock::new(),
            status_tx,
            event_tx,
        };

        Ok((
            Self {
                inner: Arc::new(inner),
            },
            event_rx,
        ))
    }

    /// Start polling the relay and return the deep link to show the peer.
    ///
    /// ## Behavior / 行为
    /// - Rejected once the session finished or when called twice
    /// - The link signature is checked against the channel key before any
    ///   request goes out
    /// - The first poll happens one interval after this call
    pub fn connect(&self) -> Result<String, SessionError> {
        let inner = &self.inner;
        if inner.is_finished() {
            return Err(InvalidSessionState::Finished.into());
        }
        if inner
            .connect_started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(InvalidSessionState::AlreadyConnected.into());
        }
        if !inner.deep_link.verify() {
            inner.connect_started.store(false, Ordering::Release);
            return Err(SessionError::LinkSignatureNotVerified);
        }

        let span = info_span!("pairing.poll", channel = %inner.channel_id);
        let handle = tokio::spawn(poller::run(Arc::clone(inner)).instrument(span));
        let _ = inner.poller.set(handle.abort_handle());

        info!(channel = %inner.channel_id, "pairing session connecting");
        Ok(inner.deep_link.to_uri())
    }

    /// Encrypt the phrase to the verified owner device and upload it.
    ///
    /// Preconditions are checked synchronously; the upload itself runs in the
    /// background and its result arrives through [`SessionOutcome`].
    pub fn export_phrase(
        &self,
        binary_phrase: &str,
        language: WordListLanguage,
        label: &str,
    ) -> Result<(), SessionError> {
        let inner = &self.inner;
        if inner.is_finished() {
            return Err(InvalidSessionState::Finished.into());
        }
        let owner_key = inner
            .owner_key
            .get()
            .ok_or(InvalidSessionState::NotConnected)?;
        if inner
            .export_started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(InvalidSessionState::ExportInProgress.into());
        }

        let body = match encrypted_body(owner_key, binary_phrase, language, label) {
            Ok(body) => body,
            Err(e) => {
                inner.export_started.store(false, Ordering::Release);
                return Err(e);
            }
        };

        let span = info_span!("pairing.export", channel = %inner.channel_id);
        let handle = tokio::spawn(run_export(Arc::clone(inner), body).instrument(span));
        let _ = inner.exporter.set(handle.abort_handle());
        Ok(())
    }

    /// Stop all background work and finish as failed. Idempotent.
    pub fn cancel(&self) {
        self.inner.fail(FailureReason::Cancelled);
    }

    pub fn outcome(&self) -> SessionOutcome {
        SessionOutcome::new(self.inner.status_tx.subscribe())
    }

    pub fn status(&self) -> SessionStatus {
        *self.inner.status_tx.borrow()
    }

    pub fn channel_id(&self) -> &ChannelId {
        &self.inner.channel_id
    }

    pub fn deep_link(&self) -> &DeepLink {
        &self.inner.deep_link
    }
}

impl Drop for PairingSession {
    fn drop(&mut self) {
        self.inner.fail(FailureReason::Cancelled);
    }
}

impl SessionInner {
    pub(super) fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    pub(super) fn sign(
        &self,
        method: HttpMethod,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<AuthenticatedRequest, AuthError> {
        let now = DateTime::<Utc>::from_timestamp_millis(self.clock.now_ms())
            .unwrap_or_else(Utc::now);
        self.authenticator.authenticate(method, url, body, now)
    }

    /// Record the verified owner key and stop polling.
    pub(super) fn mark_connected(&self, owner_key: AsymmetricKey) {
        if self.is_finished() || self.owner_key.set(owner_key).is_err() {
            return;
        }
        let transitioned = self.status_tx.send_if_modified(|status| {
            if *status == SessionStatus::Pending {
                *status = SessionStatus::Connected;
                true
            } else {
                false
            }
        });
        if transitioned {
            info!(channel = %self.channel_id, "owner device verified");
            let _ = self.event_tx.try_send(SessionEvent::Connected {
                channel_id: self.channel_id.to_string(),
            });
        }
        if let Some(handle) = self.poller.get() {
            handle.abort();
        }
    }

    pub(super) fn fail(&self, reason: FailureReason) {
        self.finish(SessionStatus::Failed(reason));
    }

    /// Set the terminal status. Only the first caller wins.
    pub(super) fn finish(&self, status: SessionStatus) {
        if self
            .finished
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        if let Some(handle) = self.poller.get() {
            handle.abort();
        }
        if let Some(handle) = self.exporter.get() {
            handle.abort();
        }

        match status {
            SessionStatus::Failed(reason) => {
                warn!(channel = %self.channel_id, ?reason, "pairing session failed")
            }
            _ => info!(channel = %self.channel_id, "pairing session succeeded"),
        }

        self.status_tx.send_replace(status);
        let _ = self.event_tx.try_send(SessionEvent::Finished {
            channel_id: self.channel_id.to_string(),
            status,
        });
    }
}

fn encrypted_body(
    owner_key: &AsymmetricKey,
    binary_phrase: &str,
    language: WordListLanguage,
    label: &str,
) -> Result<Vec<u8>, SessionError> {
    let phrase = ExportedPhrase::new(binary_phrase, language, label);
    let plaintext = Zeroizing::new(
        serde_json::to_vec(&phrase).map_err(|e| SessionError::Payload(e.to_string()))?,
    );
    let ciphertext = owner_key.encrypt(&plaintext)?;
    let body = EncryptedPhrase {
        encrypted_data: Base64EncodedString::from_bytes(ciphertext),
    };
    serde_json::to_vec(&body).map_err(|e| SessionError::Payload(e.to_string()))
}

async fn run_export(inner: Arc<SessionInner>, body: Vec<u8>) {
    // cancel may land between spawn and the abort handle being stored
    if inner.is_finished() {
        return;
    }
    let request = match inner.sign(HttpMethod::Post, inner.export_url.clone(), Some(body)) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "refusing to send unsigned export");
            inner.fail(FailureReason::SigningFailed);
            return;
        }
    };

    let result = inner.relay.send(request).await;
    if inner.is_finished() {
        return;
    }

    match result {
        Ok(response) if response.is_success() => inner.finish(SessionStatus::Succeeded),
        Ok(response) => inner.fail(FailureReason::ExportRejected(response.status)),
        Err(e) => {
            warn!(error = %e, "export upload failed");
            inner.fail(FailureReason::Transport);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use kh_core::ports::{RelayError, RelayResponse};

    use super::*;

    struct RecordingRelay {
        sent: Mutex<Vec<AuthenticatedRequest>>,
    }

    #[async_trait]
    impl RelayPort for RecordingRelay {
        async fn send(&self, request: AuthenticatedRequest) -> Result<RelayResponse, RelayError> {
            self.sent.lock().unwrap().push(request);
            Ok(RelayResponse::new(200, Vec::new()))
        }
    }

    struct FixedClock;

    impl ClockPort for FixedClock {
        fn now_ms(&self) -> i64 {
            1_700_000_000_000
        }
    }

    #[tokio::test]
    async fn export_task_sends_nothing_once_finished() {
        let relay = Arc::new(RecordingRelay {
            sent: Mutex::new(Vec::new()),
        });
        let (session, _events) = PairingSession::new(
            "laptop",
            &RelayConfig::default(),
            PollingPolicy::default(),
            relay.clone(),
            Arc::new(FixedClock),
        )
        .unwrap();
        session.cancel();

        run_export(Arc::clone(&session.inner), b"{}".to_vec()).await;

        assert!(relay.sent.lock().unwrap().is_empty());
        assert_eq!(
            session.status(),
            SessionStatus::Failed(FailureReason::Cancelled)
        );
    }
}
