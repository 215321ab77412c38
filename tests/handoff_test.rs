use std::time::Duration;

use chrono::Utc;
use keyhandoff_lib::{
    FailureReason, KeyHandoff, KeyHandoffConfig, PollingPolicy, RelayConfig, SessionError,
    WordListLanguage,
};
use kh_core::encoding::Base64EncodedString;
use kh_core::import::{AcceptedImport, GetImportDataApiResponse, ImportState};
use kh_core::AsymmetricKey;
use mockito::{Matcher, Server};

fn config_for(server_url: &str) -> KeyHandoffConfig {
    KeyHandoffConfig {
        relay: RelayConfig {
            api_url: server_url.to_string(),
            ..RelayConfig::default()
        },
        polling: PollingPolicy {
            interval_secs: 1,
            deadline_secs: 30,
        },
    }
}

#[tokio::test]
async fn handoff_over_http_relay_delivers_encrypted_phrase() {
    let mut server = Server::new_async().await;
    let owner = AsymmetricKey::generate().unwrap();

    let handoff = KeyHandoff::new(config_for(&server.url()))
        .unwrap()
        .initiate("Alice")
        .unwrap();
    let channel = handoff.session.channel_id().to_string();
    assert!(handoff.deep_link.starts_with("censo-main://import/v1/"));

    let proof = owner
        .sign(handoff.session.deep_link().channel_public_key().as_bytes())
        .unwrap();
    let accepted = serde_json::to_string(&GetImportDataApiResponse {
        import_state: ImportState::Accepted(AcceptedImport {
            owner_device_key: owner.public_key_base58(),
            owner_proof: Base64EncodedString::from_bytes(proof),
            accepted_at: Utc::now(),
        }),
    })
    .unwrap();

    let poll = server
        .mock("GET", format!("/v1/import/{}", channel).as_str())
        .match_header("x-censo-timestamp", Matcher::Any)
        .match_header("authorization", Matcher::Regex("^signature ".to_string()))
        .match_header("x-censo-device-public-key", Matcher::Any)
        .with_status(200)
        .with_body(accepted)
        .expect(1)
        .create_async()
        .await;
    let upload = server
        .mock("POST", format!("/v1/import/{}/encrypted", channel).as_str())
        .match_header("content-type", "application/json")
        .match_body(Matcher::Regex(r#"^\{"encryptedData":"[A-Za-z0-9+/=]+"\}$"#.to_string()))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let mut outcome = handoff.outcome();
    tokio::time::timeout(Duration::from_secs(10), outcome.wait_connected())
        .await
        .expect("connected in time")
        .expect("connected");

    handoff
        .session
        .export_phrase("00ff00ff", WordListLanguage::English, "")
        .unwrap();
    tokio::time::timeout(Duration::from_secs(10), outcome.wait())
        .await
        .expect("finished in time")
        .expect("export succeeded");

    poll.assert_async().await;
    upload.assert_async().await;
}

#[tokio::test]
async fn relay_error_status_fails_the_handoff() {
    let mut server = Server::new_async().await;
    let _poll = server
        .mock("GET", Matcher::Regex("^/v1/import/".to_string()))
        .with_status(500)
        .create_async()
        .await;

    let handoff = KeyHandoff::new(config_for(&server.url()))
        .unwrap()
        .initiate("Alice")
        .unwrap();

    let result = tokio::time::timeout(Duration::from_secs(10), handoff.outcome().wait())
        .await
        .expect("finished in time");
    assert_eq!(result, Err(FailureReason::UnexpectedStatus(500)));
}

#[tokio::test]
async fn empty_name_is_rejected() {
    let handoff = KeyHandoff::new(KeyHandoffConfig::default()).unwrap();

    assert!(matches!(
        handoff.initiate(""),
        Err(SessionError::NameNotFound)
    ));
}
