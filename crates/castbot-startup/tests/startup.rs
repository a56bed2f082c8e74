// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the boot-time startup sequence.

use castbot_config::model::{CastbotConfig, MessengerConfig, NlpConfig};
use castbot_messenger::MessengerClient;
use castbot_startup::run_startup;
use castbot_storage::queries::{attachments, bot_data, cache, channels, settings, users};
use castbot_storage::Database;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> MessengerClient {
    MessengerClient::new(&MessengerConfig {
        access_token: Some("test-token".into()),
        api_base_url: base_url.to_string(),
    })
    .unwrap()
}

fn test_config(credentials_path: &std::path::Path) -> CastbotConfig {
    CastbotConfig {
        nlp: NlpConfig {
            enabled: true,
            credentials_json: Some(r#"{"client_email":"svc@example.test"}"#.into()),
            credentials_path: credentials_path.to_string_lossy().into_owned(),
        },
        ..CastbotConfig::default()
    }
}

#[tokio::test]
async fn first_boot_converges_everything() {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path().join("bot.db").to_str().unwrap())
        .await
        .unwrap();
    let server = MockServer::start().await;

    // Remote already knows "news"; "fresh" must be created.
    Mock::given(method("GET"))
        .and(path("/me/custom_labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "7", "name": "news"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/me/custom_labels"))
        .and(body_partial_json(json!({"name": "fresh"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "300"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/\d+/label$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let news = channels::create_channel(&db, "news").await.unwrap();
    let fresh = channels::create_channel(&db, "fresh").await.unwrap();
    let user = users::create_user(&db, "psid-1").await.unwrap();
    users::subscribe(&db, user, news).await.unwrap();
    cache::put(&db, "stale", "entry").await.unwrap();

    let creds_path = dir.path().join("creds.json");
    run_startup(&db, &test_client(&server.uri()), &test_config(&creds_path)).await;

    // Channel bindings converged.
    let news = channels::get_channel(&db, news).await.unwrap().unwrap();
    assert_eq!(news.label_id.as_deref(), Some("7"));
    let fresh = channels::get_channel(&db, fresh).await.unwrap().unwrap();
    assert_eq!(fresh.label_id.as_deref(), Some("300"));

    // Every gate closed, cache flushed, first start recorded, creds written.
    for flag in ["channels_check", "channels_sync_check", "flush_cache"] {
        assert!(!settings::read_flag(&db, flag).await.unwrap(), "{flag}");
    }
    assert!(cache::get(&db, "stale").await.unwrap().is_none());
    let first = bot_data::get(&db, "first_start").await.unwrap().unwrap();
    assert!(first.data["timestamp"].as_i64().unwrap() > 0);
    assert!(creds_path.exists());
}

#[tokio::test]
async fn second_boot_is_a_remote_no_op() {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path().join("bot.db").to_str().unwrap())
        .await
        .unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/custom_labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let creds_path = dir.path().join("creds.json");
    let config = test_config(&creds_path);
    run_startup(&db, &test_client(&server.uri()), &config).await;

    let first = bot_data::get(&db, "first_start").await.unwrap().unwrap();
    let stamp = first.data["timestamp"].as_i64().unwrap();

    // All gates are closed: an unreachable platform must not matter.
    let unreachable = test_client("http://127.0.0.1:9");
    run_startup(&db, &unreachable, &config).await;

    for flag in ["channels_check", "channels_sync_check", "flush_cache"] {
        assert!(!settings::read_flag(&db, flag).await.unwrap(), "{flag}");
    }
    let first = bot_data::get(&db, "first_start").await.unwrap().unwrap();
    assert_eq!(first.data["timestamp"].as_i64().unwrap(), stamp);
}

#[tokio::test]
async fn reconciler_failure_skips_the_remaining_jobs() {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path().join("bot.db").to_str().unwrap())
        .await
        .unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/custom_labels"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "token expired", "type": "OAuthException"}
        })))
        .mount(&server)
        .await;

    channels::create_channel(&db, "news").await.unwrap();
    users::create_user(&db, "psid-1").await.unwrap();
    cache::put(&db, "keep", "me").await.unwrap();

    let creds_path = dir.path().join("creds.json");
    run_startup(&db, &test_client(&server.uri()), &test_config(&creds_path)).await;

    // The reconciler gate reopened for the next boot, and the jobs after it
    // never ran: their gates are untouched and their effects absent.
    assert!(settings::read_flag(&db, "channels_check").await.unwrap());
    assert!(settings::read_flag(&db, "channels_sync_check").await.unwrap());
    assert!(settings::read_flag(&db, "flush_cache").await.unwrap());
    assert_eq!(cache::get(&db, "keep").await.unwrap().as_deref(), Some("me"));
    assert!(bot_data::get(&db, "first_start").await.unwrap().is_none());
    // The auth artifact, first in the sequence, was still produced.
    assert!(creds_path.exists());
}

#[tokio::test]
async fn attachment_pass_is_detached_from_the_boot_sequence() {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path().join("bot.db").to_str().unwrap())
        .await
        .unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/custom_labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    attachments::create_attachment(&db, "photo", "https://cdn.x/a.png")
        .await
        .unwrap();

    let creds_path = dir.path().join("creds.json");
    run_startup(&db, &test_client(&server.uri()), &test_config(&creds_path)).await;

    // The boot sequence never touched the attachment.
    let pending = attachments::list_needing_upload(&db).await.unwrap();
    assert_eq!(pending.len(), 1);
}
