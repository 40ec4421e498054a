#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for `AppStateBuilder` and the login session.

use std::sync::Arc;

use passvault_app::{AppConfig, AppState, AppStateBuilder};
use passvault_core::error::CoreError;
use passvault_core::services::UserDirectory;
use passvault_core::traits::{InMemoryKeyValueStore, KeyValueStore};
use passvault_core::tree::Mutation;
use passvault_core::types::{Account, AddItemRequest, Vault};

fn users() -> UserDirectory {
    UserDirectory::from_pairs([("alice", "a-pass"), ("bob", "b-pass")])
}

fn build_state(store: Arc<InMemoryKeyValueStore>) -> AppState {
    AppStateBuilder::new()
        .kv_store(store)
        .user_directory(users())
        .build()
        .expect("failed to build AppState")
}

#[test]
fn build_requires_kv_store() {
    let result = AppStateBuilder::new().user_directory(users()).build();
    assert!(matches!(result, Err(CoreError::ValidationError(_))));
}

#[tokio::test]
async fn session_required_before_login() {
    let state = build_state(Arc::new(InMemoryKeyValueStore::new()));
    assert!(!state.is_logged_in().await);
    assert!(matches!(
        state.session().await,
        Err(CoreError::NotLoggedIn)
    ));
}

#[tokio::test]
async fn first_login_seeds_sample_tree() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let state = build_state(Arc::clone(&store));

    let session = state.login("alice", "a-pass").await.unwrap();
    assert_eq!(session.user, "alice");
    assert_eq!(session.vault.snapshot().await, Vault::sample());
    assert!(store.get("passwords_alice").await.unwrap().is_some());
    assert!(store.get("passwords_bob").await.unwrap().is_none());
}

#[tokio::test]
async fn wrong_password_keeps_previous_session() {
    let state = build_state(Arc::new(InMemoryKeyValueStore::new()));
    state.login("alice", "a-pass").await.unwrap();

    let result = state.login("bob", "wrong").await;
    assert!(matches!(result, Err(CoreError::InvalidCredentials(_))));
    assert_eq!(state.session().await.unwrap().user, "alice");

    state.logout().await;
    assert!(!state.is_logged_in().await);
}

#[tokio::test]
async fn users_have_separate_documents() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let state = build_state(Arc::clone(&store));

    let alice = state.login("alice", "a-pass").await.unwrap();
    alice
        .vault
        .apply(Mutation::DeleteItem {
            item_id: "1-1-1".to_string(),
        })
        .await
        .unwrap();

    let bob = state.login("bob", "b-pass").await.unwrap();
    assert_eq!(bob.vault.snapshot().await, Vault::sample());

    // alice's emptied tree is kept as-is on the next login
    let alice = state.login("alice", "a-pass").await.unwrap();
    assert!(alice.vault.snapshot().await.is_empty());

    let mut keys = store.list("passwords_").await.unwrap();
    keys.sort();
    assert_eq!(keys, ["passwords_alice", "passwords_bob"]);
}

#[tokio::test]
async fn seeding_can_be_disabled() {
    let state = AppStateBuilder::new()
        .kv_store(Arc::new(InMemoryKeyValueStore::new()))
        .user_directory(users())
        .seed_sample_data(false)
        .build()
        .unwrap();

    let session = state.login("bob", "b-pass").await.unwrap();
    assert!(session.vault.snapshot().await.is_empty());
}

#[tokio::test]
async fn export_sees_persisted_changes() {
    let state = build_state(Arc::new(InMemoryKeyValueStore::new()));
    let session = state.login("alice", "a-pass").await.unwrap();

    session
        .vault
        .add_item(AddItemRequest {
            category_id: "1".to_string(),
            subcategory_id: None,
            website: "Registry".to_string(),
            url: Some("https://registry.example.com".to_string()),
            account: Account::new("ci-bot", "t0k3n-Value", ""),
        })
        .await
        .unwrap();

    let export = state.export_service.export_csv("alice").await.unwrap();
    assert_eq!(export.row_count, 2);
    assert!(export.content.contains("\"ci-bot\""));
}

#[tokio::test]
async fn memory_backend_from_default_config() {
    let builder = AppStateBuilder::from_config(&AppConfig::default())
        .await
        .unwrap();
    let state = builder.user_directory(users()).build().unwrap();
    state.login("alice", "a-pass").await.unwrap();
}

#[tokio::test]
async fn icons_are_per_user() {
    let state = build_state(Arc::new(InMemoryKeyValueStore::new()));

    let alice = state.login("alice", "a-pass").await.unwrap();
    alice
        .icons
        .add("logo", "data:image/png;base64,AAAA")
        .await
        .unwrap();

    let bob = state.login("bob", "b-pass").await.unwrap();
    assert!(bob.icons.list().await.unwrap().is_empty());
    assert_eq!(alice.icons.list().await.unwrap().len(), 1);
}
