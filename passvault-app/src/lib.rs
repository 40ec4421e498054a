//! Application bootstrap for passvault.
//!
//! Provides `AppState` (service container + login session), `AppStateBuilder`
//! (adapter injection) and `AppConfig` (TOML configuration).

pub mod adapters;
pub mod config;

use std::sync::Arc;

use tokio::sync::RwLock;

use passvault_core::error::{CoreError, CoreResult};
use passvault_core::services::{
    AuthService, ExportService, IconService, ServiceContext, UserDirectory, VaultService,
};
use passvault_core::traits::{InMemoryKeyValueStore, KeyValueStore};

pub use config::{AppConfig, StorageBackend, StorageConfig};

/// Services bound to the logged-in user.
pub struct UserSession {
    /// Logged-in user name
    pub user: String,
    /// Password tree service
    pub vault: VaultService,
    /// Uploaded icon service
    pub icons: IconService,
}

/// Platform-agnostic application state.
///
/// Holds the `ServiceContext`, the stateless services and the current
/// login session. Every frontend constructs this once via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds the storage adapter)
    pub ctx: Arc<ServiceContext>,
    /// Login gate
    pub auth_service: AuthService,
    /// CSV export service
    pub export_service: ExportService,
    seed_sample_data: bool,
    session: RwLock<Option<Arc<UserSession>>>,
}

impl AppState {
    /// Log in and load the user's password tree.
    ///
    /// Replaces any previous session. On failure the previous session is kept.
    pub async fn login(&self, username: &str, password: &str) -> CoreResult<Arc<UserSession>> {
        let user = self.auth_service.login(username, password)?;

        let vault = VaultService::new(Arc::clone(&self.ctx), user.clone())
            .with_seed_sample_data(self.seed_sample_data);
        vault.load().await?;

        let session = Arc::new(UserSession {
            icons: IconService::new(Arc::clone(&self.ctx), user.clone()),
            user,
            vault,
        });
        *self.session.write().await = Some(Arc::clone(&session));
        Ok(session)
    }

    /// End the current session (no-op when nobody is logged in).
    pub async fn logout(&self) {
        if let Some(session) = self.session.write().await.take() {
            log::info!("User {} logged out", session.user);
        }
    }

    /// Current session.
    ///
    /// # Errors
    /// Returns `CoreError::NotLoggedIn` when nobody is logged in.
    pub async fn session(&self) -> CoreResult<Arc<UserSession>> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(CoreError::NotLoggedIn)
    }

    /// Whether a user is logged in.
    pub async fn is_logged_in(&self) -> bool {
        self.session.read().await.is_some()
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `kv_store` — where documents are stored
///
/// # Optional
/// - `user_directory` — defaults to `UserDirectory::from_env()`
/// - `seed_sample_data` — defaults to `true`
pub struct AppStateBuilder {
    kv_store: Option<Arc<dyn KeyValueStore>>,
    user_directory: Option<UserDirectory>,
    seed_sample_data: bool,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            kv_store: None,
            user_directory: None,
            seed_sample_data: true,
        }
    }

    /// Start from a configuration: creates the configured storage adapter.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if the configured backend is
    /// incomplete or was not compiled in.
    pub async fn from_config(config: &AppConfig) -> CoreResult<Self> {
        let store = create_kv_store(&config.storage).await?;
        Ok(Self::new()
            .kv_store(store)
            .seed_sample_data(config.seed_sample_data))
    }

    #[must_use]
    pub fn kv_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.kv_store = Some(store);
        self
    }

    #[must_use]
    pub fn user_directory(mut self, directory: UserDirectory) -> Self {
        self.user_directory = Some(directory);
        self
    }

    #[must_use]
    pub fn seed_sample_data(mut self, seed: bool) -> Self {
        self.seed_sample_data = seed;
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let kv_store = self
            .kv_store
            .ok_or_else(|| CoreError::ValidationError("kv_store is required".to_string()))?;
        let user_directory = self.user_directory.unwrap_or_else(UserDirectory::from_env);
        log::info!("Configured {} user(s)", user_directory.len());

        let ctx = Arc::new(ServiceContext::new(kv_store));

        Ok(AppState {
            auth_service: AuthService::new(user_directory),
            export_service: ExportService::new(Arc::clone(&ctx)),
            ctx,
            seed_sample_data: self.seed_sample_data,
            session: RwLock::new(None),
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the storage adapter selected by `[storage]`.
pub async fn create_kv_store(config: &StorageConfig) -> CoreResult<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::Memory => {
            log::warn!("Using in-memory storage, data is lost on exit");
            Ok(Arc::new(InMemoryKeyValueStore::new()))
        }
        StorageBackend::File => file_store(config).await,
        StorageBackend::Http => http_store(config),
    }
}

#[cfg(feature = "file-store")]
async fn file_store(config: &StorageConfig) -> CoreResult<Arc<dyn KeyValueStore>> {
    let store = adapters::JsonFileStore::open(&config.path).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "file-store"))]
#[allow(clippy::unused_async)]
async fn file_store(_config: &StorageConfig) -> CoreResult<Arc<dyn KeyValueStore>> {
    Err(CoreError::ValidationError(
        "file storage requires the `file-store` feature".to_string(),
    ))
}

#[cfg(feature = "http-store")]
fn http_store(config: &StorageConfig) -> CoreResult<Arc<dyn KeyValueStore>> {
    let base_url = config.base_url.as_deref().ok_or_else(|| {
        CoreError::ValidationError("storage.base_url is required for http storage".to_string())
    })?;
    let timeout = std::time::Duration::from_secs(config.timeout_secs);
    let store = adapters::HttpKeyValueStore::new(base_url, timeout)?;
    log::info!("Using remote storage at {}", store.endpoint());
    Ok(Arc::new(store))
}

#[cfg(not(feature = "http-store"))]
fn http_store(_config: &StorageConfig) -> CoreResult<Arc<dyn KeyValueStore>> {
    Err(CoreError::ValidationError(
        "http storage requires the `http-store` feature".to_string(),
    ))
}
