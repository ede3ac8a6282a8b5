//! Integration tests for the Volt Store client.
//!
//! # Running Tests
//!
//! ```bash
//! # Local persistence tests
//! cargo test -p volt-integration-tests
//!
//! # Include tests against a running API
//! VOLT_TEST_API_URL=http://localhost:8080/api/v1 \
//!     cargo test -p volt-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `persistence` - cart, theme and login surviving a restart
//! - `stub_api` - client behavior against a local stand-in for the API
//! - `live_api` - requests against a real store API (ignored by default)

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tempfile::TempDir;
use tokio::net::TcpListener;
use volt_storefront::AppState;
use volt_storefront::config::{ApiConfig, DEFAULT_API_BASE_URL};
use volt_storefront::storage::{FileStore, SharedStore};

/// API root used by the live tests (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("VOLT_TEST_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
}

/// API configuration pointing at [`api_base_url`].
///
/// # Panics
///
/// Panics if `VOLT_TEST_API_URL` is not a valid http(s) URL.
#[must_use]
#[allow(clippy::expect_used)]
pub fn api_config() -> ApiConfig {
    let mut config = ApiConfig::with_base_url(&api_base_url()).expect("Invalid VOLT_TEST_API_URL");
    config.timeout = Duration::from_secs(10);
    config
}

/// Serve `routes` under `/api/v1` on a free local port.
///
/// Returns an API configuration pointing at the server, which runs until
/// the test's runtime shuts down.
///
/// # Panics
///
/// Panics if no local port can be bound.
#[allow(clippy::expect_used, clippy::print_stderr)]
pub async fn spawn_api(routes: Router) -> ApiConfig {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub API");
    let addr = listener.local_addr().expect("Stub API has no address");

    let app = Router::new().nest("/api/v1", routes);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("Stub API stopped: {e}");
        }
    });

    let mut config =
        ApiConfig::with_base_url(&format!("http://{addr}/api/v1")).expect("Invalid stub API URL");
    config.timeout = Duration::from_secs(5);
    config
}

/// A storage file in its own temporary directory.
///
/// Each [`open`](Self::open) reads the file afresh, which is how a restart
/// of the client looks to the persisted state.
pub struct TestStorage {
    dir: TempDir,
}

impl TestStorage {
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Path of the storage file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("storage.json")
    }

    /// Directory holding the storage file.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Open the storage file as a shared store.
    ///
    /// # Panics
    ///
    /// Panics if the file exists but cannot be read.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn open(&self) -> SharedStore {
        Arc::new(FileStore::open(self.path()).expect("Failed to open store"))
    }

    /// Load the full application state from the storage file.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be opened or the client cannot be built.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn app(&self) -> AppState {
        self.app_with(&api_config())
    }

    /// Load the application state, talking to the API at `config`.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be opened or the client cannot be built.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn app_with(&self, config: &ApiConfig) -> AppState {
        AppState::with_store(config, self.open()).expect("Failed to build app state")
    }

    /// Raw contents of the storage file, parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the file is missing or not JSON.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn contents(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.path()).expect("Failed to read store file");
        serde_json::from_str(&raw).expect("Store file is not JSON")
    }
}

impl Default for TestStorage {
    fn default() -> Self {
        Self::new()
    }
}
