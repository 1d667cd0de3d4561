//! Shared setup for the REST API tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use fruits_persistence::core::{BackendKind, FruitStore};
use fruits_persistence::fixtures::FixtureSet;
use fruits_persistence::types::Fruit;
use fruits_persistence::{ConnectionParams, Connector};
use fruits_rest::{ServerConfig, create_app_with_config};
use serde_json::Value;
use tempfile::TempDir;

/// A running test server over a file-backed SQLite store.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<dyn FruitStore>,
    /// Keeps the database file alive.
    _dir: TempDir,
}

/// Creates a test server with the given configuration and an empty store.
pub async fn create_test_app_with_config(config: ServerConfig) -> TestApp {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let params = ConnectionParams::sqlite(dir.path().join("fruits.db"));
    let connector = Connector::configure(BackendKind::Sqlite, &params);
    let store = connector
        .initialize()
        .await
        .expect("Failed to initialize SQLite store");

    let app = create_app_with_config(Arc::clone(&store), config);
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        store,
        _dir: dir,
    }
}

/// Creates a test server under the default `/api` base path.
pub async fn create_test_app() -> TestApp {
    create_test_app_with_config(ServerConfig::for_testing()).await
}

/// Creates a test server and loads the nine built-in fruits.
pub async fn create_seeded_app() -> (TestApp, Vec<Fruit>) {
    let app = create_test_app().await;
    let seeded = FixtureSet::builtin()
        .expect("builtin fixtures parse")
        .load_into(app.store.as_ref())
        .await
        .expect("Failed to seed fixtures");
    (app, seeded)
}

/// Extracts the `name` of every fruit in a JSON array.
pub fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|f| f["name"].as_str().unwrap_or_default().to_string())
        .collect()
}
