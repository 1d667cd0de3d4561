//! PostgreSQL backend integration tests.
//!
//! Configuration tests run everywhere. Tests against a live server use
//! testcontainers and are ignored unless Docker is available.
//!
//! Run with: `cargo test -p fruits-persistence --features postgres -- --include-ignored`

#![cfg(feature = "postgres")]

mod common;

use fruits_persistence::backends::sql::{InsertIdStrategy, SqlConfig, SqlDialect};
use fruits_persistence::connector::{NetworkSettings, PoolSettings};
use fruits_persistence::core::BackendKind;

// ============================================================================
// Configuration (no PostgreSQL instance required)
// ============================================================================

#[test]
fn test_postgres_defaults() {
    let settings = NetworkSettings::postgres_defaults();
    assert_eq!(settings.host, "localhost");
    assert_eq!(settings.port, 5432);
    assert_eq!(settings.user, "demo");
    assert_eq!(settings.database, "demodb");
}

#[test]
fn test_postgres_dialect() {
    let dialect = SqlDialect::from_kind(BackendKind::Postgres);
    assert_eq!(dialect, Some(SqlDialect::Postgres));
    assert_eq!(SqlDialect::Postgres.placeholder(2), "$2");
    assert_eq!(
        SqlDialect::Postgres.insert_id_strategy(),
        InsertIdStrategy::Returning
    );
}

#[test]
fn test_postgres_config_is_not_in_memory() {
    let config = SqlConfig::network(
        SqlDialect::Postgres,
        &NetworkSettings::postgres_defaults(),
        &PoolSettings::default(),
    )
    .unwrap();
    assert!(!config.in_memory);
    assert_eq!(config.dialect, SqlDialect::Postgres);
}

// ============================================================================
// Integration (requires Docker)
// ============================================================================

mod integration {
    use super::common;

    use fruits_persistence::backends::sql::{SqlBackend, SqlConfig, SqlDialect};
    use fruits_persistence::connector::{NetworkSettings, PoolSettings};
    use fruits_persistence::core::{Backend, BackendKind, FruitRepository};
    use fruits_persistence::types::{FruitId, NewFruit};

    use testcontainers::ImageExt;
    use testcontainers::runners::AsyncRunner;
    use testcontainers_modules::postgres::Postgres;
    use tokio::sync::{Mutex, MutexGuard, OnceCell};

    /// Shared PostgreSQL container reused across all tests in this module.
    struct SharedPg {
        host: String,
        port: u16,
        /// Tests share one table, so they take turns.
        lock: Mutex<()>,
        /// Kept alive for the duration of the test binary; dropped at process exit.
        _container: testcontainers::ContainerAsync<Postgres>,
    }

    static SHARED_PG: OnceCell<SharedPg> = OnceCell::const_new();

    async fn shared_pg() -> &'static SharedPg {
        SHARED_PG
            .get_or_init(|| async {
                let run_id = std::env::var("GITHUB_RUN_ID").unwrap_or_default();
                let container = Postgres::default()
                    .with_label("github.run_id", &run_id)
                    .start()
                    .await
                    .expect("Failed to start PostgreSQL container");

                let port = container
                    .get_host_port_ipv4(5432)
                    .await
                    .expect("Failed to get host port");

                let host = container
                    .get_host()
                    .await
                    .expect("Failed to get host")
                    .to_string();

                SharedPg {
                    host,
                    port,
                    lock: Mutex::new(()),
                    _container: container,
                }
            })
            .await
    }

    fn settings(pg: &SharedPg) -> NetworkSettings {
        NetworkSettings {
            host: pg.host.clone(),
            port: pg.port,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "postgres".to_string(),
        }
    }

    /// Connects a fresh backend to the shared container. Pools are tied to
    /// the runtime that created them, so every test builds its own.
    async fn create_backend() -> (MutexGuard<'static, ()>, SqlBackend) {
        let pg = shared_pg().await;
        let guard = pg.lock.lock().await;

        let pool = PoolSettings {
            max_connections: 5,
            ..Default::default()
        };
        let config = SqlConfig::network(SqlDialect::Postgres, &settings(pg), &pool)
            .expect("Failed to build PostgreSQL config");
        let backend = SqlBackend::connect(config)
            .await
            .expect("Failed to create PostgreSQL backend");
        backend
            .initialize()
            .await
            .expect("Failed to initialize schema");
        (guard, backend)
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn postgres_integration_repository_checks() {
        let (_guard, backend) = create_backend().await;
        common::run_repository_checks(
            &backend,
            &[
                FruitId::Numeric(0),
                FruitId::Numeric(i64::MAX),
                FruitId::Opaque("mango".to_string()),
            ],
        )
        .await;
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn postgres_integration_initialize_is_idempotent() {
        let (_guard, backend) = create_backend().await;
        backend.initialize().await.unwrap();
        backend.initialize().await.unwrap();

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'fruits'",
        )
        .fetch_one(backend.pool())
        .await
        .unwrap();
        assert_eq!(tables, 1);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn postgres_integration_returning_id() {
        let (_guard, backend) = create_backend().await;
        backend.delete_all().await.unwrap();

        let first = backend.insert(NewFruit::new("Kiwi", "Winter")).await.unwrap();
        let second = backend.insert(NewFruit::new("Lime", "Winter")).await.unwrap();

        let (FruitId::Numeric(a), FruitId::Numeric(b)) = (&first.id, &second.id) else {
            panic!("expected numeric ids, got {} and {}", first.id, second.id);
        };
        assert!(b > a);
        assert!(backend.exists(&second.id).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn postgres_integration_health() {
        let (_guard, backend) = create_backend().await;
        assert_eq!(backend.kind(), BackendKind::Postgres);
        backend.health_check().await.unwrap();
    }
}
