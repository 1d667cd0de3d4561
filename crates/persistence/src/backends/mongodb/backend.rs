//! MongoDB backend implementation.

use std::fmt::Debug;

use async_trait::async_trait;
use mongodb::bson::{Document, doc};
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::{debug, info};

use crate::connector::{MongoSettings, PoolSettings};
use crate::core::{Backend, BackendKind};
use crate::error::{BackendError, StorageResult};

const BACKEND_NAME: &str = "mongodb";

/// Server error code for "collection already exists".
const NAMESPACE_EXISTS: i32 = 48;

/// Document store for fruits.
pub struct MongoBackend {
    client: Client,
    database: Database,
    pub(crate) collection: Collection<Document>,
    settings: MongoSettings,
}

impl Debug for MongoBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoBackend")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl MongoBackend {
    /// Creates a client and verifies the server answers a ping.
    pub async fn connect(settings: &MongoSettings, pool: &PoolSettings) -> StorageResult<Self> {
        let mut options = ClientOptions::parse(&settings.uri)
            .await
            .map_err(|e| BackendError::connection(BACKEND_NAME, e))?;
        options.app_name = Some("fruits-api".to_string());
        options.connect_timeout = Some(pool.connect_timeout());
        options.server_selection_timeout = Some(pool.connect_timeout());
        options.max_pool_size = Some(pool.max_connections.max(1));

        let client =
            Client::with_options(options).map_err(|e| BackendError::connection(BACKEND_NAME, e))?;
        let database = client.database(&settings.database);
        let collection = database.collection::<Document>(&settings.collection);

        let backend = Self {
            client,
            database,
            collection,
            settings: settings.clone(),
        };

        backend
            .ping()
            .await
            .map_err(|e| BackendError::connection(BACKEND_NAME, e))?;

        info!(
            database = %settings.database,
            collection = %settings.collection,
            "Connected to MongoDB"
        );
        Ok(backend)
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the name of the fruits collection.
    pub fn collection_name(&self) -> &str {
        &self.settings.collection
    }

    /// Returns the names of every collection in the configured database.
    pub async fn collection_names(&self) -> StorageResult<Vec<String>> {
        self.database
            .list_collection_names()
            .await
            .map_err(|e| BackendError::query(BACKEND_NAME, e).into())
    }

    async fn ping(&self) -> mongodb::error::Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn ensure_collection(&self) -> mongodb::error::Result<()> {
        let existing = self.database.list_collection_names().await?;
        if existing.iter().any(|name| name == &self.settings.collection) {
            debug!(collection = %self.settings.collection, "Collection already exists");
            return Ok(());
        }

        match self
            .database
            .create_collection(&self.settings.collection)
            .await
        {
            Ok(()) => {
                info!(collection = %self.settings.collection, "Created collection");
                Ok(())
            }
            // Another process created it between the listing and the create.
            Err(e) if is_namespace_exists(&e) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

fn is_namespace_exists(err: &mongodb::error::Error) -> bool {
    matches!(err.kind.as_ref(), ErrorKind::Command(command) if command.code == NAMESPACE_EXISTS)
}

#[async_trait]
impl Backend for MongoBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::MongoDB
    }

    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        self.ping()
            .await
            .map_err(|e| BackendError::unavailable(BACKEND_NAME, e))
    }

    async fn initialize(&self) -> Result<(), BackendError> {
        self.ensure_collection()
            .await
            .map_err(|e| BackendError::schema(BACKEND_NAME, e))?;

        let index = IndexModel::builder().keys(doc! { "name": 1 }).build();
        self.collection
            .create_index(index)
            .await
            .map_err(|e| BackendError::schema(BACKEND_NAME, e))?;

        debug!(collection = %self.settings.collection, "Schema ready");
        Ok(())
    }
}
