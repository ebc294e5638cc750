// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MongoDB client wrapper with typed operations.
//!
//! The connection is established lazily by the first request that needs it
//! and then shared by every clone of [`MongoDb`].

use crate::db::collections;
use crate::error::AppError;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOptions, IndexOptions, ReturnDocument};
use mongodb::results::UpdateResult;
use mongodb::{Client, Collection, Database, IndexModel};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Sort, offset and limit for a find.
#[derive(Debug, Clone, Default)]
pub struct FindSpec {
    pub sort: Option<Document>,
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

impl FindSpec {
    pub fn sorted(sort: Document) -> Self {
        Self {
            sort: Some(sort),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// MongoDB database client.
#[derive(Clone)]
pub struct MongoDb {
    uri: Option<Arc<str>>,
    database_name: Arc<str>,
    database: Arc<OnceCell<Database>>,
}

impl MongoDb {
    /// Create a client that connects on first use.
    pub fn new(uri: &str, database_name: &str) -> Self {
        Self {
            uri: Some(Arc::from(uri)),
            database_name: Arc::from(database_name),
            database: Arc::new(OnceCell::new()),
        }
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            uri: None,
            database_name: Arc::from("offline"),
            database: Arc::new(OnceCell::new()),
        }
    }

    /// Name of the database holding the collections.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Get the shared database handle, connecting if this is the first use.
    ///
    /// Concurrent first callers wait on the same connection attempt. A failed
    /// attempt leaves the cell empty so a later request retries.
    pub async fn database(&self) -> Result<&Database, AppError> {
        let uri = self.uri.as_deref().ok_or_else(|| {
            AppError::Database("Database not connected (offline mode)".to_string())
        })?;

        self.database
            .get_or_try_init(|| connect(uri, &self.database_name))
            .await
    }

    async fn documents(&self, name: &str) -> Result<Collection<Document>, AppError> {
        Ok(self.database().await?.collection::<Document>(name))
    }

    // ─── Generic Document Operations ─────────────────────────────

    /// Find documents matching `filter`.
    pub async fn find_documents(
        &self,
        collection: &str,
        filter: Document,
        spec: FindSpec,
    ) -> Result<Vec<Document>, AppError> {
        let mut options = FindOptions::default();
        options.sort = spec.sort;
        options.skip = spec.skip;
        options.limit = spec.limit;

        let cursor = self
            .documents(collection)
            .await?
            .find(filter)
            .with_options(options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Count documents matching `filter`.
    pub async fn count_documents(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<u64, AppError> {
        Ok(self
            .documents(collection)
            .await?
            .count_documents(filter)
            .await?)
    }

    /// Find the first document matching `filter`.
    pub async fn find_document(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, AppError> {
        Ok(self.documents(collection).await?.find_one(filter).await?)
    }

    /// Find a document by id.
    pub async fn find_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
    ) -> Result<Option<Document>, AppError> {
        self.find_document(collection, doc! { "_id": *id }).await
    }

    /// Insert a document and return its generated id.
    pub async fn insert_document(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<Bson, AppError> {
        let result = self
            .documents(collection)
            .await?
            .insert_one(document)
            .await?;
        Ok(result.inserted_id)
    }

    /// Apply an update to the document with `id`.
    ///
    /// Returns `false` if no document matched.
    pub async fn update_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        update: Document,
    ) -> Result<bool, AppError> {
        let result = self
            .update_document(collection, doc! { "_id": *id }, update, false)
            .await?;
        Ok(result.matched_count > 0)
    }

    /// Apply an update to the first document matching `filter`.
    pub async fn update_document(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
        upsert: bool,
    ) -> Result<UpdateResult, AppError> {
        Ok(self
            .documents(collection)
            .await?
            .update_one(filter, update)
            .upsert(upsert)
            .await?)
    }

    /// Apply an update and return the document as it is afterwards.
    pub async fn find_and_update(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<Option<Document>, AppError> {
        Ok(self
            .documents(collection)
            .await?
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    /// Delete the document with `id`.
    ///
    /// Returns `false` if no document matched.
    pub async fn delete_by_id(&self, collection: &str, id: &ObjectId) -> Result<bool, AppError> {
        let result = self
            .documents(collection)
            .await?
            .delete_one(doc! { "_id": *id })
            .await?;
        Ok(result.deleted_count > 0)
    }

    /// Run an aggregation pipeline.
    pub async fn aggregate(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<Vec<Document>, AppError> {
        let cursor = self
            .documents(collection)
            .await?
            .aggregate(pipeline)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    // ─── Join Records ────────────────────────────────────────────

    /// Insert `record` unless a document matching `key` already exists.
    ///
    /// This is a single upsert backed by a unique index on the key fields, so
    /// two concurrent callers cannot both insert. Returns the new id, or
    /// `None` if the record already existed.
    pub async fn insert_if_absent(
        &self,
        collection: &str,
        key: Document,
        mut record: Document,
    ) -> Result<Option<ObjectId>, AppError> {
        // Key fields come from the filter on insert.
        for field in key.keys() {
            record.remove(field);
        }

        let result = self
            .documents(collection)
            .await?
            .update_one(key, doc! { "$setOnInsert": record })
            .upsert(true)
            .await;

        match result {
            Ok(result) => Ok(result.upserted_id.and_then(|id| id.as_object_id())),
            // Lost a race with a concurrent insert of the same key.
            Err(e) if is_duplicate_key(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Connect, verify the deployment responds, and ensure indexes exist.
async fn connect(uri: &str, database_name: &str) -> Result<Database, AppError> {
    let client = Client::with_uri_str(uri)
        .await
        .map_err(|e| AppError::Database(format!("Failed to connect to MongoDB: {}", e)))?;
    let database = client.database(database_name);

    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| AppError::Database(format!("MongoDB ping failed: {}", e)))?;

    ensure_indexes(&database).await?;

    tracing::info!(database = database_name, "Connected to MongoDB");
    Ok(database)
}

/// Create the unique indexes that back join idempotency and user lookup.
async fn ensure_indexes(database: &Database) -> Result<(), AppError> {
    let unique = || IndexOptions::builder().unique(true).build();

    let indexes = [
        (
            collections::USER_CHALLENGES,
            doc! { "userId": 1, "challengeId": 1 },
        ),
        (collections::USER_EVENTS, doc! { "userId": 1, "eventId": 1 }),
        (collections::USERS, doc! { "email": 1 }),
    ];

    for (collection, keys) in indexes {
        let model = IndexModel::builder().keys(keys).options(unique()).build();
        database
            .collection::<Document>(collection)
            .create_index(model)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to create index on {}: {}", collection, e))
            })?;
    }

    tracing::debug!("Unique indexes ensured");
    Ok(())
}

/// Whether `err` is a unique index violation.
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == AppError::DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == AppError::DUPLICATE_KEY_CODE,
        _ => false,
    }
}
