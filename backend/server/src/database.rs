//! # Document store
//!
//! Every collection is one Redis hash: `hikejo:<collection>`, field = document
//! `_id`, value = the document as JSON.
//!
//! ## Requirements
//!
//! - Lookups by id for accounts, trips and bookings
//! - Small collections, scanned and filtered in memory for everything else
//! - No transactions: each write replaces one whole document
//!
//! ## Implementation
//!
//! - Redis hash per collection, compact and O(1) by id
//! - `HVALS` for scans, `HSET` to upsert, `HDEL` to delete
//! - Without a `REDIS_URL` the same interface runs on an in-memory map, used for
//!   local development and the test suite
//!
//! ## Commands
//!
//! Inspect a collection.
//! ```sh
//! redis-cli HGETALL hikejo:trips
//! ```
use std::{collections::HashMap, sync::Arc, time::Duration};

use records::accounts::Role;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Adventurers,
    Companies,
    Trips,
    Bookings,
    Contacts,
    Pages,
}

impl Collection {
    pub fn accounts(role: Role) -> Self {
        match role {
            Role::Adventurer => Collection::Adventurers,
            Role::Company => Collection::Companies,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Collection::Adventurers => "hikejo:adventurers",
            Collection::Companies => "hikejo:companies",
            Collection::Trips => "hikejo:trips",
            Collection::Bookings => "hikejo:bookings",
            Collection::Contacts => "hikejo:contacts",
            Collection::Pages => "hikejo:pages",
        }
    }
}

type Documents = HashMap<Collection, HashMap<String, String>>;

#[derive(Clone)]
pub enum Database {
    Redis(ConnectionManager),
    Memory(Arc<RwLock<Documents>>),
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, redis::RedisError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_secs(2));

    let client = Client::open(redis_url)?;

    client.get_connection_manager_with_config(config).await
}

impl Database {
    pub async fn connect(redis_url: Option<&str>) -> Result<Self, AppError> {
        match redis_url {
            Some(url) => {
                info!("Connecting to Redis...");

                Ok(Database::Redis(init_redis(url).await?))
            }
            None => {
                warn!("REDIS_URL not set, documents will only live in memory");

                Ok(Database::memory())
            }
        }
    }

    pub fn memory() -> Self {
        Database::Memory(Arc::new(RwLock::new(HashMap::new())))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<T>, AppError> {
        let raw: Option<String> = match self {
            Database::Redis(manager) => {
                let mut connection = manager.clone();

                connection
                    .hget::<_, _, Option<String>>(collection.key(), id)
                    .await?
            }
            Database::Memory(store) => store
                .read()
                .await
                .get(&collection)
                .and_then(|documents| documents.get(id).cloned()),
        };

        Ok(raw.map(|json| serde_json::from_str(&json)).transpose()?)
    }

    pub async fn all<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, AppError> {
        let raw: Vec<String> = match self {
            Database::Redis(manager) => {
                let mut connection = manager.clone();

                connection.hvals::<_, Vec<String>>(collection.key()).await?
            }
            Database::Memory(store) => store
                .read()
                .await
                .get(&collection)
                .map(|documents| documents.values().cloned().collect())
                .unwrap_or_default(),
        };

        raw.iter()
            .map(|json| serde_json::from_str(json).map_err(AppError::from))
            .collect()
    }

    pub async fn find<T, F>(&self, collection: Collection, predicate: F) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let mut documents: Vec<T> = self.all(collection).await?;
        documents.retain(|document| predicate(document));

        Ok(documents)
    }

    pub async fn find_one<T, F>(
        &self,
        collection: Collection,
        predicate: F,
    ) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let documents: Vec<T> = self.all(collection).await?;

        Ok(documents.into_iter().find(|document| predicate(document)))
    }

    pub async fn exists<T, F>(&self, collection: Collection, predicate: F) -> Result<bool, AppError>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        Ok(self.find_one(collection, predicate).await?.is_some())
    }

    /// Inserts or replaces the document stored under `id`.
    pub async fn put<T: Serialize>(
        &self,
        collection: Collection,
        id: &str,
        document: &T,
    ) -> Result<(), AppError> {
        let json = serde_json::to_string(document)?;

        match self {
            Database::Redis(manager) => {
                let mut connection = manager.clone();

                connection
                    .hset::<_, _, _, ()>(collection.key(), id, json)
                    .await?;
            }
            Database::Memory(store) => {
                store
                    .write()
                    .await
                    .entry(collection)
                    .or_default()
                    .insert(id.to_string(), json);
            }
        }

        Ok(())
    }

    pub async fn remove(&self, collection: Collection, id: &str) -> Result<bool, AppError> {
        let removed = self.remove_many(collection, &[id.to_string()]).await?;

        Ok(removed > 0)
    }

    pub async fn remove_many(&self, collection: Collection, ids: &[String]) -> Result<usize, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        match self {
            Database::Redis(manager) => {
                let mut connection = manager.clone();

                Ok(connection
                    .hdel::<_, _, usize>(collection.key(), ids)
                    .await?)
            }
            Database::Memory(store) => {
                let mut store = store.write().await;
                let Some(documents) = store.get_mut(&collection) else {
                    return Ok(0);
                };

                Ok(ids
                    .iter()
                    .filter(|id| documents.remove(id.as_str()).is_some())
                    .count())
            }
        }
    }
}
