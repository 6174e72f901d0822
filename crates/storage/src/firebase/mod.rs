//! Realtime Database REST adapter.
//!
//! Collections are opaque JSON maps keyed by server-generated push ids.
//! The API has no server-side filtering in this design, so ownership
//! filtering happens client-side after fetching a collection.

mod result_repo;
mod word_repo;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::repository::StorageError;

/// Repository backed by the hosted Realtime Database REST endpoint.
#[derive(Clone)]
pub struct FirebaseRepository {
    client: Client,
    base_url: String,
}

impl FirebaseRepository {
    #[must_use]
    pub fn new(database_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: database_url.trim_end_matches('/').to_owned(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{collection}.json", self.base_url)
    }

    /// Fetch a whole collection, skipping documents that no longer parse.
    async fn fetch_collection<T>(&self, collection: &str) -> Result<Vec<T>, StorageError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .get(self.collection_url(collection))
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Connection(format!(
                "{collection} fetch returned status {}",
                response.status()
            )));
        }

        // An empty collection comes back as JSON `null`, not an empty map.
        let documents: Option<HashMap<String, Value>> = response
            .json()
            .await
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let mut records = Vec::new();
        for (key, value) in documents.unwrap_or_default() {
            match serde_json::from_value(value) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(collection, key = %key, %err, "skipping malformed document");
                }
            }
        }
        Ok(records)
    }

    /// Append a document to a collection under a server-generated key.
    async fn push_document<T: Serialize + Sync>(
        &self,
        collection: &str,
        document: &T,
    ) -> Result<(), StorageError> {
        let response = self
            .client
            .post(self.collection_url(collection))
            .json(document)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Connection(format!(
                "{collection} push returned status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_its_trailing_slash() {
        let repo = FirebaseRepository::new("https://example.firebaseio.com/");
        assert_eq!(
            repo.collection_url("words"),
            "https://example.firebaseio.com/words.json"
        );
    }
}
