// Collection endpoints
//
// Every entity exposes the same REST shape under its collection path:
// `GET /c?page=&limit=`, `GET /c/:id`, `POST /c`, `PATCH /c/:id`,
// `DELETE /c/:id`. Integrations are additionally scoped by `clientId`.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{Page, Single};

/// Collection path for client integrations.
pub const INTEGRATIONS: &str = "integrations";

impl ApiClient {
    /// Fetch one page of a collection.
    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        page: u32,
        limit: u32,
    ) -> Result<Page<T>, Error> {
        self.get_with_params(
            collection,
            &[("page", page.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    /// Fetch a collection filtered by arbitrary query parameters.
    pub async fn list_where<T: DeserializeOwned>(
        &self,
        collection: &str,
        params: &[(&str, String)],
    ) -> Result<Page<T>, Error> {
        self.get_with_params(collection, params).await
    }

    /// Fetch the integrations belonging to one client.
    pub async fn list_integrations<T: DeserializeOwned>(
        &self,
        client_id: &str,
    ) -> Result<Page<T>, Error> {
        self.list_where(INTEGRATIONS, &[("clientId", client_id.to_owned())])
            .await
    }

    /// Fetch a single record by id.
    pub async fn get_record<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<T, Error> {
        let single: Single<T> = self.get(&format!("{collection}/{id}")).await?;
        Ok(single.into_inner())
    }

    /// Create a record, returning the server's copy.
    pub async fn create_record<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        collection: &str,
        body: &B,
    ) -> Result<T, Error> {
        let single: Single<T> = self.post(collection, body).await?;
        Ok(single.into_inner())
    }

    /// Partially update a record by id.
    pub async fn update_record<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        collection: &str,
        id: &str,
        body: &B,
    ) -> Result<T, Error> {
        let single: Single<T> = self.patch(&format!("{collection}/{id}"), body).await?;
        Ok(single.into_inner())
    }

    /// Delete a record by id.
    pub async fn delete_record(&self, collection: &str, id: &str) -> Result<(), Error> {
        self.delete(&format!("{collection}/{id}")).await
    }
}
