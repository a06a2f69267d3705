// ── Resource binding ──
//
// Ties each domain record to its collection path, request types, and
// slice in the `DataStore`, so slices and page containers can be written
// once and reused for every entity.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::filter::Searchable;
use crate::model::{
    Client, ClientIntegration, Employee, EntityId, JobCard, Product, ProductCategory, Sale,
};
use crate::requests::{
    CreateCategoryRequest, CreateClientRequest, CreateEmployeeRequest, CreateIntegrationRequest,
    CreateJobCardRequest, CreateProductRequest, CreateSaleRequest, UpdateCategoryRequest,
    UpdateClientRequest, UpdateEmployeeRequest, UpdateIntegrationRequest, UpdateJobCardRequest,
    UpdateProductRequest, UpdateSaleRequest,
};
use crate::store::{DataStore, Slice};
use crate::validate::Validate;

/// A record type served by one REST collection.
pub trait Resource:
    Clone + Send + Sync + DeserializeOwned + Serialize + Searchable + 'static
{
    type Create: Serialize + Validate + Send + Sync;
    type Update: Serialize + Validate + Send + Sync;

    /// Collection path under the API base URL.
    const COLLECTION: &'static str;
    /// Human-readable singular name, used in errors and logs.
    const LABEL: &'static str;
    /// Query parameter that scopes list requests to a parent record.
    /// Scoped collections are not paginated.
    const SCOPE_PARAM: Option<&'static str> = None;

    fn id(&self) -> &EntityId;

    fn slice(store: &DataStore) -> &Arc<Slice<Self>>;
}

impl Resource for Client {
    type Create = CreateClientRequest;
    type Update = UpdateClientRequest;
    const COLLECTION: &'static str = "clients";
    const LABEL: &'static str = "client";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn slice(store: &DataStore) -> &Arc<Slice<Self>> {
        &store.clients
    }
}

impl Resource for Employee {
    type Create = CreateEmployeeRequest;
    type Update = UpdateEmployeeRequest;
    const COLLECTION: &'static str = "employees";
    const LABEL: &'static str = "employee";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn slice(store: &DataStore) -> &Arc<Slice<Self>> {
        &store.employees
    }
}

impl Resource for Product {
    type Create = CreateProductRequest;
    type Update = UpdateProductRequest;
    const COLLECTION: &'static str = "products";
    const LABEL: &'static str = "product";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn slice(store: &DataStore) -> &Arc<Slice<Self>> {
        &store.products
    }
}

impl Resource for ProductCategory {
    type Create = CreateCategoryRequest;
    type Update = UpdateCategoryRequest;
    const COLLECTION: &'static str = "product-categories";
    const LABEL: &'static str = "product category";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn slice(store: &DataStore) -> &Arc<Slice<Self>> {
        &store.categories
    }
}

impl Resource for Sale {
    type Create = CreateSaleRequest;
    type Update = UpdateSaleRequest;
    const COLLECTION: &'static str = "sales";
    const LABEL: &'static str = "sale";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn slice(store: &DataStore) -> &Arc<Slice<Self>> {
        &store.sales
    }
}

impl Resource for JobCard {
    type Create = CreateJobCardRequest;
    type Update = UpdateJobCardRequest;
    const COLLECTION: &'static str = "job-cards";
    const LABEL: &'static str = "job card";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn slice(store: &DataStore) -> &Arc<Slice<Self>> {
        &store.job_cards
    }
}

impl Resource for ClientIntegration {
    type Create = CreateIntegrationRequest;
    type Update = UpdateIntegrationRequest;
    const COLLECTION: &'static str = bizdesk_api::resources::INTEGRATIONS;
    const LABEL: &'static str = "integration";
    const SCOPE_PARAM: Option<&'static str> = Some("clientId");

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn slice(store: &DataStore) -> &Arc<Slice<Self>> {
        &store.integrations
    }
}
