// ── Data store ──
//
// One slice per entity, all sharing the same API client.

mod slice;
mod state;

use std::sync::Arc;

use bizdesk_api::ApiClient;

use crate::model::{
    Client, ClientIntegration, Employee, JobCard, Product, ProductCategory, Sale,
};

pub use slice::{FetchOutcome, Slice};
pub use state::ListState;

pub struct DataStore {
    pub clients: Arc<Slice<Client>>,
    pub employees: Arc<Slice<Employee>>,
    pub products: Arc<Slice<Product>>,
    pub categories: Arc<Slice<ProductCategory>>,
    pub sales: Arc<Slice<Sale>>,
    pub job_cards: Arc<Slice<JobCard>>,
    pub integrations: Arc<Slice<ClientIntegration>>,
}

impl DataStore {
    pub fn new(api: &Arc<ApiClient>) -> Self {
        Self {
            clients: Arc::new(Slice::new(Arc::clone(api))),
            employees: Arc::new(Slice::new(Arc::clone(api))),
            products: Arc::new(Slice::new(Arc::clone(api))),
            categories: Arc::new(Slice::new(Arc::clone(api))),
            sales: Arc::new(Slice::new(Arc::clone(api))),
            job_cards: Arc::new(Slice::new(Arc::clone(api))),
            integrations: Arc::new(Slice::new(Arc::clone(api))),
        }
    }

    /// Forget every cached page (on logout).
    pub fn reset(&self) {
        self.clients.reset();
        self.employees.reset();
        self.products.reset();
        self.categories.reset();
        self.sales.reset();
        self.job_cards.reset();
        self.integrations.reset();
    }
}
