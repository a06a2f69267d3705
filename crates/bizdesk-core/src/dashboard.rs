// ── Dashboard facade ──
//
// Wires the session, API client, slices, guard, and auth slice together.
// Front ends hold one `Dashboard` and build page containers from it.

use std::sync::Arc;

use bizdesk_api::ApiClient;
use tracing::debug;

use crate::auth::AuthSlice;
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::guard::{AuthGuard, RouteTable};
use crate::model::Role;
use crate::page::PageContainer;
use crate::resource::Resource;
use crate::session::{SessionContext, SessionStorage};
use crate::store::DataStore;

/// Cheaply cloneable handle to the whole client-side data layer.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: ClientConfig,
    session: Arc<SessionContext>,
    api: Arc<ApiClient>,
    store: Arc<DataStore>,
    guard: AuthGuard,
    auth: AuthSlice,
}

impl Dashboard {
    /// Build the data layer. Does not touch storage or the network.
    pub fn new(config: ClientConfig, storage: impl SessionStorage + 'static) -> Result<Self, CoreError> {
        let session = Arc::new(SessionContext::new(storage));
        let api = Arc::new(ApiClient::new(
            config.api_url.as_str(),
            &config.transport(),
            Arc::clone(&session) as Arc<dyn bizdesk_api::TokenProvider>,
        )?);
        let store = Arc::new(DataStore::new(&api));
        let guard = AuthGuard::new(
            Arc::clone(&api),
            Arc::clone(&session),
            RouteTable::from(&config),
        );
        let auth = AuthSlice::new(Arc::clone(&api), Arc::clone(&session), Arc::clone(&store));

        Ok(Self {
            inner: Arc::new(DashboardInner {
                config,
                session,
                api,
                store,
                guard,
                auth,
            }),
        })
    }

    /// App start: restore a persisted session, if any.
    pub fn init(&self) -> Result<bool, CoreError> {
        let restored = self.inner.session.restore()?;
        self.inner.auth.sync_from_session();
        debug!(restored, "dashboard initialized");
        Ok(restored)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.inner.session
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.inner.api
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    pub fn guard(&self) -> &AuthGuard {
        &self.inner.guard
    }

    pub fn auth(&self) -> &AuthSlice {
        &self.inner.auth
    }

    /// A fresh page container for `R`, sized from the config.
    pub fn page<R: Resource>(&self) -> PageContainer<R> {
        PageContainer::with_limit(
            Arc::clone(R::slice(&self.inner.store)),
            self.inner.config.page_size,
        )
    }

    /// Role lookup for the employee form.
    pub async fn list_roles(&self) -> Result<Vec<Role>, CoreError> {
        let page = self.inner.api.list_where::<Role>("roles", &[]).await?;
        Ok(page.data)
    }
}
