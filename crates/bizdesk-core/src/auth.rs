// ── Auth slice ──
//
// Login form state and the account flows. A successful login establishes
// the session; logout tears it down and forgets every cached page.

use std::sync::Arc;

use bizdesk_api::ApiClient;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::AuthUser;
use crate::requests::{ChangePasswordRequest, LoginRequest};
use crate::session::SessionContext;
use crate::store::DataStore;
use crate::validate::{Validate, Validator};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Set when login was refused until the password is changed.
    pub password_reset_required: bool,
}

pub struct AuthSlice {
    api: Arc<ApiClient>,
    session: Arc<SessionContext>,
    store: Arc<DataStore>,
    state: watch::Sender<AuthState>,
}

impl AuthSlice {
    pub(crate) fn new(
        api: Arc<ApiClient>,
        session: Arc<SessionContext>,
        store: Arc<DataStore>,
    ) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        let slice = Self {
            api,
            session,
            store,
            state,
        };
        slice.sync_from_session();
        slice
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    fn start(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    fn fail(&self, err: &CoreError) {
        let reset = matches!(err, CoreError::PasswordResetRequired { .. });
        let message = err.to_string();
        self.state.send_modify(|s| {
            s.is_loading = false;
            s.error = Some(message);
            s.password_reset_required |= reset;
        });
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthUser, CoreError> {
        request.validate()?;
        self.start();
        self.state.send_modify(|s| s.password_reset_required = false);

        let email = request.email.trim();
        let response = match self.api.login::<AuthUser>(email, &request.password).await {
            Ok(response) => response,
            Err(e) => {
                let err = CoreError::from(e);
                warn!(email, error = %err, "login failed");
                self.fail(&err);
                return Err(err);
            }
        };

        let user = response.user;
        if let Err(err) = self
            .session
            .establish(response.access_token, user.clone())
        {
            self.fail(&err);
            return Err(err);
        }
        info!(email, "logged in");
        self.state.send_modify(|s| {
            s.user = Some(user.clone());
            s.is_authenticated = true;
            s.is_loading = false;
        });
        Ok(user)
    }

    /// End the session. Local state is cleared even if storage fails.
    pub fn logout(&self) -> Result<(), CoreError> {
        let result = self.session.teardown();
        self.store.reset();
        self.state.send_replace(AuthState::default());
        debug!("logged out");
        result
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), CoreError> {
        Validator::new().required_email("email", email).finish()?;
        self.start();
        match self.api.forgot_password(email.trim()).await {
            Ok(()) => {
                self.state.send_modify(|s| s.is_loading = false);
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.fail(&err);
                Err(err)
            }
        }
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<(), CoreError> {
        request.validate()?;
        self.start();
        match self
            .api
            .change_password(&request.current_password, &request.new_password)
            .await
        {
            Ok(()) => {
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.password_reset_required = false;
                });
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.fail(&err);
                Err(err)
            }
        }
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Mirror the session context, e.g. after the guard restored or
    /// tore it down.
    pub fn sync_from_session(&self) {
        let user = self.session.user();
        let is_authenticated = self.session.is_authenticated();
        self.state.send_if_modified(|s| {
            if s.user == user && s.is_authenticated == is_authenticated {
                return false;
            }
            s.user = user;
            s.is_authenticated = is_authenticated;
            true
        });
    }
}
