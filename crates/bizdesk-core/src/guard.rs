// ── Route guard ──
//
// Decides, for every route change, whether the target renders or the user
// is sent elsewhere. A stored token that has not been confirmed this run
// is checked with the `/auth/me` probe before anything protected renders.

use std::sync::Arc;

use bizdesk_api::ApiClient;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::model::AuthUser;
use crate::session::SessionContext;

/// Published guard status. Consumers show a neutral loading indicator
/// while `Checking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum GuardState {
    Checking,
    Authenticated,
    Unauthenticated,
}

/// Outcome of evaluating a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(String),
}

/// Public routes and where redirects go.
#[derive(Debug, Clone)]
pub struct RouteTable {
    pub public: Vec<String>,
    pub login: String,
    pub home: String,
}

impl RouteTable {
    /// Route matching ignores any query string and trailing slash.
    pub fn is_public(&self, target: &str) -> bool {
        let path = normalize(target);
        self.public.iter().any(|p| normalize(p) == path)
    }
}

impl From<&ClientConfig> for RouteTable {
    fn from(config: &ClientConfig) -> Self {
        Self {
            public: config.public_routes.clone(),
            login: config.login_route.clone(),
            home: config.home_route.clone(),
        }
    }
}

fn normalize(route: &str) -> &str {
    let path = route.split(['?', '#']).next().unwrap_or(route);
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

pub struct AuthGuard {
    api: Arc<ApiClient>,
    session: Arc<SessionContext>,
    routes: RouteTable,
    state: watch::Sender<GuardState>,
}

impl AuthGuard {
    pub(crate) fn new(api: Arc<ApiClient>, session: Arc<SessionContext>, routes: RouteTable) -> Self {
        let (state, _) = watch::channel(GuardState::Checking);
        Self {
            api,
            session,
            routes,
            state,
        }
    }

    pub fn state(&self) -> GuardState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<GuardState> {
        self.state.subscribe()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    fn set(&self, state: GuardState) {
        self.state.send_if_modified(|s| {
            let changed = *s != state;
            *s = state;
            changed
        });
    }

    /// Resolve the session for `target`. The decision is only returned
    /// once resolution has finished.
    pub async fn evaluate(&self, target: &str) -> GuardDecision {
        let public = self.routes.is_public(target);

        if !self.session.is_authenticated() {
            if self.session.stored_token().is_none() {
                self.set(GuardState::Unauthenticated);
                return if public {
                    GuardDecision::Render
                } else {
                    debug!(target, "no session, redirecting to login");
                    GuardDecision::Redirect(self.routes.login.clone())
                };
            }

            self.set(GuardState::Checking);
            if !self.probe().await {
                self.set(GuardState::Unauthenticated);
                return if public {
                    GuardDecision::Render
                } else {
                    GuardDecision::Redirect(self.routes.login.clone())
                };
            }
        }

        self.set(GuardState::Authenticated);
        if public {
            debug!(target, "already signed in, redirecting home");
            GuardDecision::Redirect(self.routes.home.clone())
        } else {
            GuardDecision::Render
        }
    }

    /// Confirm the stored token with the server.
    ///
    /// Success restores the session from storage and refreshes the cached
    /// user; any failure removes the stored token.
    async fn probe(&self) -> bool {
        match self.api.me::<AuthUser>().await {
            Ok(user) => {
                let restored = self
                    .session
                    .restore()
                    .and_then(|_| self.session.update_user(user));
                match restored {
                    Ok(()) if self.session.is_authenticated() => true,
                    Ok(()) => {
                        warn!("stored session vanished during restore");
                        false
                    }
                    Err(e) => {
                        warn!(error = %e, "could not restore session");
                        self.discard();
                        false
                    }
                }
            }
            Err(e) => {
                debug!(error = %e, "stored token rejected");
                self.discard();
                false
            }
        }
    }

    fn discard(&self) {
        if let Err(e) = self.session.teardown() {
            warn!(error = %e, "failed to clear stored session");
        }
    }

    /// React to a 401 seen outside the guard.
    pub fn handle_unauthorized(&self, target: &str) -> GuardDecision {
        self.discard();
        self.set(GuardState::Unauthenticated);
        if self.routes.is_public(target) {
            GuardDecision::Render
        } else {
            GuardDecision::Redirect(self.routes.login.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> RouteTable {
        RouteTable {
            public: vec!["/login".into(), "/forgot-password".into()],
            login: "/login".into(),
            home: "/".into(),
        }
    }

    #[test]
    fn public_matching_ignores_query_and_trailing_slash() {
        let r = routes();
        assert!(r.is_public("/login"));
        assert!(r.is_public("/login?next=/clients"));
        assert!(r.is_public("/forgot-password/"));
        assert!(!r.is_public("/clients"));
        assert!(!r.is_public("/"));
    }
}
