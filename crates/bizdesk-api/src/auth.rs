use secrecy::SecretString;

/// Source of the bearer token attached to outgoing requests.
///
/// The HTTP client never owns session state: it asks the provider for a
/// token on every request. `bizdesk-core`'s session context implements
/// this so there is exactly one place the token lives.
pub trait TokenProvider: Send + Sync {
    /// The token to send as `Authorization: Bearer <token>`, if any.
    fn bearer_token(&self) -> Option<SecretString>;
}

/// Provider for anonymous clients (login, forgot-password).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

impl TokenProvider for NoToken {
    fn bearer_token(&self) -> Option<SecretString> {
        None
    }
}

/// A fixed token, for scripts and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(SecretString);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }
}

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<SecretString> {
        Some(self.0.clone())
    }
}
