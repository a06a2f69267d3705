// Account endpoints
//
// Login, the authenticated probe used by the route guard, and the
// password flows reachable from the public routes.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{LoginResponse, Single};

impl ApiClient {
    /// Exchange email + password for a bearer token and the user record.
    ///
    /// Accounts flagged for a mandatory password change fail with
    /// [`Error::PasswordResetRequired`].
    pub async fn login<U: DeserializeOwned>(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse<U>, Error> {
        debug!(email, "logging in");
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let raw: Value = self.post("auth/login", &body).await?;

        // Some deployments answer 200 with a flag instead of an error status.
        let flagged = ["requiresPasswordReset", "passwordResetRequired"]
            .iter()
            .any(|key| raw.get(key).and_then(Value::as_bool) == Some(true));
        if flagged {
            let message = raw
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Password reset required")
                .to_owned();
            return Err(Error::PasswordResetRequired { message });
        }

        let resp: Single<LoginResponse<U>> =
            serde_json::from_value(raw).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: String::new(),
            })?;
        debug!("login successful");
        Ok(resp.into_inner())
    }

    /// Lightweight authenticated probe: returns the current user.
    pub async fn me<U: DeserializeOwned>(&self) -> Result<U, Error> {
        let single: Single<U> = self.get("auth/me").await?;
        Ok(single.into_inner())
    }

    /// Ask the server to email a password-reset link.
    pub async fn forgot_password(&self, email: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
        }

        self.post_no_response("auth/forgot-password", &Body { email })
            .await
    }

    /// Replace the current user's password.
    pub async fn change_password(
        &self,
        current: &SecretString,
        new: &SecretString,
    ) -> Result<(), Error> {
        let body = json!({
            "currentPassword": current.expose_secret(),
            "newPassword": new.expose_secret(),
        });
        self.post_no_response("auth/change-password", &body).await
    }
}
