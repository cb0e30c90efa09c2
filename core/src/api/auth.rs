//! Authentication and profile endpoints.

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{AuthStatus, Credentials, ProfileUpdate, Registration, User};

impl<T: Transport> ApiClient<T> {
    /// Log in with email and password. The session cookie the backend sets is
    /// kept by the transport. Returns the response body unchanged.
    pub fn login(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let data = self.post("/auth/login", &credentials)?.into_json()?;
        info!(email, "login successful");
        Ok(data)
    }

    pub fn logout(&self) -> Result<Value, ApiError> {
        let data = self.post("/auth/logout", &json!({}))?.into_json()?;
        info!("logout successful");
        Ok(data)
    }

    pub fn register(&self, registration: &Registration) -> Result<Value, ApiError> {
        let data = self.post("/auth/register", registration)?.into_json()?;
        info!(email = %registration.email, "registration successful");
        Ok(data)
    }

    /// Current authentication status.
    ///
    /// A 401 or 403 answer means "not logged in" and yields an unauthenticated
    /// status; transport and other failures are returned.
    pub fn check_auth(&self) -> Result<AuthStatus, ApiError> {
        match self.get("/auth/check") {
            Ok(body) => body.into_json(),
            Err(ApiError::Unauthorized | ApiError::Forbidden) => {
                debug!("not authenticated");
                Ok(AuthStatus::unauthenticated())
            }
            Err(err) => Err(err),
        }
    }

    /// Whether a page that requires a session may be shown. A caller that
    /// gets `false` redirects to its login page.
    pub fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self.check_auth()?.authenticated)
    }

    pub fn get_profile(&self) -> Result<User, ApiError> {
        self.get("/auth/profile")?.field("user")
    }

    pub fn update_profile(&self, update: &ProfileUpdate) -> Result<Value, ApiError> {
        self.put("/auth/profile", update)?.into_json()
    }
}
