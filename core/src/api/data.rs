//! Data types and sharing permissions.

use serde_json::{json, Value};
use tracing::warn;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{DataPermission, DataType};

impl<T: Transport> ApiClient<T> {
    pub fn get_data_types(&self) -> Result<Vec<DataType>, ApiError> {
        self.get("/api/data-types")?.field("data_types")
    }

    pub fn get_data_permissions(&self) -> Result<Vec<DataPermission>, ApiError> {
        self.get("/api/data-permissions")?.field("permissions")
    }

    /// Enable or disable sharing of one data type.
    ///
    /// Reads the full permission list, changes the matching entry and writes
    /// the list back. The read and the write are separate requests: a change
    /// made by another client in between is overwritten. Callers that update
    /// permissions concurrently must serialize these calls themselves.
    pub fn update_data_permission(&self, data_type: &str, enabled: bool) -> Result<Value, ApiError> {
        let mut permissions = self.get_data_permissions()?;

        let mut matched = false;
        for permission in permissions.iter_mut().filter(|p| p.data_type == data_type) {
            permission.enabled = enabled;
            matched = true;
        }
        if !matched {
            warn!(data_type, "no permission entry for data type, writing list unchanged");
        }

        self.post("/api/data-permissions", &json!({ "permissions": permissions }))?
            .into_json()
    }
}
