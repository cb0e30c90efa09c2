//! Activity feed.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::Activity;

impl<T: Transport> ApiClient<T> {
    pub fn get_activities(&self) -> Result<Vec<Activity>, ApiError> {
        self.get("/api/activities")?.field("activities")
    }
}
