//! Survey endpoints. Survey payloads are passed through as JSON.

use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;

impl<T: Transport> ApiClient<T> {
    pub fn get_surveys(&self) -> Result<Value, ApiError> {
        self.get("/api/surveys/available")?.into_json()
    }

    pub fn get_survey_details(&self, survey_id: i64) -> Result<Value, ApiError> {
        self.get(&format!("/api/surveys/{survey_id}"))?.into_json()
    }

    pub fn start_survey(&self, survey_id: i64) -> Result<Value, ApiError> {
        self.post(&format!("/api/surveys/{survey_id}/start"), &json!({}))?
            .into_json()
    }

    pub fn submit_survey(&self, survey_id: i64, responses: &Value) -> Result<Value, ApiError> {
        self.post(
            &format!("/api/surveys/{survey_id}/submit"),
            &json!({ "responses": responses }),
        )?
        .into_json()
    }

    pub fn get_my_survey_responses(&self) -> Result<Vec<Value>, ApiError> {
        self.get("/api/surveys/my-responses")?.field("responses")
    }
}
