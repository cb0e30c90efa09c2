//! Dashboard endpoints.

use serde_json::{json, Map, Value};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{QuickAction, DEFAULT_PAYOUT_METHOD};

impl<T: Transport> ApiClient<T> {
    /// The whole dashboard in one call, unwrapped from its `dashboard` field.
    pub fn get_dashboard_overview(&self) -> Result<Value, ApiError> {
        self.get("/api/dashboard/overview")?.field("dashboard")
    }

    /// Post `{"action": action, ...data}`. Keys in `data` are sent alongside
    /// the action name.
    pub fn handle_quick_action(&self, action: QuickAction, data: Map<String, Value>) -> Result<Value, ApiError> {
        let mut body = Map::new();
        body.insert("action".to_string(), json!(action));
        body.extend(data);
        self.post("/api/dashboard/quick-actions", &body)?.into_json()
    }

    pub fn generate_test_earnings(&self) -> Result<Value, ApiError> {
        self.handle_quick_action(QuickAction::GenerateTestEarnings, Map::new())
    }

    pub fn quick_toggle_data_type(&self, data_type_id: i64, enabled: bool) -> Result<Value, ApiError> {
        let mut data = Map::new();
        data.insert("dataTypeId".to_string(), json!(data_type_id));
        data.insert("enabled".to_string(), json!(enabled));
        self.handle_quick_action(QuickAction::ToggleDataType, data)
    }

    /// Request a payout from the dashboard; `method` defaults to PayPal.
    pub fn quick_payout_request(&self, amount: f64, method: Option<&str>) -> Result<Value, ApiError> {
        let mut data = Map::new();
        data.insert("amount".to_string(), json!(amount));
        data.insert("method".to_string(), json!(method.unwrap_or(DEFAULT_PAYOUT_METHOD)));
        self.handle_quick_action(QuickAction::RequestPayout, data)
    }
}
