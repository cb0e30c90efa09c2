//! Earnings and payouts.

use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Earnings, PayoutRequest};

impl<T: Transport> ApiClient<T> {
    pub fn get_earnings(&self) -> Result<Earnings, ApiError> {
        self.get("/api/earnings")?.into_json()
    }

    pub fn request_payout(&self, amount: f64, method: &str) -> Result<Value, ApiError> {
        let request = PayoutRequest {
            amount,
            method: method.to_string(),
        };
        self.post("/api/payout", &request)?.into_json()
    }

    pub fn get_payouts(&self) -> Result<Vec<Value>, ApiError> {
        self.get("/api/payouts")?.field("payouts")
    }

    /// Development helper: ask the backend to generate a month of test earnings.
    pub fn generate_monthly_earnings(&self) -> Result<Value, ApiError> {
        self.post("/api/test/generate-earnings", &json!({}))?.into_json()
    }
}
