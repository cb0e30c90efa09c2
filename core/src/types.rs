//! Domain DTOs for the DataFair API.
//!
//! # Design
//! These mirror the backend's JSON but are defined independently from the
//! mock-server crate; the integration tests catch schema drift. Timestamps
//! are kept as the strings the backend sends. Shapes that the client only
//! passes through (dashboard overview, survey details) stay `serde_json::Value`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payout method used when the caller does not pick one.
pub const DEFAULT_PAYOUT_METHOD: &str = "paypal";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Profile changes. Only fields that are set are sent; a password change
/// needs both `current_password` and `new_password`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl AuthStatus {
    pub fn unauthenticated() -> Self {
        Self::default()
    }
}

/// A category of personal data the user can license.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value_per_month: f64,
    #[serde(default)]
    pub privacy_level: String,
}

/// Whether the user shares one data type. Unknown fields are kept so a
/// read-modify-write sends back what it read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataPermission {
    pub data_type: String,
    pub enabled: bool,
    #[serde(default)]
    pub monthly_value: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EarningEntry {
    pub id: i64,
    #[serde(default)]
    pub survey_title: String,
    pub amount: f64,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Earnings {
    pub total_earnings: f64,
    pub monthly_earnings: f64,
    pub pending_payout: f64,
    pub earnings_history: Vec<EarningEntry>,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayoutRequest {
    pub amount: f64,
    pub method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub id: i64,
    #[serde(rename = "type", alias = "activity_type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "created_at")]
    pub timestamp: String,
    #[serde(default)]
    pub earning: f64,
}

/// Dashboard quick actions understood by `/api/dashboard/quick-actions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    GenerateTestEarnings,
    ToggleDataType,
    RequestPayout,
}
