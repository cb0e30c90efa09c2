//! In-memory state of the mock backend.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

pub const DEMO_EMAIL: &str = "demo@datafair.test";
pub const DEMO_PASSWORD: &str = "demo1234";
pub const MIN_PASSWORD_LEN: usize = 6;

/// Current time formatted like the backend's `isoformat()`.
pub fn now_iso() -> String {
    Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[derive(Clone, Debug)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
    pub last_login: Option<String>,
}

impl User {
    /// The short form returned by login, register and `/auth/check`.
    pub fn summary(&self) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "first_name": self.first_name,
            "last_name": self.last_name,
        })
    }

    pub fn profile(&self) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "first_name": self.first_name,
            "last_name": self.last_name,
            "created_at": self.created_at,
            "last_login": self.last_login,
            "is_verified": true,
        })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct DataType {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub value_per_month: f64,
    pub privacy_level: &'static str,
}

pub const DATA_TYPES: [DataType; 5] = [
    DataType {
        id: "browsing_history",
        name: "Browsing History",
        description: "Websites you visit and time spent",
        value_per_month: 5.50,
        privacy_level: "medium",
    },
    DataType {
        id: "location_data",
        name: "Location Data",
        description: "GPS location and movement patterns",
        value_per_month: 8.25,
        privacy_level: "high",
    },
    DataType {
        id: "shopping_behavior",
        name: "Shopping Behavior",
        description: "Purchase history and preferences",
        value_per_month: 6.75,
        privacy_level: "medium",
    },
    DataType {
        id: "social_media",
        name: "Social Media Activity",
        description: "Posts, likes, and interactions",
        value_per_month: 4.00,
        privacy_level: "low",
    },
    DataType {
        id: "search_queries",
        name: "Search Queries",
        description: "Search terms and clicked results",
        value_per_month: 3.25,
        privacy_level: "medium",
    },
];

fn default_permissions() -> Vec<Value> {
    DATA_TYPES
        .iter()
        .map(|dt| {
            json!({
                "data_type": dt.id,
                "enabled": matches!(dt.id, "shopping_behavior" | "social_media"),
                "monthly_value": dt.value_per_month,
            })
        })
        .collect()
}

#[derive(Clone, Debug, Serialize)]
pub struct Survey {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub reward_amount: f64,
    pub estimated_duration: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct SurveyResponse {
    pub id: i64,
    pub survey_id: i64,
    pub user_id: i64,
    pub is_completed: bool,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub responses: Value,
}

#[derive(Clone, Debug)]
pub struct Earning {
    pub id: i64,
    pub title: String,
    pub amount: f64,
    pub completed_at: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Payout {
    pub id: String,
    pub amount: f64,
    pub method: String,
    pub status: String,
    pub requested_at: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Activity {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub timestamp: String,
    pub earning: f64,
}

#[derive(Debug)]
pub struct Store {
    pub users: Vec<User>,
    pub sessions: HashMap<String, i64>,
    pub permissions: HashMap<i64, Vec<Value>>,
    pub surveys: Vec<Survey>,
    pub responses: Vec<SurveyResponse>,
    pub earnings: HashMap<i64, Vec<Earning>>,
    pub payouts: HashMap<i64, Vec<Payout>>,
    pub activities: HashMap<i64, Vec<Activity>>,
    next_id: i64,
}

impl Default for Store {
    fn default() -> Self {
        let mut store = Store {
            users: Vec::new(),
            sessions: HashMap::new(),
            permissions: HashMap::new(),
            surveys: vec![
                Survey {
                    id: 1,
                    title: "Technologie-Nutzung im Alltag".to_string(),
                    description: "Welche Geräte und Apps nutzt du täglich?".to_string(),
                    reward_amount: 12.00,
                    estimated_duration: 10,
                },
                Survey {
                    id: 2,
                    title: "Einkaufsgewohnheiten".to_string(),
                    description: "Wie und wo kaufst du ein?".to_string(),
                    reward_amount: 8.50,
                    estimated_duration: 7,
                },
            ],
            responses: Vec::new(),
            earnings: HashMap::new(),
            payouts: HashMap::new(),
            activities: HashMap::new(),
            next_id: 100,
        };
        store.add_user(DEMO_EMAIL, DEMO_PASSWORD, "Demo", "Nutzer");
        store
    }
}

impl Store {
    pub fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_user(&mut self, email: &str, password: &str, first_name: &str, last_name: &str) -> User {
        let user = User {
            id: self.users.len() as i64 + 1,
            email: email.to_string(),
            password: password.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            created_at: now_iso(),
            last_login: None,
        };
        self.permissions.insert(user.id, default_permissions());
        self.users.push(user.clone());
        user
    }

    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_mut(&mut self, id: i64) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn survey(&self, id: i64) -> Option<&Survey> {
        self.surveys.iter().find(|s| s.id == id)
    }

    pub fn response_for(&mut self, user_id: i64, survey_id: i64) -> Option<&mut SurveyResponse> {
        self.responses
            .iter_mut()
            .find(|r| r.user_id == user_id && r.survey_id == survey_id)
    }

    pub fn add_earning(&mut self, user_id: i64, title: &str, amount: f64) {
        let earning = Earning {
            id: self.next_id(),
            title: title.to_string(),
            amount,
            completed_at: now_iso(),
        };
        self.earnings.entry(user_id).or_default().push(earning);
    }

    pub fn add_activity(&mut self, user_id: i64, kind: &str, title: &str, description: &str, earning: f64) {
        let activity = Activity {
            id: self.next_id(),
            kind: kind.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            timestamp: now_iso(),
            earning,
        };
        // Newest first.
        self.activities.entry(user_id).or_default().insert(0, activity);
    }

    pub fn total_earned(&self, user_id: i64) -> f64 {
        self.earnings
            .get(&user_id)
            .map(|e| e.iter().map(|e| e.amount).sum())
            .unwrap_or(0.0)
    }

    pub fn total_paid(&self, user_id: i64) -> f64 {
        self.payouts
            .get(&user_id)
            .map(|p| p.iter().map(|p| p.amount).sum())
            .unwrap_or(0.0)
    }

    pub fn balance(&self, user_id: i64) -> f64 {
        self.total_earned(user_id) - self.total_paid(user_id)
    }
}
