//! In-memory stand-in for the DataFair backend.
//!
//! Serves the `/auth/*` and `/api/*` routes the client uses, with sessions
//! carried in a `session` cookie. Failures answer with `{"error": "..."}`;
//! malformed JSON bodies get axum's plain-text rejection.

pub mod store;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use store::{now_iso, Payout, Store, DATA_TYPES, MIN_PASSWORD_LEN};

pub use store::{DEMO_EMAIL, DEMO_PASSWORD};

pub const SESSION_COOKIE: &str = "session";

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_store(Store::default())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/register", post(register))
        .route("/auth/check", get(check_auth))
        .route("/auth/profile", get(get_profile).put(update_profile))
        .route("/api/dashboard/overview", get(dashboard_overview))
        .route("/api/dashboard/quick-actions", post(quick_action))
        .route("/api/data-types", get(data_types))
        .route("/api/data-permissions", get(get_permissions).post(set_permissions))
        .route("/api/earnings", get(earnings))
        .route("/api/payout", post(request_payout))
        .route("/api/payouts", get(payouts))
        .route("/api/test/generate-earnings", post(generate_monthly_earnings))
        .route("/api/surveys/available", get(available_surveys))
        .route("/api/surveys/my-responses", get(my_responses))
        .route("/api/surveys/{id}", get(survey_details))
        .route("/api/surveys/{id}/start", post(start_survey))
        .route("/api/surveys/{id}/submit", post(submit_survey))
        .route("/api/activities", get(activities))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// A failed request, rendered as `{"error": message}`.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }

    fn bad_request(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Authentication required")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

type ApiResult<T> = Result<T, AppError>;

fn session_user(store: &Store, jar: &CookieJar) -> ApiResult<i64> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| store.sessions.get(cookie.value()).copied())
        .ok_or_else(AppError::unauthorized)
}

async fn health() -> &'static str {
    "ok"
}

// --- auth ---

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

async fn login(
    State(db): State<Db>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<Value>)> {
    let email = input.email.trim().to_lowercase();
    if email.is_empty() || input.password.is_empty() {
        return Err(AppError::bad_request("Email and password are required"));
    }

    let mut store = db.write().await;
    let user_id = store
        .user_by_email(&email)
        .filter(|u| u.password == input.password)
        .map(|u| u.id)
        .ok_or_else(|| AppError::new(StatusCode::UNAUTHORIZED, "Invalid email or password"))?;

    let token = Uuid::new_v4().to_string();
    store.sessions.insert(token.clone(), user_id);
    let user = store.user_mut(user_id).ok_or_else(AppError::unauthorized)?;
    user.last_login = Some(now_iso());

    let mut summary = user.summary();
    summary["last_login"] = json!(user.last_login);
    info!(user_id, "login");

    let cookie = Cookie::build((SESSION_COOKIE, token)).path("/").http_only(true);
    Ok((
        jar.add(cookie),
        Json(json!({ "success": true, "message": "Login successful", "user": summary })),
    ))
}

async fn logout(State(db): State<Db>, jar: CookieJar) -> ApiResult<(CookieJar, Json<Value>)> {
    let mut store = db.write().await;
    session_user(&store, &jar)?;
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        store.sessions.remove(cookie.value());
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Json(json!({ "success": true, "message": "Logout successful" }))))
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let email = input.email.trim().to_lowercase();
    let first_name = input.first_name.trim();
    let last_name = input.last_name.trim();
    if email.is_empty() || input.password.is_empty() || first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::bad_request("All fields are required"));
    }
    if !email.contains('@') {
        return Err(AppError::bad_request("Invalid email format"));
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request("Passwort muss mindestens 6 Zeichen lang sein"));
    }

    let mut store = db.write().await;
    if store.user_by_email(&email).is_some() {
        return Err(AppError::new(StatusCode::CONFLICT, "User with this email already exists"));
    }
    let user = store.add_user(&email, &input.password, first_name, last_name);
    info!(user_id = user.id, "registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Registration successful", "user": user.summary() })),
    ))
}

async fn check_auth(State(db): State<Db>, jar: CookieJar) -> Json<Value> {
    let store = db.read().await;
    match session_user(&store, &jar).ok().and_then(|id| store.user(id)) {
        Some(user) => Json(json!({ "authenticated": true, "user": user.summary() })),
        None => Json(json!({ "authenticated": false })),
    }
}

async fn get_profile(State(db): State<Db>, jar: CookieJar) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let user = store
        .user(session_user(&store, &jar)?)
        .ok_or_else(AppError::unauthorized)?;
    Ok(Json(json!({ "user": user.profile() })))
}

#[derive(Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

async fn update_profile(
    State(db): State<Db>,
    jar: CookieJar,
    Json(input): Json<ProfileUpdate>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let user_id = session_user(&store, &jar)?;
    let user = store.user_mut(user_id).ok_or_else(AppError::unauthorized)?;

    if let (Some(current), Some(new)) = (&input.current_password, &input.new_password) {
        if *current != user.password {
            return Err(AppError::bad_request("Current password is incorrect"));
        }
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::bad_request("Passwort muss mindestens 6 Zeichen lang sein"));
        }
        user.password = new.clone();
    }
    if let Some(first_name) = input.first_name {
        user.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = input.last_name {
        user.last_name = last_name.trim().to_string();
    }

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "user": user.summary(),
    })))
}

// --- dashboard ---

async fn dashboard_overview(State(db): State<Db>, jar: CookieJar) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let user_id = session_user(&store, &jar)?;
    let user = store.user(user_id).ok_or_else(AppError::unauthorized)?;

    let permissions = store.permissions.get(&user_id).cloned().unwrap_or_default();
    let active = permissions.iter().filter(|p| p["enabled"] == json!(true)).count();
    let completed = store
        .responses
        .iter()
        .filter(|r| r.user_id == user_id && r.is_completed)
        .count();
    let recent: Vec<_> = store
        .activities
        .get(&user_id)
        .map(|a| a.iter().take(5).cloned().collect())
        .unwrap_or_default();

    Ok(Json(json!({
        "success": true,
        "dashboard": {
            "user": {
                "id": user.id,
                "email": user.email,
                "firstName": user.first_name,
                "lastName": user.last_name,
                "joinDate": user.created_at,
            },
            "stats": {
                "totalEarnings": store.total_earned(user_id),
                "availableBalance": store.balance(user_id),
                "activeDataTypes": active,
                "completedSurveys": completed,
            },
            "permissions": permissions,
            "recentActivities": recent,
        }
    })))
}

async fn quick_action(
    State(db): State<Db>,
    jar: CookieJar,
    Json(input): Json<Value>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let user_id = session_user(&store, &jar)?;

    match input["action"].as_str() {
        Some("generate_test_earnings") => {
            let amount = 25.50;
            store.add_earning(user_id, "Test-Verdienst", amount);
            store.add_activity(user_id, "earning", "Test-Verdienst", "Demo-Modus", amount);
            Ok(Json(json!({
                "success": true,
                "message": format!("€{amount:.2} Test-Verdienst generiert! (Demo-Modus)"),
                "amount": amount,
            })))
        }
        Some("toggle_data_type") => {
            let enabled = input["enabled"].as_bool().unwrap_or(false);
            Ok(Json(json!({
                "success": true,
                "message": format!("Datentyp {} (Demo-Modus)", if enabled { "aktiviert" } else { "deaktiviert" }),
                "dataType": { "id": input["dataTypeId"], "enabled": enabled, "monthlyValue": 12.00 },
            })))
        }
        Some("request_payout") => {
            let amount = input["amount"].as_f64().unwrap_or(0.0);
            if amount < 10.0 {
                return Err(AppError::bad_request("Mindestbetrag €10.00"));
            }
            let method = input["method"].as_str().unwrap_or("paypal").to_string();
            Ok(Json(json!({
                "success": true,
                "message": format!("Auszahlung von €{amount} per {} beantragt (Demo-Modus)", method.to_uppercase()),
                "payout": { "id": 1, "amount": amount, "method": method, "status": "pending" },
            })))
        }
        _ => Err(AppError::bad_request("Unknown action")),
    }
}

// --- data ---

async fn data_types() -> Json<Value> {
    Json(json!({
        "data_types": DATA_TYPES,
        "total_types": DATA_TYPES.len(),
        "currency": "EUR",
    }))
}

async fn get_permissions(State(db): State<Db>, jar: CookieJar) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let user_id = session_user(&store, &jar)?;
    let permissions = store.permissions.get(&user_id).cloned().unwrap_or_default();
    Ok(Json(json!({ "permissions": permissions, "updated_at": now_iso() })))
}

async fn set_permissions(
    State(db): State<Db>,
    jar: CookieJar,
    Json(input): Json<Value>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let user_id = session_user(&store, &jar)?;
    let permissions = input["permissions"]
        .as_array()
        .cloned()
        .ok_or_else(|| AppError::bad_request("Permissions data required"))?;
    debug!(user_id, count = permissions.len(), "permissions replaced");
    store.permissions.insert(user_id, permissions);
    Ok(Json(json!({
        "success": true,
        "message": "Data permissions updated successfully",
        "updated_at": now_iso(),
    })))
}

// --- earnings ---

async fn earnings(State(db): State<Db>, jar: CookieJar) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let user_id = session_user(&store, &jar)?;
    let history: Vec<Value> = store
        .earnings
        .get(&user_id)
        .map(|e| {
            e.iter()
                .rev()
                .map(|e| {
                    json!({
                        "id": e.id,
                        "survey_title": e.title,
                        "amount": e.amount,
                        "completed_at": e.completed_at,
                        "status": "earned",
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    let total = store.total_earned(user_id);
    Ok(Json(json!({
        "total_earnings": total,
        "monthly_earnings": total,
        "pending_payout": store.balance(user_id),
        "earnings_history": history,
        "currency": "EUR",
    })))
}

#[derive(Deserialize)]
pub struct PayoutRequest {
    pub amount: Option<f64>,
    pub method: Option<String>,
}

async fn request_payout(
    State(db): State<Db>,
    jar: CookieJar,
    Json(input): Json<PayoutRequest>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let user_id = session_user(&store, &jar)?;
    let (Some(amount), Some(method)) = (input.amount.filter(|a| *a > 0.0), input.method) else {
        return Err(AppError::bad_request("Amount and method are required"));
    };
    if amount > store.balance(user_id) {
        return Err(AppError::bad_request("Insufficient balance"));
    }

    let payout = Payout {
        id: format!("PO_{}", store.next_id()),
        amount,
        method: method.clone(),
        status: "pending".to_string(),
        requested_at: now_iso(),
    };
    let payout_id = payout.id.clone();
    store.payouts.entry(user_id).or_default().push(payout);
    info!(user_id, amount, "payout requested");

    Ok(Json(json!({
        "success": true,
        "message": "Payout request submitted successfully",
        "payout_id": payout_id,
        "amount": amount,
        "method": method,
        "estimated_processing_time": "3-5 business days",
    })))
}

async fn payouts(State(db): State<Db>, jar: CookieJar) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let user_id = session_user(&store, &jar)?;
    let payouts = store.payouts.get(&user_id).cloned().unwrap_or_default();
    Ok(Json(json!({
        "payouts": payouts,
        "total_paid": store.total_paid(user_id),
        "pending_amount": store.balance(user_id),
        "next_payout_date": null,
        "payout_methods": ["PayPal", "Bank Transfer", "Cryptocurrency"],
    })))
}

async fn generate_monthly_earnings(State(db): State<Db>, jar: CookieJar) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let user_id = session_user(&store, &jar)?;
    let amount = 50.0;
    store.add_earning(user_id, "Monatliche Datenfreigabe", amount);
    Ok(Json(json!({ "success": true, "amount": amount })))
}

// --- surveys ---

async fn available_surveys(State(db): State<Db>, jar: CookieJar) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let user_id = session_user(&store, &jar)?;
    let surveys: Vec<_> = store
        .surveys
        .iter()
        .filter(|s| !store.responses.iter().any(|r| r.user_id == user_id && r.survey_id == s.id))
        .cloned()
        .collect();
    let potential: f64 = surveys.iter().map(|s| s.reward_amount).sum();
    Ok(Json(json!({
        "success": true,
        "surveys": surveys,
        "total_potential_earnings": potential,
    })))
}

async fn survey_details(State(db): State<Db>, jar: CookieJar, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    session_user(&store, &jar)?;
    let survey = store
        .survey(id)
        .ok_or_else(|| AppError::new(StatusCode::NOT_FOUND, "Survey not found"))?;
    Ok(Json(json!({ "success": true, "survey": survey })))
}

async fn start_survey(State(db): State<Db>, jar: CookieJar, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let user_id = session_user(&store, &jar)?;
    if store.survey(id).is_none() {
        return Err(AppError::new(StatusCode::NOT_FOUND, "Survey not found"));
    }

    if let Some(existing) = store.response_for(user_id, id) {
        if existing.is_completed {
            return Err(AppError::bad_request("Survey already completed"));
        }
        return Ok(Json(json!({ "responseId": existing.id, "message": "Continuing existing survey" })));
    }

    let response = store::SurveyResponse {
        id: store.next_id(),
        survey_id: id,
        user_id,
        is_completed: false,
        started_at: now_iso(),
        completed_at: None,
        responses: Value::Null,
    };
    let response_id = response.id;
    store.responses.push(response);
    Ok(Json(json!({ "responseId": response_id, "message": "Survey started successfully" })))
}

#[derive(Deserialize)]
pub struct SurveySubmission {
    #[serde(default)]
    pub responses: Value,
}

async fn submit_survey(
    State(db): State<Db>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Json(input): Json<SurveySubmission>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let user_id = session_user(&store, &jar)?;
    let survey = store
        .survey(id)
        .cloned()
        .ok_or_else(|| AppError::new(StatusCode::NOT_FOUND, "Survey not found"))?;

    if store.response_for(user_id, id).is_none() {
        let response = store::SurveyResponse {
            id: store.next_id(),
            survey_id: id,
            user_id,
            is_completed: false,
            started_at: now_iso(),
            completed_at: None,
            responses: Value::Null,
        };
        store.responses.push(response);
    }
    let response = store
        .response_for(user_id, id)
        .ok_or_else(|| AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "Response missing"))?;
    if response.is_completed {
        return Err(AppError::bad_request("Survey already completed"));
    }
    response.is_completed = true;
    response.completed_at = Some(now_iso());
    response.responses = input.responses;

    store.add_earning(user_id, &survey.title, survey.reward_amount);
    store.add_activity(
        user_id,
        "survey_completed",
        "Umfrage abgeschlossen",
        &format!("Du hast die Umfrage \"{}\" erfolgreich abgeschlossen.", survey.title),
        survey.reward_amount,
    );

    Ok(Json(json!({
        "success": true,
        "reward": survey.reward_amount,
        "message": "Survey completed successfully",
    })))
}

async fn my_responses(State(db): State<Db>, jar: CookieJar) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let user_id = session_user(&store, &jar)?;
    let responses: Vec<_> = store.responses.iter().filter(|r| r.user_id == user_id).cloned().collect();
    Ok(Json(json!({ "responses": responses })))
}

// --- activities ---

async fn activities(State(db): State<Db>, jar: CookieJar) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let user_id = session_user(&store, &jar)?;
    let activities = store.activities.get(&user_id).cloned().unwrap_or_default();
    Ok(Json(json!({
        "success": true,
        "total": activities.len(),
        "activities": activities,
    })))
}
