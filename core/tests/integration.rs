//! End-to-end tests against the live mock backend.
//!
//! # Design
//! Each test starts the mock server on a random port and drives it through
//! `ApiClient` over real HTTP with the ureq transport, so the session cookie
//! round-trip and the error policy are exercised exactly as in production.

use datafair_core::{ApiClient, ApiError, ClientConfig, ProfileUpdate, Registration, ResponseBody};
use serde_json::json;

/// Start a fresh mock server and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url).unwrap()
}

#[test]
fn unauthenticated_calls_fail_with_401() {
    let client = client(&start_server());

    assert!(!client.is_authenticated().unwrap());

    let err = client.get_profile().unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(err.status_code(), Some(401));

    let err = client.get_earnings().unwrap_err();
    assert_eq!(err.status_code(), Some(401));
}

#[test]
fn wrong_password_is_unauthorized() {
    let client = client(&start_server());
    let err = client.login(mock_server::DEMO_EMAIL, "wrong").unwrap_err();
    assert_eq!(err.to_string(), "Unauthorized – please login");
}

#[test]
fn plain_text_bodies_are_returned_raw() {
    let client = client(&start_server());
    let body = client.get("/health").unwrap();
    assert_eq!(body, ResponseBody::Text("ok".to_string()));
}

#[test]
fn unknown_route_is_not_found() {
    let client = client(&start_server());
    let err = client.get("/api/does-not-exist").unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[test]
fn registration_errors_carry_server_messages() {
    let client = client(&start_server());

    let registration = Registration {
        email: "kurz@datafair.test".to_string(),
        password: "123".to_string(),
        first_name: "Kurt".to_string(),
        last_name: "Kurz".to_string(),
    };
    let err = client.register(&registration).unwrap_err();
    assert_eq!(err.to_string(), "Passwort muss mindestens 6 Zeichen lang sein");
    assert_eq!(err.status_code(), Some(400));

    // axum rejects a mistyped body with a plain-text 422.
    let err = client.post("/auth/register", &json!({"email": 5})).unwrap_err();
    assert_eq!(err.status_code(), Some(422));
    assert!(matches!(err, ApiError::Application { ref message, .. } if !message.is_empty()));

    let registration = Registration {
        password: "secret1".to_string(),
        ..registration
    };
    let created = client.register(&registration).unwrap();
    assert_eq!(created["user"]["email"], "kurz@datafair.test");

    let err = client.register(&registration).unwrap_err();
    assert_eq!(err.to_string(), "User with this email already exists");
    assert_eq!(err.status_code(), Some(409));
}

#[test]
fn session_lifecycle() {
    let client = client(&start_server());

    // Step 1: login keeps the session cookie.
    let data = client.login(mock_server::DEMO_EMAIL, mock_server::DEMO_PASSWORD).unwrap();
    assert_eq!(data["success"], true);
    assert_eq!(data["user"]["email"], mock_server::DEMO_EMAIL);
    assert!(client.is_authenticated().unwrap());

    // Step 2: profile is unwrapped from its envelope.
    let user = client.get_profile().unwrap();
    assert_eq!(user.email, mock_server::DEMO_EMAIL);
    client
        .update_profile(&ProfileUpdate {
            first_name: Some("Dana".to_string()),
            ..ProfileUpdate::default()
        })
        .unwrap();
    assert_eq!(client.get_profile().unwrap().first_name, "Dana");

    // Step 3: data types and a permission read-modify-write.
    let types = client.get_data_types().unwrap();
    assert_eq!(types.len(), 5);
    let before = client.get_data_permissions().unwrap();
    let location = before.iter().find(|p| p.data_type == "location_data").unwrap();
    assert!(!location.enabled);
    client.update_data_permission("location_data", true).unwrap();
    let after = client.get_data_permissions().unwrap();
    assert!(after.iter().find(|p| p.data_type == "location_data").unwrap().enabled);
    assert_eq!(after.len(), before.len());

    // Step 4: complete a survey.
    let surveys = client.get_surveys().unwrap();
    assert_eq!(surveys["surveys"].as_array().unwrap().len(), 2);
    let details = client.get_survey_details(1).unwrap();
    assert_eq!(details["survey"]["id"], 1);
    let started = client.start_survey(1).unwrap();
    assert!(started["responseId"].is_i64());
    let submitted = client.submit_survey(1, &json!({"1": "Smartphone"})).unwrap();
    assert_eq!(submitted["reward"], 12.0);
    assert_eq!(client.get_my_survey_responses().unwrap().len(), 1);

    let err = client.start_survey(1).unwrap_err();
    assert_eq!(err.to_string(), "Survey already completed");
    let err = client.get_survey_details(99).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 5: earnings, activities, payouts.
    let earnings = client.get_earnings().unwrap();
    assert_eq!(earnings.total_earnings, 12.0);
    assert_eq!(earnings.earnings_history.len(), 1);

    let activities = client.get_activities().unwrap();
    assert_eq!(activities[0].kind, "survey_completed");

    let err = client.request_payout(500.0, "paypal").unwrap_err();
    assert_eq!(err.to_string(), "Insufficient balance");
    let receipt = client.request_payout(10.0, "paypal").unwrap();
    assert_eq!(receipt["success"], true);
    assert_eq!(client.get_payouts().unwrap().len(), 1);

    // Step 6: dashboard quick actions.
    client.generate_test_earnings().unwrap();
    client.generate_monthly_earnings().unwrap();
    let dashboard = client.get_dashboard_overview().unwrap();
    assert_eq!(dashboard["stats"]["totalEarnings"], 12.0 + 25.5 + 50.0);
    let toggled = client.quick_toggle_data_type(2, true).unwrap();
    assert_eq!(toggled["dataType"]["enabled"], true);
    let err = client.quick_payout_request(5.0, None).unwrap_err();
    assert_eq!(err.to_string(), "Mindestbetrag €10.00");

    // Step 7: logout ends the session.
    client.logout().unwrap();
    assert!(!client.is_authenticated().unwrap());
    assert!(client.get_profile().unwrap_err().is_unauthorized());
}

#[test]
fn sessions_are_per_client() {
    let base_url = start_server();
    let alice = client(&base_url);
    let bob = client(&base_url);

    alice.login(mock_server::DEMO_EMAIL, mock_server::DEMO_PASSWORD).unwrap();
    assert!(alice.is_authenticated().unwrap());
    assert!(!bob.is_authenticated().unwrap());
}

#[test]
fn connection_refused_is_a_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = ClientConfig::new(&format!("http://127.0.0.1:{port}"));
    let client = ApiClient::from_config(&config).unwrap();

    let err = client.check_auth().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status_code(), None);
}
