//! Client library for the DataFair backend.
//!
//! # Overview
//! `ApiClient` wraps every call to the backend's REST API: it builds the
//! request against a fixed base URL, sends it with the session cookie, decodes
//! JSON or text bodies, and turns error statuses into a normalized `ApiError`.
//! Endpoint methods (login, profile, data permissions, earnings, payouts,
//! surveys, activities) are thin layers over `request`.
//!
//! # Design
//! - `ApiClient` is stateless apart from its configuration; the session lives
//!   in the transport's cookie store.
//! - Building and parsing are pure (`build_request` / `parse_response`); only
//!   the `Transport` does I/O, so the error policy is testable offline.
//! - Calls block the calling thread. The client is `Send + Sync` and can be
//!   shared between threads; ordering between concurrent calls is up to the
//!   caller.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

mod api;
pub mod body;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod notify;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use body::ResponseBody;
pub use client::{ApiClient, RequestOptions};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use notify::{LogNotifier, Notification, Notifier, Severity};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Activity, AuthStatus, DataPermission, DataType, Earnings, EarningEntry, ProfileUpdate, QuickAction,
    Registration, User,
};
