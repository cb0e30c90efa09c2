//! Endpoint methods of the DataFair backend.
//!
//! Each submodule adds an `impl` block to `ApiClient` for one resource group.
//! The methods only fix the path, the verb and the body shape; decoding and
//! error handling are the facade's. Envelope fields are extracted by name, so
//! a response without the expected field fails with `ApiError::MissingField`.

mod activities;
mod auth;
mod dashboard;
mod data;
mod earnings;
mod surveys;
