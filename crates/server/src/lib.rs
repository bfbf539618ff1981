//! HTTP surface of the fleet operations API.

pub mod errors;
pub mod extract;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::{build_app, build_state, run, serve, shutdown_signal};
pub use state::AppState;
