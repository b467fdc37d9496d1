//! HTTP API layer for the survey engine.

pub mod response;
pub mod routes;
pub mod source;
pub mod state;

pub use routes::router;
pub use state::AppState;
