//! SQLite record store for the survey engine.

pub mod client;
pub mod config;
pub mod health;
pub mod insert;
pub mod query;
pub mod schema;

pub use client::*;
pub use config::*;
pub use insert::insert_response;
pub use query::{count_responses, list_responses};
