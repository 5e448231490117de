//! Clinic records server
//!
//! REST API over doctors and patients. Rooms, specializations and districts are
//! addressed by natural key and created on first use. Listings are paginated and
//! optionally ordered by a named field.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod request_context;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
