//! Request handlers for API endpoints
//!
//! Handlers extract and validate the request, call the matching service and map
//! the result to a response. Errors convert through `crate::Error`.

pub mod doctors;
pub mod patients;
pub mod system;

pub use doctors::*;
pub use patients::*;
pub use system::*;
