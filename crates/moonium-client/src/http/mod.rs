/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod auth;
pub mod client;
pub mod error;
pub mod query;
pub mod resources;

pub use error::{MooniumError, Result};
pub use query::{CondOperator, CrudQuery};

pub use client::{ClientConfig, MooniumClient};
