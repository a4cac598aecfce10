//! Attendance tracking client: typed backend access, a query cache with
//! optimistic updates, the role-based route guard, and the terminal front end.

pub mod auth;
pub mod cli;
pub mod error;
pub mod http;
pub mod query;
pub mod response;
pub mod services;
pub mod state;
pub mod views;

pub use error::ApiError;
pub use http::ApiClient;
pub use response::ApiResponse;
pub use state::AppState;
