pub mod config;
pub mod logger;
pub mod validation;

pub use validation::format_validation_errors;
