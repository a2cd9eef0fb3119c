pub mod adapters;
pub mod application;
pub mod domain;
pub mod infra;

// In-memory fakes for use case and HTTP tests.
#[cfg(test)]
pub mod test_utils;

// Re-exports for shorter use statements.
pub use application::*;
pub use domain::*;
