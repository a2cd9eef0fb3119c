//! Test utilities shared by use case and HTTP tests.
//!
//! - Factories for users, stores and ratings with sensible defaults
//! - `InMemoryPersistence`, one fake backing every repository trait
//! - `TestAppStateBuilder` for driving the router with `axum-test`

mod app_state_builder;
mod factories;
mod in_memory;

pub use app_state_builder::*;
pub use factories::*;
pub use in_memory::*;
