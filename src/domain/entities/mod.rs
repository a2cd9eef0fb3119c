pub mod identity;
pub mod rating;
pub mod role;
pub mod store;
pub mod user;
