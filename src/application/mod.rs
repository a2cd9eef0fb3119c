pub mod app_error;
pub mod password;
pub mod route_policy;
pub mod token;
pub mod use_cases;
pub mod validators;
