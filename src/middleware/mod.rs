mod auth;
mod client_ip;
mod error_handler;
mod rate_limit;

pub use auth::require_admin;
pub use client_ip::{UNKNOWN_CLIENT, client_identifier};
pub use error_handler::log_errors;
pub use rate_limit::{RateLimitGuard, rate_limit};
