/// The request and response bodies of the `/authorize` routes
pub mod auth;
/// The error type returned by every fallible route
mod error;
/// The request and response bodies of the `/api/shopping-list` routes
pub mod shopping_list;
/// The claims stored inside every JWT issued by the API
pub mod token_data;
/// The request and response bodies of the `/api/users` routes
pub mod user;

pub use self::error::*;
