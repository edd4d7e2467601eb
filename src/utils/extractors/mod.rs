mod basic;
mod bearer;

pub use self::{basic::*, bearer::*};

use axum::http::{header::AUTHORIZATION, request::Parts};

/// Splits the `Authorization` header into its scheme and credentials. Returns
/// `None` when the header is missing, and an empty scheme when it is not valid
/// UTF-8.
fn authorization_header(parts: &Parts) -> Option<(&str, &str)> {
	let value = parts.headers.get(AUTHORIZATION)?;
	let value = value.to_str().unwrap_or_default().trim();
	Some(value.split_once(' ').unwrap_or((value, "")))
}
