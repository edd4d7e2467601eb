use axum::{extract::FromRequestParts, http::request::Parts};
use base64::{engine::general_purpose::STANDARD, Engine};

use super::authorization_header;
use crate::prelude::*;

/// The raw credentials of an `Authorization: Basic` header. Only the scheme is
/// checked when extracting, so that handlers can validate the rest of the
/// request before looking at the credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuthorization(pub String);

/// A username and password read from a [`BasicAuthorization`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
	pub username: String,
	pub password: String,
}

impl BasicAuthorization {
	/// Decodes `base64(username:password)`. The username ends at the first
	/// colon, so passwords may contain colons. Both parts must be non-empty.
	pub fn credentials(&self) -> Result<BasicCredentials, ErrorType> {
		let decoded = STANDARD
			.decode(self.0.trim())
			.ok()
			.and_then(|bytes| String::from_utf8(bytes).ok())
			.ok_or(ErrorType::InvalidAuthorizationHeader)?;

		match decoded.split_once(':') {
			Some((username, password)) if !username.is_empty() && !password.is_empty() => {
				Ok(BasicCredentials {
					username: username.to_string(),
					password: password.to_string(),
				})
			}
			_ => Err(ErrorType::InvalidAuthorizationHeader),
		}
	}
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for BasicAuthorization
where
	S: Send + Sync,
{
	type Rejection = ErrorType;

	async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
		match authorization_header(parts) {
			Some(("Basic", token)) if !token.trim().is_empty() => Ok(Self(token.to_string())),
			_ => Err(ErrorType::InvalidAuthorizationHeader),
		}
	}
}
