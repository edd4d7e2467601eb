use axum::{extract::FromRequestParts, http::request::Parts};

use super::authorization_header;
use crate::prelude::*;

/// The user a request was made on behalf of. Extracting this rejects any
/// request that doesn't carry a live access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
	/// The username the access token was issued to
	pub username: String,
	/// The scopes granted to the access token
	pub scope: Vec<String>,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
	type Rejection = ErrorType;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		let (scheme, token) = authorization_header(parts).ok_or(ErrorType::Unauthenticated)?;
		let token = token.trim();

		if scheme != constants::BEARER_TOKEN_TYPE || token.is_empty() {
			return Err(ErrorType::InvalidAuthorizationHeader);
		}

		let grant =
			service::verify_access_token(&state.tokens, &state.config.jwt_secret, token).await?;

		trace!("Request authenticated as `{}`", grant.username);
		Ok(Self {
			username: grant.username,
			scope: grant.scope,
		})
	}
}
