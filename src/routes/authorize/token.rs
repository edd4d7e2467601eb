use axum::{
	body::Bytes,
	extract::State,
	http::{header::CACHE_CONTROL, HeaderMap},
	response::IntoResponse,
	Json,
};

use super::parse_parameters;
use crate::{
	models::auth::{GrantType, TokenRequest},
	prelude::*,
	service::Grant,
};

/// Redeems an authorization code or a refresh token for a new token pair. The
/// scope of the new pair can be narrowed, never widened.
#[instrument(skip_all)]
pub async fn token(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<impl IntoResponse, ErrorType> {
	let TokenRequest {
		grant_type,
		code,
		refresh_token,
		scope,
		code_verifier,
	} = parse_parameters(&headers, &body);

	let grant_type = GrantType::parse(grant_type.as_deref()).ok_or(ErrorType::InvalidGrantType)?;
	let secret = state.config.jwt_secret.as_str();

	let granted = match grant_type {
		GrantType::AuthorizationCode => {
			service::redeem_authorization_code(
				&state.tokens,
				secret,
				code.as_deref().unwrap_or_default(),
				code_verifier.as_deref(),
			)
			.await?
		}
		GrantType::RefreshToken => {
			service::redeem_refresh_token(
				&state.tokens,
				secret,
				refresh_token.as_deref().unwrap_or_default(),
			)
			.await?
		}
	};

	let grant = Grant {
		scope: service::narrow_scope(&granted.scope, scope.as_deref())?,
		username: granted.username,
	};
	let tokens = service::issue_tokens(&state.tokens, secret, &grant).await?;

	Ok(([(CACHE_CONTROL, "no-store")], Json(tokens)))
}
