use axum::{
	body::Bytes,
	extract::State,
	http::{HeaderMap, StatusCode},
	Json,
};

use super::parse_parameters;
use crate::{
	models::auth::{IntrospectResponse, TokenHintRequest},
	prelude::*,
};

/// Revokes a token of any kind. Unknown tokens are not an error, so this
/// always succeeds.
#[instrument(skip_all)]
pub async fn revoke(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> StatusCode {
	let TokenHintRequest {
		token,
		token_type_hint,
	} = parse_parameters(&headers, &body);

	if let Some(token) = token {
		trace!("Revoking token with hint {:?}", token_type_hint);
		service::revoke_token(&state.tokens, &token).await;
	}

	StatusCode::OK
}

/// Tells a client whether a token is live, and what it grants
#[instrument(skip_all)]
pub async fn introspect(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Json<IntrospectResponse> {
	let TokenHintRequest { token, .. } = parse_parameters(&headers, &body);

	Json(match token {
		Some(token) => service::introspect(&state.tokens, &state.config.jwt_secret, &token).await,
		None => IntrospectResponse::Inactive { active: false },
	})
}
