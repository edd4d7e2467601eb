use axum::{
	body::Bytes,
	extract::{Query, Request, State},
	http::HeaderMap,
	response::{IntoResponse, Response},
	Json,
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::parse_parameters;
use crate::{
	models::{
		auth::{AuthorizePageQuery, AuthorizeRequest, ResponseType},
		token_data::CodeChallengeMethod,
	},
	prelude::*,
	service::{CodeChallenge, Grant},
	utils::extractors::BasicAuthorization,
};

/// Shows the sign in client, once the request is known to be one the client
/// can complete.
#[instrument(skip(state, request))]
pub async fn authorize_page(
	State(state): State<AppState>,
	Query(query): Query<AuthorizePageQuery>,
	request: Request,
) -> Result<Response, ErrorType> {
	ResponseType::parse(query.response_type.as_deref()).ok_or(ErrorType::InvalidResponseType)?;

	let index = format!("{}/index.html", state.config.static_files.auth_client);
	let response = ServeFile::new(index).oneshot(request).await?;

	Ok(response.into_response())
}

/// Signs a user in with their username and password, and hands out either an
/// authorization code or a token pair.
#[instrument(skip_all)]
pub async fn authorize(
	State(state): State<AppState>,
	authorization: BasicAuthorization,
	headers: HeaderMap,
	body: Bytes,
) -> Result<Response, ErrorType> {
	let AuthorizeRequest {
		response_type,
		scope,
		code_challenge,
		code_challenge_method,
	} = parse_parameters(&headers, &body);

	let response_type =
		ResponseType::parse(response_type.as_deref()).ok_or(ErrorType::InvalidResponseType)?;
	let code_challenge_method = CodeChallengeMethod::parse(code_challenge_method.as_deref())
		.ok_or(ErrorType::InvalidCodeChallengeMethod)?;
	let credentials = authorization.credentials()?;

	let mut connection = state.database.acquire().await?;
	let user = service::authenticate_user(
		&mut connection,
		&state.config,
		&credentials.username,
		&credentials.password,
	)
	.await?;
	drop(connection);

	let grant = Grant {
		username: user.username,
		scope: service::parse_scope(scope.as_deref())?,
	};

	info!("User `{}` signed in", grant.username);

	match response_type {
		ResponseType::Code => {
			let challenge = code_challenge.map(|challenge| CodeChallenge {
				challenge,
				method: code_challenge_method,
			});
			let code = service::issue_authorization_code(
				&state.tokens,
				&state.config.jwt_secret,
				&grant,
				challenge,
			)
			.await?;

			Ok(code.into_response())
		}
		ResponseType::Token => {
			let tokens =
				service::issue_tokens(&state.tokens, &state.config.jwt_secret, &grant).await?;

			Ok(Json(tokens).into_response())
		}
	}
}
