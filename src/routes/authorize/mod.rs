use axum::{
	http::{header::CONTENT_TYPE, HeaderMap},
	routing::{get, post},
	Router,
};
use serde::de::DeserializeOwned;
use tower_http::services::ServeDir;

use crate::prelude::*;

/// `GET /authorize` and `POST /authorize`
mod authorization;
/// `POST /authorize/introspect` and `POST /authorize/revoke`
mod token_hint;
/// `POST /authorize/token`
mod token;

use self::{authorization::*, token::*, token_hint::*};

/// Sets up the authorization server routes. Any other path under `/authorize`
/// is looked up in the sign in client's directory.
#[instrument(skip(state))]
pub fn setup_routes(state: &AppState) -> Router {
	Router::new()
		.route("/", get(authorize_page).post(authorize))
		.route("/token", post(token))
		.route("/revoke", post(revoke))
		.route("/introspect", post(introspect))
		.fallback_service(ServeDir::new(&state.config.static_files.auth_client))
		.with_state(state.clone())
}

/// Reads the parameters of an authorization server request. Clients send
/// `application/x-www-form-urlencoded` bodies, but JSON is accepted as well. A
/// body that can't be read is treated as one without any parameters, so that
/// the handler reports the first parameter it is missing.
fn parse_parameters<T>(headers: &HeaderMap, body: &[u8]) -> T
where
	T: DeserializeOwned + Default,
{
	let is_json = headers
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value.starts_with("application/json"));

	let parsed = if is_json {
		serde_json::from_slice(body).map_err(|err| err.to_string())
	} else {
		serde_urlencoded::from_bytes(body).map_err(|err| err.to_string())
	};

	parsed.unwrap_or_else(|err| {
		debug!("Unable to parse request parameters: {}", err);
		T::default()
	})
}
