use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::prelude::*;

/// The OAuth2-style authorization server, and the sign in client
mod authorize;
/// The shopping lists, their items and their members
mod shopping_list;
/// The user registry
mod users;

/// Sets up every route of the API. The shopping list client is only mounted
/// when it is enabled in the config.
#[instrument(skip(state))]
pub fn setup_routes(state: &AppState) -> Router {
	let router = Router::new()
		.nest("/authorize", authorize::setup_routes(state))
		.nest("/api/users", users::setup_routes(state))
		.nest("/api/shopping-list", shopping_list::setup_routes(state));

	let router = if state.config.static_files.serve_shopping_list {
		debug!(
			"Serving the shopping list client from `{}`",
			state.config.static_files.shopping_list
		);
		router.nest_service(
			"/shopping-list",
			ServeDir::new(&state.config.static_files.shopping_list),
		)
	} else {
		router
	};

	router.layer(TraceLayer::new_for_http())
}
