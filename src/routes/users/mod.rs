use axum::{
	body::Bytes,
	extract::{Query, State},
	routing::{get, post},
	Json,
	Router,
};

use crate::{
	models::user::{CountUsersQuery, PublicUser, RegisterUserRequest},
	prelude::*,
};

/// Sets up the user registry routes. Neither needs an access token, since
/// they are used by the registration page.
#[instrument(skip(state))]
pub fn setup_routes(state: &AppState) -> Router {
	Router::new()
		.route("/count", get(count_users))
		.route("/register", post(register))
		.with_state(state.clone())
}

/// Counts the users matching the `id` and `username` filters, as plain text.
/// An `id` that isn't a UUID matches nobody.
#[instrument(skip(state))]
async fn count_users(
	State(state): State<AppState>,
	Query(query): Query<CountUsersQuery>,
) -> Result<String, ErrorType> {
	let id = match query.id.as_deref() {
		Some(id) => match Uuid::parse_str(id) {
			Ok(id) => Some(id),
			Err(_) => return Ok("0".to_string()),
		},
		None => None,
	};

	let mut connection = state.database.acquire().await?;
	let count = db::count_users(&mut connection, id, query.username.as_deref()).await?;

	Ok(count.to_string())
}

/// Registers a new user
#[instrument(skip_all)]
async fn register(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<PublicUser>, ErrorType> {
	let RegisterUserRequest {
		displayname,
		username,
		password,
	} = serde_json::from_slice(&body).map_err(|_| ErrorType::WrongParameters)?;

	let mut transaction = state.database.begin().await?;
	let user = service::register_user(
		&mut transaction,
		&state.config,
		&username,
		&displayname,
		&password,
	)
	.await?;
	transaction.commit().await?;

	Ok(Json(user))
}
