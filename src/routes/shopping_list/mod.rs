use axum::{
	body::Bytes,
	routing::get,
	Router,
};
use serde::de::DeserializeOwned;

use crate::{models::user::User, prelude::*, utils::extractors::AuthenticatedUser};

/// Items, both nested under their list and on their own
mod item;
/// The lists themselves
mod list;
/// The editors and viewers of a list
mod member;

use self::{item::*, list::*, member::*};

/// Sets up the shopping list routes. Every route needs an access token.
#[instrument(skip(state))]
pub fn setup_routes(state: &AppState) -> Router {
	Router::new()
		.route(
			"/",
			get(list_shopping_lists)
				.post(create_shopping_list)
				.delete(delete_shopping_lists),
		)
		.route("/items", get(list_all_items).post(create_item))
		.route(
			"/items/:item_id",
			get(get_item).put(update_item).delete(delete_item),
		)
		.route(
			"/:list_id",
			get(get_shopping_list)
				.put(update_shopping_list)
				.delete(delete_shopping_list),
		)
		.route(
			"/:list_id/items",
			get(list_items_of_shopping_list).post(create_item_in_shopping_list),
		)
		.route(
			"/:list_id/items/:item_id",
			get(get_item_of_shopping_list)
				.put(update_item_of_shopping_list)
				.delete(delete_item_of_shopping_list),
		)
		.route("/:list_id/editors", get(list_editors).put(update_editors))
		.route("/:list_id/viewers", get(list_viewers).put(update_viewers))
		.with_state(state.clone())
}

/// Reads the ID in a path. IDs that aren't UUIDs can't exist.
fn parse_id(id: &str) -> Result<Uuid, ErrorType> {
	Uuid::parse_str(id).map_err(|_| ErrorType::ResourceDoesNotExist)
}

/// Reads a JSON request body
fn parse_body<T>(body: &Bytes) -> Result<T, ErrorType>
where
	T: DeserializeOwned,
{
	serde_json::from_slice(body).map_err(|err| {
		debug!("Unable to parse request body: {}", err);
		ErrorType::WrongParameters
	})
}

/// Checks the name of a list or an item, returning it trimmed
fn validate_name(name: &str) -> Result<&str, ErrorType> {
	let name = name.trim();
	if name.is_empty() {
		return Err(ErrorType::WrongParameters);
	}
	Ok(name)
}

/// Finds the user the access token of the request was issued to
async fn get_request_user(
	connection: &mut DatabaseConnection,
	auth: &AuthenticatedUser,
) -> Result<User, ErrorType> {
	service::get_token_user(connection, &auth.username).await
}
