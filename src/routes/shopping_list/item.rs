use axum::{
	body::Bytes,
	extract::{Path, State},
	Json,
};

use super::{get_request_user, parse_body, parse_id, validate_name};
use crate::{
	models::shopping_list::{CreateItemRequest, DeletedResponse, ShoppingListItem, UpdateItemRequest},
	prelude::*,
	utils::extractors::AuthenticatedUser,
};

/// Lists the items of every list the user can see
#[instrument(skip(state))]
pub async fn list_all_items(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
) -> Result<Json<Vec<ShoppingListItem>>, ErrorType> {
	let mut connection = state.database.acquire().await?;
	let user = get_request_user(&mut connection, &auth).await?;

	let items = db::get_visible_items(&mut connection, user.id).await?;

	Ok(Json(items))
}

/// Adds an item to the list named in the body
#[instrument(skip(state, body))]
pub async fn create_item(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	body: Bytes,
) -> Result<Json<ShoppingListItem>, ErrorType> {
	let request: CreateItemRequest = parse_body(&body)?;
	let list_id = request.list_id.ok_or(ErrorType::WrongParameters)?;

	add_item(&state, &auth, list_id, request).await
}

/// Shows a single item
#[instrument(skip(state))]
pub async fn get_item(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	Path(item_id): Path<String>,
) -> Result<Json<ShoppingListItem>, ErrorType> {
	find_item(&state, &auth, None, parse_id(&item_id)?).await
}

/// Changes the fields of an item that are present in the body
#[instrument(skip(state, body))]
pub async fn update_item(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	Path(item_id): Path<String>,
	body: Bytes,
) -> Result<Json<ShoppingListItem>, ErrorType> {
	change_item(&state, &auth, None, parse_id(&item_id)?, &body).await
}

/// Removes an item from its list
#[instrument(skip(state))]
pub async fn delete_item(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	Path(item_id): Path<String>,
) -> Result<Json<DeletedResponse>, ErrorType> {
	remove_item(&state, &auth, None, parse_id(&item_id)?).await
}

/// Lists the items of a list
#[instrument(skip(state))]
pub async fn list_items_of_shopping_list(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	Path(list_id): Path<String>,
) -> Result<Json<Vec<ShoppingListItem>>, ErrorType> {
	let list_id = parse_id(&list_id)?;

	let mut connection = state.database.acquire().await?;
	let user = get_request_user(&mut connection, &auth).await?;

	service::get_shopping_list_for_user(&mut connection, list_id, user.id).await?;
	let items = db::get_items_for_shopping_list(&mut connection, list_id).await?;

	Ok(Json(items))
}

/// Adds an item to the list in the path
#[instrument(skip(state, body))]
pub async fn create_item_in_shopping_list(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	Path(list_id): Path<String>,
	body: Bytes,
) -> Result<Json<ShoppingListItem>, ErrorType> {
	let list_id = parse_id(&list_id)?;
	let request: CreateItemRequest = parse_body(&body)?;

	add_item(&state, &auth, list_id, request).await
}

/// Shows an item of the list in the path
#[instrument(skip(state))]
pub async fn get_item_of_shopping_list(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	Path((list_id, item_id)): Path<(String, String)>,
) -> Result<Json<ShoppingListItem>, ErrorType> {
	find_item(&state, &auth, Some(parse_id(&list_id)?), parse_id(&item_id)?).await
}

/// Changes an item of the list in the path
#[instrument(skip(state, body))]
pub async fn update_item_of_shopping_list(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	Path((list_id, item_id)): Path<(String, String)>,
	body: Bytes,
) -> Result<Json<ShoppingListItem>, ErrorType> {
	change_item(
		&state,
		&auth,
		Some(parse_id(&list_id)?),
		parse_id(&item_id)?,
		&body,
	)
	.await
}

/// Removes an item from the list in the path
#[instrument(skip(state))]
pub async fn delete_item_of_shopping_list(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	Path((list_id, item_id)): Path<(String, String)>,
) -> Result<Json<DeletedResponse>, ErrorType> {
	remove_item(&state, &auth, Some(parse_id(&list_id)?), parse_id(&item_id)?).await
}

/// Stores a new item in a list the user can edit
async fn add_item(
	state: &AppState,
	auth: &AuthenticatedUser,
	list_id: Uuid,
	request: CreateItemRequest,
) -> Result<Json<ShoppingListItem>, ErrorType> {
	let name = validate_name(&request.name)?;
	if request.quantity < 0 {
		return Err(ErrorType::WrongParameters);
	}

	let mut transaction = state.database.begin().await?;
	let user = get_request_user(&mut transaction, auth).await?;

	service::get_editable_shopping_list(&mut transaction, list_id, user.id).await?;
	let item = db::create_shopping_list_item(
		&mut transaction,
		list_id,
		name,
		request.quantity,
		request.checked,
	)
	.await?;

	transaction.commit().await?;
	trace!("Item `{}` added to `{}`", item.id, list_id);

	Ok(Json(item))
}

/// Finds an item the user can see. When a list ID is given, the item must
/// belong to that list.
async fn find_item(
	state: &AppState,
	auth: &AuthenticatedUser,
	list_id: Option<Uuid>,
	item_id: Uuid,
) -> Result<Json<ShoppingListItem>, ErrorType> {
	let mut connection = state.database.acquire().await?;
	let user = get_request_user(&mut connection, auth).await?;

	let (item, _) =
		service::get_shopping_list_item_for_user(&mut connection, item_id, user.id).await?;
	if list_id.is_some_and(|list_id| list_id != item.list_id) {
		return Err(ErrorType::ResourceDoesNotExist);
	}

	Ok(Json(item))
}

/// Applies a partial update to an item in a list the user can edit
async fn change_item(
	state: &AppState,
	auth: &AuthenticatedUser,
	list_id: Option<Uuid>,
	item_id: Uuid,
	body: &Bytes,
) -> Result<Json<ShoppingListItem>, ErrorType> {
	let UpdateItemRequest {
		name,
		quantity,
		checked,
	} = parse_body(body)?;
	let name = name.as_deref().map(validate_name).transpose()?;
	if quantity.is_some_and(|quantity| quantity < 0) {
		return Err(ErrorType::WrongParameters);
	}

	let mut transaction = state.database.begin().await?;
	let user = get_request_user(&mut transaction, auth).await?;

	let (item, list) =
		service::get_shopping_list_item_for_user(&mut transaction, item_id, user.id).await?;
	if list_id.is_some_and(|list_id| list_id != item.list_id) {
		return Err(ErrorType::ResourceDoesNotExist);
	}
	if !list.access.can_edit_items() {
		return Err(ErrorType::Unauthorized);
	}

	let item = db::update_shopping_list_item(&mut transaction, item_id, name, quantity, checked)
		.await?
		.ok_or(ErrorType::ResourceDoesNotExist)?;

	transaction.commit().await?;

	Ok(Json(item))
}

/// Deletes an item from a list the user can edit
async fn remove_item(
	state: &AppState,
	auth: &AuthenticatedUser,
	list_id: Option<Uuid>,
	item_id: Uuid,
) -> Result<Json<DeletedResponse>, ErrorType> {
	let mut transaction = state.database.begin().await?;
	let user = get_request_user(&mut transaction, auth).await?;

	let (item, list) =
		service::get_shopping_list_item_for_user(&mut transaction, item_id, user.id).await?;
	if list_id.is_some_and(|list_id| list_id != item.list_id) {
		return Err(ErrorType::ResourceDoesNotExist);
	}
	if !list.access.can_edit_items() {
		return Err(ErrorType::Unauthorized);
	}

	let deleted = db::delete_shopping_list_item(&mut transaction, item_id).await?;
	transaction.commit().await?;

	Ok(Json(DeletedResponse { deleted }))
}
