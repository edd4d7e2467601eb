use axum::{
	body::Bytes,
	extract::{Path, State},
	Json,
};

use super::{get_request_user, parse_body, parse_id, validate_name};
use crate::{
	models::shopping_list::{
		CreateShoppingListRequest,
		DeleteShoppingListsRequest,
		DeletedResponse,
		ListAccess,
		ShoppingListWithAccess,
		UpdateShoppingListRequest,
	},
	prelude::*,
	utils::extractors::AuthenticatedUser,
};

/// Lists every shopping list the user can see
#[instrument(skip(state))]
pub async fn list_shopping_lists(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
) -> Result<Json<Vec<ShoppingListWithAccess>>, ErrorType> {
	let mut connection = state.database.acquire().await?;
	let user = get_request_user(&mut connection, &auth).await?;

	let lists = db::get_visible_shopping_lists(&mut connection, user.id, None).await?;

	Ok(Json(lists))
}

/// Creates a list owned by the user
#[instrument(skip(state, body))]
pub async fn create_shopping_list(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	body: Bytes,
) -> Result<Json<ShoppingListWithAccess>, ErrorType> {
	let CreateShoppingListRequest { name, public } = parse_body(&body)?;
	let name = validate_name(&name)?;

	let mut connection = state.database.acquire().await?;
	let user = get_request_user(&mut connection, &auth).await?;

	let list = db::create_shopping_list(&mut connection, name, user.id, public).await?;
	info!("Shopping list `{}` created by `{}`", list.id, user.username);

	Ok(Json(ShoppingListWithAccess {
		list,
		access: ListAccess::Owner,
	}))
}

/// Deletes several lists at once. Either every list is deleted, or none is.
#[instrument(skip(state, body))]
pub async fn delete_shopping_lists(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	body: Bytes,
) -> Result<Json<DeletedResponse>, ErrorType> {
	let DeleteShoppingListsRequest { mut ids } = parse_body(&body)?;
	ids.sort();
	ids.dedup();

	let mut transaction = state.database.begin().await?;
	let user = get_request_user(&mut transaction, &auth).await?;

	let mut deleted = 0;
	for list_id in ids {
		service::get_owned_shopping_list(&mut transaction, list_id, user.id).await?;
		deleted += db::delete_shopping_list(&mut transaction, list_id).await?;
	}

	transaction.commit().await?;
	info!("{} shopping lists deleted by `{}`", deleted, user.username);

	Ok(Json(DeletedResponse { deleted }))
}

/// Shows a single list
#[instrument(skip(state))]
pub async fn get_shopping_list(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	Path(list_id): Path<String>,
) -> Result<Json<ShoppingListWithAccess>, ErrorType> {
	let list_id = parse_id(&list_id)?;

	let mut connection = state.database.acquire().await?;
	let user = get_request_user(&mut connection, &auth).await?;

	let list = service::get_shopping_list_for_user(&mut connection, list_id, user.id).await?;

	Ok(Json(list))
}

/// Renames a list, or changes whether it is public
#[instrument(skip(state, body))]
pub async fn update_shopping_list(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	Path(list_id): Path<String>,
	body: Bytes,
) -> Result<Json<ShoppingListWithAccess>, ErrorType> {
	let list_id = parse_id(&list_id)?;
	let UpdateShoppingListRequest { name, public } = parse_body(&body)?;
	let name = name.as_deref().map(validate_name).transpose()?;

	let mut transaction = state.database.begin().await?;
	let user = get_request_user(&mut transaction, &auth).await?;

	service::get_owned_shopping_list(&mut transaction, list_id, user.id).await?;
	let list = db::update_shopping_list(&mut transaction, list_id, name, public)
		.await?
		.ok_or(ErrorType::ResourceDoesNotExist)?;

	transaction.commit().await?;

	Ok(Json(ShoppingListWithAccess {
		list,
		access: ListAccess::Owner,
	}))
}

/// Deletes a list, along with its items and members
#[instrument(skip(state))]
pub async fn delete_shopping_list(
	State(state): State<AppState>,
	auth: AuthenticatedUser,
	Path(list_id): Path<String>,
) -> Result<Json<DeletedResponse>, ErrorType> {
	let list_id = parse_id(&list_id)?;

	let mut transaction = state.database.begin().await?;
	let user = get_request_user(&mut transaction, &auth).await?;

	service::get_owned_shopping_list(&mut transaction, list_id, user.id).await?;
	let deleted = db::delete_shopping_list(&mut transaction, list_id).await?;

	transaction.commit().await?;
	info!("Shopping list `{}` deleted by `{}`", list_id, user.username);

	Ok(Json(DeletedResponse { deleted }))
}
