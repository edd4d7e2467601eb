use crate::{
	models::shopping_list::{ShoppingListItem, ShoppingListWithAccess},
	prelude::*,
};

/// Finds a list the user can see. Lists that don't exist and lists the user
/// has no access to are both reported as missing.
#[instrument(skip(connection))]
pub async fn get_shopping_list_for_user(
	connection: &mut DatabaseConnection,
	list_id: Uuid,
	user_id: Uuid,
) -> Result<ShoppingListWithAccess, ErrorType> {
	db::get_shopping_list_with_access(connection, list_id, user_id)
		.await?
		.ok_or(ErrorType::ResourceDoesNotExist)
}

/// Finds an item, along with the list it belongs to, as long as the user can
/// see that list.
#[instrument(skip(connection))]
pub async fn get_shopping_list_item_for_user(
	connection: &mut DatabaseConnection,
	item_id: Uuid,
	user_id: Uuid,
) -> Result<(ShoppingListItem, ShoppingListWithAccess), ErrorType> {
	let item = db::get_shopping_list_item_by_id(&mut *connection, item_id)
		.await?
		.ok_or(ErrorType::ResourceDoesNotExist)?;
	let list = get_shopping_list_for_user(connection, item.list_id, user_id).await?;

	Ok((item, list))
}

/// Finds a list the user is allowed to change the items of
#[instrument(skip(connection))]
pub async fn get_editable_shopping_list(
	connection: &mut DatabaseConnection,
	list_id: Uuid,
	user_id: Uuid,
) -> Result<ShoppingListWithAccess, ErrorType> {
	let list = get_shopping_list_for_user(connection, list_id, user_id).await?;
	if !list.access.can_edit_items() {
		return Err(ErrorType::Unauthorized);
	}
	Ok(list)
}

/// Finds a list the user owns
#[instrument(skip(connection))]
pub async fn get_owned_shopping_list(
	connection: &mut DatabaseConnection,
	list_id: Uuid,
	user_id: Uuid,
) -> Result<ShoppingListWithAccess, ErrorType> {
	let list = get_shopping_list_for_user(connection, list_id, user_id).await?;
	if !list.access.can_manage() {
		return Err(ErrorType::Unauthorized);
	}
	Ok(list)
}
