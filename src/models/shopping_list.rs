use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shopping list, as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct ShoppingList {
	/// The unique ID of the list
	pub id: Uuid,
	/// The name of the list
	pub name: String,
	/// The ID of the user that created the list
	pub owner: Uuid,
	/// Whether every signed in user can read the list
	pub public: bool,
}

/// An item on a shopping list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct ShoppingListItem {
	/// The unique ID of the item
	pub id: Uuid,
	/// The list the item is on
	pub list_id: Uuid,
	/// What to buy
	pub name: String,
	/// How many to buy
	pub quantity: i64,
	/// Whether the item has been bought
	pub checked: bool,
}

/// How a user can access a shopping list. Ordered from the least to the most
/// capable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum ListAccess {
	/// The list is public, the user has no role on it
	Public,
	/// The user was added as a viewer of the list
	Viewer,
	/// The user was added as an editor of the list
	Editor,
	/// The user created the list
	Owner,
}

impl ListAccess {
	/// Whether items can be added, changed or removed
	pub fn can_edit_items(self) -> bool {
		self >= Self::Editor
	}

	/// Whether the list itself and its members can be changed
	pub fn can_manage(self) -> bool {
		self == Self::Owner
	}
}

/// The roles a user can be given on a list by its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMemberRole {
	/// Can read the list and change its items
	Editor,
	/// Can read the list
	Viewer,
}

/// A shopping list along with how the requesting user can access it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShoppingListWithAccess {
	/// The list itself
	#[serde(flatten)]
	pub list: ShoppingList,
	/// How the requesting user can access the list
	pub access: ListAccess,
}

/// The body of `POST /api/shopping-list`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShoppingListRequest {
	/// The name of the new list
	pub name: String,
	/// Whether every signed in user can read the list
	#[serde(default)]
	pub public: bool,
}

/// The body of `PUT /api/shopping-list/:list_id`. Missing fields are left
/// unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShoppingListRequest {
	/// The new name of the list
	pub name: Option<String>,
	/// Whether every signed in user can read the list
	pub public: Option<bool>,
}

/// The body of `DELETE /api/shopping-list`
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteShoppingListsRequest {
	/// The lists to delete. Every one of them must be owned by the caller
	pub ids: Vec<Uuid>,
}

/// The response of a delete route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeletedResponse {
	/// How many rows were removed
	pub deleted: u64,
}

/// The body of `POST /api/shopping-list/items` and
/// `POST /api/shopping-list/:list_id/items`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemRequest {
	/// The list to add the item to. Required when the list is not part of the
	/// path, ignored otherwise
	pub list_id: Option<Uuid>,
	/// What to buy
	pub name: String,
	/// How many to buy
	#[serde(default = "default_quantity")]
	pub quantity: i64,
	/// Whether the item has already been bought
	#[serde(default)]
	pub checked: bool,
}

/// The body of `PUT .../items/:item_id`. Missing fields are left unchanged,
/// unknown fields (such as the `id` sent back by clients) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItemRequest {
	/// What to buy
	pub name: Option<String>,
	/// How many to buy
	pub quantity: Option<i64>,
	/// Whether the item has been bought
	pub checked: Option<bool>,
}

/// The body of `PUT /api/shopping-list/:list_id/editors` and
/// `PUT /api/shopping-list/:list_id/viewers`. Replaces the whole member set.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMembersRequest {
	/// The usernames of the members
	#[serde(alias = "editors", alias = "viewers")]
	pub usernames: Vec<String>,
}

fn default_quantity() -> i64 {
	1
}

#[cfg(test)]
mod test {
	use serde_json::json;

	use super::*;

	#[test]
	fn access_levels_are_ordered() {
		assert!(ListAccess::Owner.can_manage());
		assert!(!ListAccess::Editor.can_manage());
		assert!(ListAccess::Editor.can_edit_items());
		assert!(!ListAccess::Viewer.can_edit_items());
		assert!(!ListAccess::Public.can_edit_items());
		assert!(ListAccess::Viewer > ListAccess::Public);
	}

	#[test]
	fn list_access_is_flattened_into_the_list() {
		let id = Uuid::new_v4();
		let owner = Uuid::new_v4();
		let value = serde_json::to_value(ShoppingListWithAccess {
			list: ShoppingList {
				id,
				name: "Groceries".to_string(),
				owner,
				public: false,
			},
			access: ListAccess::Editor,
		})
		.unwrap();
		assert_eq!(
			value,
			json!({
				"id": id,
				"name": "Groceries",
				"owner": owner,
				"public": false,
				"access": "editor",
			})
		);
	}

	#[test]
	fn item_updates_ignore_fields_sent_back_by_clients() {
		let update: UpdateItemRequest = serde_json::from_value(json!({
			"id": Uuid::new_v4(),
			"list_id": Uuid::new_v4(),
			"checked": true,
		}))
		.unwrap();
		assert_eq!(update.checked, Some(true));
		assert!(update.name.is_none());
		assert!(update.quantity.is_none());
	}

	#[test]
	fn new_items_default_to_one_unchecked() {
		let item: CreateItemRequest = serde_json::from_value(json!({ "name": "Milk" })).unwrap();
		assert_eq!(item.quantity, 1);
		assert!(!item.checked);
	}

	#[test]
	fn members_accept_the_role_name_as_key() {
		let editors: UpdateMembersRequest =
			serde_json::from_value(json!({ "editors": ["alice"] })).unwrap();
		assert_eq!(editors.usernames, vec!["alice".to_string()]);
	}
}
