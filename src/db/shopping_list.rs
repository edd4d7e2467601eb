use sqlx::sqlite::SqliteRow;

use crate::{
	models::{
		shopping_list::{
			ListAccess,
			ListMemberRole,
			ShoppingList,
			ShoppingListItem,
			ShoppingListWithAccess,
		},
		user::PublicUser,
	},
	prelude::*,
};

/// Initializes the shopping list tables
#[instrument(skip(connection))]
pub async fn initialize_shopping_list_tables(
	connection: &mut DatabaseConnection,
) -> Result<(), sqlx::Error> {
	info!("Setting up shopping list tables");
	query(
		r#"
		CREATE TABLE shopping_list(
			id BLOB CONSTRAINT shopping_list_pk PRIMARY KEY,
			name TEXT NOT NULL,
			owner BLOB NOT NULL,
			public BOOLEAN NOT NULL DEFAULT FALSE,

			CHECK (LENGTH(TRIM(name)) > 0),

			FOREIGN KEY (owner) REFERENCES users(id)
		);
		"#,
	)
	.execute(&mut *connection)
	.await?;

	query(
		r#"
		CREATE TABLE shopping_list_item(
			id BLOB CONSTRAINT shopping_list_item_pk PRIMARY KEY,
			list_id BLOB NOT NULL,
			name TEXT NOT NULL,
			quantity INTEGER NOT NULL DEFAULT 1,
			checked BOOLEAN NOT NULL DEFAULT FALSE,

			CHECK (LENGTH(TRIM(name)) > 0),
			CHECK (quantity >= 0),

			FOREIGN KEY (list_id) REFERENCES shopping_list(id)
				ON DELETE CASCADE
		);
		"#,
	)
	.execute(&mut *connection)
	.await?;

	query(
		r#"
		CREATE INDEX shopping_list_item_idx_list_id
		ON shopping_list_item(list_id);
		"#,
	)
	.execute(&mut *connection)
	.await?;

	for table in ["shopping_list_editor", "shopping_list_viewer"] {
		query(&format!(
			r#"
			CREATE TABLE {table}(
				list_id BLOB NOT NULL,
				user_id BLOB NOT NULL,

				CONSTRAINT {table}_pk PRIMARY KEY (list_id, user_id),

				FOREIGN KEY (list_id) REFERENCES shopping_list(id)
					ON DELETE CASCADE,
				FOREIGN KEY (user_id) REFERENCES users(id)
			);
			"#
		))
		.execute(&mut *connection)
		.await?;
	}

	Ok(())
}

/// Reads the `access` column computed by the visibility queries
fn access_from_row(row: &SqliteRow) -> Result<ListAccess, sqlx::Error> {
	Ok(match row.try_get::<String, _>("access")?.as_str() {
		"owner" => ListAccess::Owner,
		"editor" => ListAccess::Editor,
		"viewer" => ListAccess::Viewer,
		_ => ListAccess::Public,
	})
}

/// Stores a new shopping list owned by the given user
#[instrument(skip(connection))]
pub async fn create_shopping_list(
	connection: &mut DatabaseConnection,
	name: &str,
	owner: Uuid,
	public: bool,
) -> Result<ShoppingList, sqlx::Error> {
	let list = ShoppingList {
		id: Uuid::new_v4(),
		name: name.to_string(),
		owner,
		public,
	};

	query(
		r#"
		INSERT INTO
			shopping_list(
				id,
				name,
				owner,
				public
			)
		VALUES
			($1, $2, $3, $4);
		"#,
	)
	.bind(list.id)
	.bind(&list.name)
	.bind(list.owner)
	.bind(list.public)
	.execute(&mut *connection)
	.await?;

	Ok(list)
}

/// Finds a list along with how the given user can access it. Lists the user
/// cannot see at all are reported as missing.
#[instrument(skip(connection))]
pub async fn get_shopping_list_with_access(
	connection: &mut DatabaseConnection,
	list_id: Uuid,
	user_id: Uuid,
) -> Result<Option<ShoppingListWithAccess>, sqlx::Error> {
	get_visible_shopping_lists(connection, user_id, Some(list_id))
		.await
		.map(|lists| lists.into_iter().next())
}

/// Lists every shopping list the user owns, is a member of, or that is public.
/// Passing a list ID restricts the result to that list.
#[instrument(skip(connection))]
pub async fn get_visible_shopping_lists(
	connection: &mut DatabaseConnection,
	user_id: Uuid,
	list_id: Option<Uuid>,
) -> Result<Vec<ShoppingListWithAccess>, sqlx::Error> {
	query(
		r#"
		SELECT
			shopping_list.*,
			CASE
				WHEN shopping_list.owner = $1 THEN 'owner'
				WHEN shopping_list_editor.user_id IS NOT NULL THEN 'editor'
				WHEN shopping_list_viewer.user_id IS NOT NULL THEN 'viewer'
				ELSE 'public'
			END AS "access"
		FROM
			shopping_list
		LEFT JOIN
			shopping_list_editor
		ON
			shopping_list_editor.list_id = shopping_list.id AND
			shopping_list_editor.user_id = $1
		LEFT JOIN
			shopping_list_viewer
		ON
			shopping_list_viewer.list_id = shopping_list.id AND
			shopping_list_viewer.user_id = $1
		WHERE
			(
				shopping_list.owner = $1 OR
				shopping_list.public = TRUE OR
				shopping_list_editor.user_id IS NOT NULL OR
				shopping_list_viewer.user_id IS NOT NULL
			) AND
			($2 IS NULL OR shopping_list.id = $2)
		ORDER BY
			shopping_list.name;
		"#,
	)
	.bind(user_id)
	.bind(list_id)
	.fetch_all(&mut *connection)
	.await?
	.into_iter()
	.map(|row| -> Result<_, sqlx::Error> {
		Ok(ShoppingListWithAccess {
			list: ShoppingList {
				id: row.try_get("id")?,
				name: row.try_get("name")?,
				owner: row.try_get("owner")?,
				public: row.try_get("public")?,
			},
			access: access_from_row(&row)?,
		})
	})
	.collect()
}

/// Changes the name and / or visibility of a list, returning the updated list
#[instrument(skip(connection))]
pub async fn update_shopping_list(
	connection: &mut DatabaseConnection,
	list_id: Uuid,
	name: Option<&str>,
	public: Option<bool>,
) -> Result<Option<ShoppingList>, sqlx::Error> {
	query_as::<_, ShoppingList>(
		r#"
		UPDATE
			shopping_list
		SET
			name = COALESCE($2, name),
			public = COALESCE($3, public)
		WHERE
			id = $1
		RETURNING
			*;
		"#,
	)
	.bind(list_id)
	.bind(name)
	.bind(public)
	.fetch_optional(&mut *connection)
	.await
}

/// Deletes a list. Its items and members go with it.
#[instrument(skip(connection))]
pub async fn delete_shopping_list(
	connection: &mut DatabaseConnection,
	list_id: Uuid,
) -> Result<u64, sqlx::Error> {
	Ok(query(
		r#"
		DELETE FROM
			shopping_list
		WHERE
			id = $1;
		"#,
	)
	.bind(list_id)
	.execute(&mut *connection)
	.await?
	.rows_affected())
}

/// Lists the items of a list
#[instrument(skip(connection))]
pub async fn get_items_for_shopping_list(
	connection: &mut DatabaseConnection,
	list_id: Uuid,
) -> Result<Vec<ShoppingListItem>, sqlx::Error> {
	query_as::<_, ShoppingListItem>(
		r#"
		SELECT
			*
		FROM
			shopping_list_item
		WHERE
			list_id = $1
		ORDER BY
			rowid;
		"#,
	)
	.bind(list_id)
	.fetch_all(&mut *connection)
	.await
}

/// Lists the items of every list the user can see
#[instrument(skip(connection))]
pub async fn get_visible_items(
	connection: &mut DatabaseConnection,
	user_id: Uuid,
) -> Result<Vec<ShoppingListItem>, sqlx::Error> {
	query_as::<_, ShoppingListItem>(
		r#"
		SELECT
			shopping_list_item.*
		FROM
			shopping_list_item
		INNER JOIN
			shopping_list
		ON
			shopping_list.id = shopping_list_item.list_id
		WHERE
			shopping_list.owner = $1 OR
			shopping_list.public = TRUE OR
			EXISTS (
				SELECT
					1
				FROM
					shopping_list_editor
				WHERE
					list_id = shopping_list.id AND
					user_id = $1
			) OR
			EXISTS (
				SELECT
					1
				FROM
					shopping_list_viewer
				WHERE
					list_id = shopping_list.id AND
					user_id = $1
			)
		ORDER BY
			shopping_list_item.list_id,
			shopping_list_item.rowid;
		"#,
	)
	.bind(user_id)
	.fetch_all(&mut *connection)
	.await
}

/// Finds an item by its ID, regardless of who can see it
#[instrument(skip(connection))]
pub async fn get_shopping_list_item_by_id(
	connection: &mut DatabaseConnection,
	item_id: Uuid,
) -> Result<Option<ShoppingListItem>, sqlx::Error> {
	query_as::<_, ShoppingListItem>(
		r#"
		SELECT
			*
		FROM
			shopping_list_item
		WHERE
			id = $1;
		"#,
	)
	.bind(item_id)
	.fetch_optional(&mut *connection)
	.await
}

/// Adds an item to a list
#[instrument(skip(connection))]
pub async fn create_shopping_list_item(
	connection: &mut DatabaseConnection,
	list_id: Uuid,
	name: &str,
	quantity: i64,
	checked: bool,
) -> Result<ShoppingListItem, sqlx::Error> {
	let item = ShoppingListItem {
		id: Uuid::new_v4(),
		list_id,
		name: name.to_string(),
		quantity,
		checked,
	};

	query(
		r#"
		INSERT INTO
			shopping_list_item(
				id,
				list_id,
				name,
				quantity,
				checked
			)
		VALUES
			($1, $2, $3, $4, $5);
		"#,
	)
	.bind(item.id)
	.bind(item.list_id)
	.bind(&item.name)
	.bind(item.quantity)
	.bind(item.checked)
	.execute(&mut *connection)
	.await?;

	Ok(item)
}

/// Changes the given fields of an item, returning the updated item
#[instrument(skip(connection))]
pub async fn update_shopping_list_item(
	connection: &mut DatabaseConnection,
	item_id: Uuid,
	name: Option<&str>,
	quantity: Option<i64>,
	checked: Option<bool>,
) -> Result<Option<ShoppingListItem>, sqlx::Error> {
	query_as::<_, ShoppingListItem>(
		r#"
		UPDATE
			shopping_list_item
		SET
			name = COALESCE($2, name),
			quantity = COALESCE($3, quantity),
			checked = COALESCE($4, checked)
		WHERE
			id = $1
		RETURNING
			*;
		"#,
	)
	.bind(item_id)
	.bind(name)
	.bind(quantity)
	.bind(checked)
	.fetch_optional(&mut *connection)
	.await
}

/// Removes an item from its list
#[instrument(skip(connection))]
pub async fn delete_shopping_list_item(
	connection: &mut DatabaseConnection,
	item_id: Uuid,
) -> Result<u64, sqlx::Error> {
	Ok(query(
		r#"
		DELETE FROM
			shopping_list_item
		WHERE
			id = $1;
		"#,
	)
	.bind(item_id)
	.execute(&mut *connection)
	.await?
	.rows_affected())
}

/// Lists the users that have the given role on a list
#[instrument(skip(connection))]
pub async fn get_shopping_list_members(
	connection: &mut DatabaseConnection,
	list_id: Uuid,
	role: ListMemberRole,
) -> Result<Vec<PublicUser>, sqlx::Error> {
	let sql = match role {
		ListMemberRole::Editor => {
			r#"
			SELECT
				users.id,
				users.username,
				users.displayname
			FROM
				shopping_list_editor
			INNER JOIN
				users
			ON
				users.id = shopping_list_editor.user_id
			WHERE
				shopping_list_editor.list_id = $1
			ORDER BY
				users.username;
			"#
		}
		ListMemberRole::Viewer => {
			r#"
			SELECT
				users.id,
				users.username,
				users.displayname
			FROM
				shopping_list_viewer
			INNER JOIN
				users
			ON
				users.id = shopping_list_viewer.user_id
			WHERE
				shopping_list_viewer.list_id = $1
			ORDER BY
				users.username;
			"#
		}
	};

	query(sql)
		.bind(list_id)
		.fetch_all(&mut *connection)
		.await?
		.into_iter()
		.map(|row| -> Result<_, sqlx::Error> {
			Ok(PublicUser {
				id: row.try_get("id")?,
				username: row.try_get("username")?,
				displayname: row.try_get("displayname")?,
			})
		})
		.collect()
}

/// Replaces the users that have the given role on a list. A user keeps a
/// single role per list, so they are taken out of the other role's set.
#[instrument(skip(connection))]
pub async fn set_shopping_list_members(
	connection: &mut DatabaseConnection,
	list_id: Uuid,
	role: ListMemberRole,
	user_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
	let (table, other_table) = match role {
		ListMemberRole::Editor => ("shopping_list_editor", "shopping_list_viewer"),
		ListMemberRole::Viewer => ("shopping_list_viewer", "shopping_list_editor"),
	};

	query(&format!(
		r#"
		DELETE FROM
			{table}
		WHERE
			list_id = $1;
		"#
	))
	.bind(list_id)
	.execute(&mut *connection)
	.await?;

	for user_id in user_ids {
		query(&format!(
			r#"
			DELETE FROM
				{other_table}
			WHERE
				list_id = $1 AND
				user_id = $2;
			"#
		))
		.bind(list_id)
		.bind(user_id)
		.execute(&mut *connection)
		.await?;

		query(&format!(
			r#"
			INSERT INTO
				{table}(list_id, user_id)
			VALUES
				($1, $2)
			ON CONFLICT DO NOTHING;
			"#
		))
		.bind(list_id)
		.bind(user_id)
		.execute(&mut *connection)
		.await?;
	}

	Ok(())
}
