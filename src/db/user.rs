use time::OffsetDateTime;

use crate::{models::user::User, prelude::*};

/// Initializes the user tables
#[instrument(skip(connection))]
pub async fn initialize_user_tables(connection: &mut DatabaseConnection) -> Result<(), sqlx::Error> {
	info!("Setting up user tables");
	query(
		r#"
		CREATE TABLE users(
			id BLOB CONSTRAINT users_pk PRIMARY KEY,
			username TEXT NOT NULL CONSTRAINT users_uq_username UNIQUE,
			displayname TEXT NOT NULL,
			password_hash TEXT NOT NULL,
			created TEXT NOT NULL,

			CHECK (LENGTH(TRIM(username)) > 0),
			CHECK (LENGTH(TRIM(displayname)) > 0)
		);
		"#,
	)
	.execute(&mut *connection)
	.await?;

	Ok(())
}

/// Stores a new user and returns it
#[instrument(skip(connection, password_hash))]
pub async fn create_user(
	connection: &mut DatabaseConnection,
	username: &str,
	displayname: &str,
	password_hash: &str,
) -> Result<User, sqlx::Error> {
	let user = User {
		id: Uuid::new_v4(),
		username: username.to_string(),
		displayname: displayname.to_string(),
		password_hash: password_hash.to_string(),
		created: OffsetDateTime::now_utc(),
	};

	query(
		r#"
		INSERT INTO
			users(
				id,
				username,
				displayname,
				password_hash,
				created
			)
		VALUES
			($1, $2, $3, $4, $5);
		"#,
	)
	.bind(user.id)
	.bind(&user.username)
	.bind(&user.displayname)
	.bind(&user.password_hash)
	.bind(user.created)
	.execute(&mut *connection)
	.await?;

	Ok(user)
}

/// Finds every user with the given username. Usernames are unique, so callers
/// expect exactly one row.
#[instrument(skip(connection))]
pub async fn get_users_by_username(
	connection: &mut DatabaseConnection,
	username: &str,
) -> Result<Vec<User>, sqlx::Error> {
	query_as::<_, User>(
		r#"
		SELECT
			*
		FROM
			users
		WHERE
			username = $1;
		"#,
	)
	.bind(username)
	.fetch_all(&mut *connection)
	.await
}

/// Counts the users matching every filter that is given. No filters counts
/// everyone.
#[instrument(skip(connection))]
pub async fn count_users(
	connection: &mut DatabaseConnection,
	id: Option<Uuid>,
	username: Option<&str>,
) -> Result<i64, sqlx::Error> {
	query(
		r#"
		SELECT
			COUNT(*) AS "count"
		FROM
			users
		WHERE
			($1 IS NULL OR id = $1) AND
			($2 IS NULL OR username = $2);
		"#,
	)
	.bind(id)
	.bind(username)
	.fetch_one(&mut *connection)
	.await?
	.try_get("count")
}

/// Finds the users with the given usernames. Unknown usernames are left out,
/// so callers compare the lengths to detect them.
#[instrument(skip(connection))]
pub async fn get_users_by_usernames(
	connection: &mut DatabaseConnection,
	usernames: &[String],
) -> Result<Vec<User>, sqlx::Error> {
	let mut users = Vec::with_capacity(usernames.len());
	for username in usernames {
		users.extend(get_users_by_username(&mut *connection, username).await?);
	}
	Ok(users)
}
