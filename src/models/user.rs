use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A user, as stored in the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
	/// The unique ID of the user
	pub id: Uuid,
	/// The name the user signs in with
	pub username: String,
	/// The name shown to other users
	pub displayname: String,
	/// The argon2 hash of the user's password
	pub password_hash: String,
	/// When the user registered
	pub created: OffsetDateTime,
}

/// The parts of a [`User`] that can be shown to anyone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicUser {
	/// The unique ID of the user
	pub id: Uuid,
	/// The name the user signs in with
	pub username: String,
	/// The name shown to other users
	pub displayname: String,
}

impl From<User> for PublicUser {
	fn from(user: User) -> Self {
		Self {
			id: user.id,
			username: user.username,
			displayname: user.displayname,
		}
	}
}

/// The query of `GET /api/users/count`. Every filter that is present must
/// match; other query parameters are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountUsersQuery {
	/// Only count the user with this ID
	pub id: Option<String>,
	/// Only count the user with this username
	pub username: Option<String>,
}

/// The body of `POST /api/users/register`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
	/// The name shown to other users
	pub displayname: String,
	/// The name the user signs in with
	pub username: String,
	/// The password the user signs in with
	pub password: String,
}
