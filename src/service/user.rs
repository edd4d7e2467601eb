use regex::Regex;

use crate::{
	models::user::{PublicUser, User},
	prelude::*,
};

/// Display names are word characters, optionally with dots and spaces in
/// between
const DISPLAYNAME_PATTERN: &str = r"^\w([\w. ]*\w)?$";
/// Usernames are word characters, optionally with dots in between
const USERNAME_PATTERN: &str = r"^\w([\w.]*\w)?$";

/// Whether a username is well-formed
pub fn is_username_valid(username: &str) -> bool {
	Regex::new(USERNAME_PATTERN).is_ok_and(|regex| regex.is_match(username))
}

/// Whether a display name is well-formed
pub fn is_displayname_valid(displayname: &str) -> bool {
	Regex::new(DISPLAYNAME_PATTERN).is_ok_and(|regex| regex.is_match(displayname))
}

/// Validates and stores a new user. The password is hashed with the
/// configured pepper before it reaches the database.
#[instrument(skip(connection, config, password))]
pub async fn register_user(
	connection: &mut DatabaseConnection,
	config: &AppConfig,
	username: &str,
	displayname: &str,
	password: &str,
) -> Result<PublicUser, ErrorType> {
	if !is_displayname_valid(displayname) {
		return Err(ErrorType::InvalidDisplayName);
	}
	if !is_username_valid(username) {
		return Err(ErrorType::InvalidUsername);
	}
	if password.trim().is_empty() {
		return Err(ErrorType::InvalidPassword);
	}

	if db::count_users(connection, None, Some(username)).await? > 0 {
		return Err(ErrorType::UsernameUnavailable);
	}

	let password_hash = service::hash_password(password, &config.password_pepper)?;
	let user = db::create_user(connection, username, displayname, &password_hash).await?;

	info!("Registered user `{}`", user.username);
	Ok(user.into())
}

/// Checks a username and password. Exactly one user must have the username,
/// and the password must match their hash.
#[instrument(skip(connection, config, password))]
pub async fn authenticate_user(
	connection: &mut DatabaseConnection,
	config: &AppConfig,
	username: &str,
	password: &str,
) -> Result<User, ErrorType> {
	let mut users = db::get_users_by_username(connection, username).await?;
	if users.len() != 1 {
		debug!("Found {} users named `{}`", users.len(), username);
		return Err(ErrorType::IncorrectCredentials);
	}
	let user = users.remove(0);

	if !service::validate_hash(password, &user.password_hash, &config.password_pepper)? {
		debug!("Password mismatch for `{}`", username);
		return Err(ErrorType::IncorrectCredentials);
	}

	Ok(user)
}

/// Finds the user a verified access token was issued to. A token for a user
/// that no longer exists is treated as invalid.
#[instrument(skip(connection))]
pub async fn get_token_user(
	connection: &mut DatabaseConnection,
	username: &str,
) -> Result<User, ErrorType> {
	db::get_users_by_username(connection, username)
		.await?
		.into_iter()
		.next()
		.ok_or(ErrorType::AuthorizationTokenInvalid)
}
