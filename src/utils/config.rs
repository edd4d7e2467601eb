use std::{
	env,
	fmt::{Display, Formatter},
	net::SocketAddr,
};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Reads the configuration from the config files and the environment.
///
/// Debug builds always read `config/dev`. Release builds read the file named
/// by the `APP_ENV` variable (`prod` by default). Both files are optional and
/// every key has a default, so the API can start without any configuration.
/// Environment variables prefixed with `APP_` override the file values.
#[instrument]
pub fn parse_config() -> Result<AppConfig, ConfigError> {
	trace!("Reading config data...");

	let env = if cfg!(debug_assertions) {
		"dev".to_string()
	} else {
		env::var("APP_ENV").unwrap_or_else(|_| "prod".into())
	};

	let builder = match env.as_ref() {
		"prod" | "production" => Config::builder()
			.add_source(File::with_name("config/prod").required(false))
			.set_default("environment", "production")?,
		"dev" | "development" => Config::builder()
			.add_source(File::with_name("config/dev").required(false))
			.set_default("environment", "development")?,
		unknown => {
			return Err(ConfigError::Message(format!(
				"Unknown running environment `{}`",
				unknown
			)));
		}
	};

	builder
		.set_default("bindAddress", "127.0.0.1:3000")?
		.set_default("jwtSecret", "secret")?
		.set_default("passwordPepper", "")?
		.set_default("database.file", "shopping-list.db")?
		.set_default("database.connectionLimit", 10_i64)?
		.set_default("database.logStatements", false)?
		.set_default("staticFiles.authClient", "auth-client")?
		.set_default("staticFiles.shoppingList", "shopping-list")?
		.set_default("staticFiles.serveShoppingList", true)?
		.add_source(
			Environment::with_prefix("APP")
				.separator("__")
				.prefix_separator("_"),
		)
		.build()?
		.try_deserialize()
}

/// The configuration for the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
	/// The address the server listens on.
	#[serde(alias = "bindaddress")]
	pub bind_address: SocketAddr,
	/// The secret used to sign every authorization code, access token and
	/// refresh token.
	#[serde(alias = "jwtsecret")]
	pub jwt_secret: String,
	/// The pepper mixed into every password hash.
	#[serde(alias = "passwordpepper")]
	pub password_pepper: String,
	/// The environment the application is running in. This is set at runtime
	/// based on an environment variable and if the application is compiled
	/// with debug mode.
	pub environment: RunningEnvironment,
	/// The configuration for the database to connect to
	pub database: DatabaseConfig,
	/// Where the built front-ends live
	#[serde(alias = "staticfiles")]
	pub static_files: StaticFilesConfig,
}

/// The environment the application is running in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RunningEnvironment {
	/// The application is running in development mode
	Development,
	/// The application is running in production mode
	Production,
}

impl Display for RunningEnvironment {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			formatter,
			"{}",
			match self {
				RunningEnvironment::Development => "Development",
				RunningEnvironment::Production => "Production",
			}
		)
	}
}

/// The configuration for the database to connect to. This will be the primary
/// data store for users and shopping lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
	/// The location of the sqlite database file
	pub file: String,
	/// The maximum number of connections to the database
	#[serde(alias = "connectionlimit")]
	pub connection_limit: u32,
	/// Log every statement executed against the database
	#[serde(alias = "logstatements")]
	pub log_statements: bool,
}

/// The directories of the built front-ends served by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticFilesConfig {
	/// The sign in / registration client, served under `/authorize`
	#[serde(alias = "authclient")]
	pub auth_client: String,
	/// The shopping list client, served under `/shopping-list`
	#[serde(alias = "shoppinglist")]
	pub shopping_list: String,
	/// Whether the shopping list client should be served at all
	#[serde(alias = "serveshoppinglist")]
	pub serve_shopping_list: bool,
}
