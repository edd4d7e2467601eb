#![forbid(unsafe_code)]

//! Authorization server and shopping list API.
//!
//! The `/authorize` routes implement a small OAuth2-style flow that hands out
//! single-use authorization codes and exchanges them for access and refresh
//! tokens. The `/api` routes expose the user registry and the shopping list
//! resources, protected by those access tokens.

/// The global state of the application and the server loop.
mod app;
/// All the database related functions. Initializing the schema, and the
/// queries for users and shopping lists.
pub mod db;
/// The data types used across the API. Request and response bodies, the JWT
/// claims and the error type.
mod models;
/// All the routes of the API, grouped by the resource they handle.
mod routes;
/// Background jobs that run alongside the server.
mod scheduler;
/// The business logic that is shared between routes. Password hashing, and
/// issuing / redeeming tokens.
pub mod service;
/// Utilities used throughout the API. The config parser, the logger, the
/// request extractors and the constants.
mod utils;

#[cfg(test)]
mod test;

/// The prelude module contains all the things needed in most files of the API.
pub mod prelude {
	pub use sqlx::{query, query_as, Row};
	pub use tracing::{debug, error, info, instrument, trace, warn};
	pub use uuid::Uuid;

	pub use crate::{
		app::AppState,
		db,
		models::ErrorType,
		service,
		utils::{config::*, constants},
	};

	/// The type of the database connection. A mutable reference to this should
	/// be used as the parameter for database functions, since it accepts both a
	/// connection and a transaction.
	pub type DatabaseConnection = <DatabaseType as sqlx::Database>::Connection;

	/// The type of the database transaction.
	pub type DatabaseTransaction = sqlx::Transaction<'static, DatabaseType>;

	/// The type of the database. This is currently set to [`sqlx::Sqlite`].
	/// A type alias is used here so that it can be referenced everywhere easily
	pub type DatabaseType = sqlx::Sqlite;
}

use app::AppState;
use service::TokenStore;
use utils::{config, logger};

#[tokio::main]
async fn main() {
	let config = config::parse_config().expect("unable to parse settings");

	logger::initialize(&config);
	tracing::debug!("Logger initialized");
	tracing::info!(
		"Configuration read. Running environment set to {}",
		config.environment
	);

	let database = db::connect(&config.database).await;
	tracing::debug!("Database connection pool established");

	let state = AppState {
		database,
		config,
		tokens: TokenStore::new(),
	};

	db::initialize(&state)
		.await
		.expect("unable to initialize database");
	tracing::debug!("Database initialized");

	scheduler::initialize_jobs(&state);
	tracing::debug!("Schedulers initialized");

	app::start_server(state).await;
}
