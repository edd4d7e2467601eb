use sqlx::{pool::PoolOptions, Pool};

use crate::prelude::*;

/// Creates the schema on first start, and checks the schema version on every
/// start after that.
mod initializer;
/// The meta data of the database. This is mostly used for the version number
/// of the schema.
mod meta_data;
/// The shopping lists, their items and their members.
mod shopping_list;
/// The registered users.
mod user;

pub use self::{initializer::initialize, meta_data::*, shopping_list::*, user::*};

/// Connects to the database based on a config. Not much to say here.
#[instrument(skip(config))]
pub async fn connect(config: &DatabaseConfig) -> Pool<DatabaseType> {
	info!("Connecting to database: `{}`", config.file);
	PoolOptions::<DatabaseType>::new()
		.max_connections(config.connection_limit)
		.connect_with(
			<DatabaseConnection as sqlx::Connection>::Options::new()
				.filename(&config.file)
				.foreign_keys(true)
				.create_if_missing(true),
		)
		.await
		.expect("Failed to connect to database")
}
