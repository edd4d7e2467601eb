use std::cmp::Ordering;

use crate::prelude::*;

/// Creates every table when the database is empty. Otherwise checks that the
/// stored schema version is one this build understands.
#[instrument(skip(state))]
pub async fn initialize(state: &AppState) -> Result<(), ErrorType> {
	info!("Initializing database");

	let tables = query(
		r#"
		SELECT
			name
		FROM
			sqlite_schema
		WHERE
			type = 'table';
		"#,
	)
	.fetch_all(&state.database)
	.await?;

	let mut transaction = state.database.begin().await?;

	// If no tables exist in the database, initialize fresh
	if tables.is_empty() {
		warn!("No tables exist. Creating fresh");

		db::initialize_meta_tables(&mut transaction).await?;
		db::initialize_user_tables(&mut transaction).await?;
		db::initialize_shopping_list_tables(&mut transaction).await?;

		db::set_database_version(&mut transaction, &constants::DATABASE_VERSION).await?;

		transaction.commit().await?;

		info!("Database created fresh");
		return Ok(());
	}

	let version = db::get_database_version(&mut transaction).await?;

	match version.cmp(&constants::DATABASE_VERSION) {
		Ordering::Greater => {
			error!("Database version is higher than what's recognised. Exiting...");
			return Err(ErrorType::server_error(format!(
				"database schema version {} is newer than the supported {}",
				version,
				constants::DATABASE_VERSION
			)));
		}
		Ordering::Less => {
			info!("Migrating from {}", version);
			db::set_database_version(&mut transaction, &constants::DATABASE_VERSION).await?;
		}
		Ordering::Equal => {
			info!("Database already in the latest version. No migration required.");
		}
	}

	transaction.commit().await?;

	Ok(())
}
