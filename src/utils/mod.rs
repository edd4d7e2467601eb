/// The configuration for the API.
pub mod config;
/// The axum extractors used to authenticate requests.
pub mod extractors;
/// Sets up the global tracing subscriber.
pub mod logger;

/// The constants module contains all the constants that are used throughout
/// the API.
pub mod constants {
	use semver::Version;
	use time::Duration;

	/// The version of the database schema. This is used to determine whether
	/// the database needs to be migrated or not.
	pub const DATABASE_VERSION: Version = Version::new(0, 1, 0);
	/// The issuer (iss) of every JWT signed by the API.
	pub const JWT_ISSUER: &str = "shopping-list-api";
	/// The parameters that will be used to hash, using argon2 as the hashing
	/// algorithm.
	pub const HASHING_PARAMS: argon2::Params =
		if let Ok(params) = argon2::Params::new(8192, 4, 4, None) {
			params
		} else {
			panic!("Failed to create hashing params");
		};
	/// How long an authorization code can be exchanged for tokens.
	pub const AUTHORIZATION_CODE_VALIDITY: Duration = Duration::minutes(5);
	/// How long an access token is accepted on protected routes.
	pub const ACCESS_TOKEN_VALIDITY: Duration = Duration::minutes(5);
	/// How long a refresh token can be exchanged for a new token pair.
	pub const REFRESH_TOKEN_VALIDITY: Duration = Duration::minutes(30);
	/// How often expired entries are swept out of the token store.
	pub const TOKEN_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);
	/// The token type returned alongside every access token.
	pub const BEARER_TOKEN_TYPE: &str = "Bearer";
}
