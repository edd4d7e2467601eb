use argon2::{
	password_hash::{PasswordHasher, PasswordVerifier, SaltString},
	Algorithm,
	Argon2,
	PasswordHash,
	Version,
};

use crate::prelude::*;

/// Creates the argon2 hasher, peppered with the configured secret
fn hasher(pepper: &str) -> Result<Argon2<'_>, ErrorType> {
	Argon2::new_with_secret(
		pepper.as_bytes(),
		Algorithm::Argon2id,
		Version::V0x13,
		constants::HASHING_PARAMS,
	)
	.inspect_err(|err| {
		error!("Error creating Argon2: `{}`", err);
	})
	.map_err(ErrorType::server_error)
}

/// Hashes a password with a fresh random salt, in the PHC string format
pub fn hash_password(password: &str, pepper: &str) -> Result<String, ErrorType> {
	Ok(hasher(pepper)?
		.hash_password(
			password.as_bytes(),
			SaltString::generate(&mut rand::thread_rng()).as_salt(),
		)
		.inspect_err(|err| {
			error!("Error hashing password: `{}`", err);
		})
		.map_err(ErrorType::server_error)?
		.to_string())
}

/// Checks a password against a hash created by [`hash_password`] with the same
/// pepper
pub fn validate_hash(password: &str, hash: &str, pepper: &str) -> Result<bool, ErrorType> {
	Ok(hasher(pepper)?
		.verify_password(
			password.as_bytes(),
			&PasswordHash::new(hash).map_err(|err| ErrorType::server_error(err.to_string()))?,
		)
		.is_ok())
}

#[cfg(test)]
mod test {
	use super::{hash_password, validate_hash};

	#[test]
	fn password_matches_its_own_hash() {
		let hash = hash_password("hunter2", "pepper").unwrap();
		assert!(hash.starts_with("$argon2id$"));
		assert!(validate_hash("hunter2", &hash, "pepper").unwrap());
		assert!(!validate_hash("hunter3", &hash, "pepper").unwrap());
	}

	#[test]
	fn pepper_is_part_of_the_hash() {
		let hash = hash_password("hunter2", "pepper").unwrap();
		assert!(!validate_hash("hunter2", &hash, "salt").unwrap());
	}

	#[test]
	fn same_password_hashes_differently() {
		assert_ne!(
			hash_password("hunter2", "").unwrap(),
			hash_password("hunter2", "").unwrap()
		);
	}

	#[test]
	fn garbage_hash_is_an_error() {
		assert!(validate_hash("hunter2", "not a hash", "").is_err());
	}
}
