use std::{collections::HashMap, sync::Arc};

use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::models::token_data::TokenType;

/// Keeps track of every authorization code, access token and refresh token
/// that is currently valid. A JWT is only accepted if it is both correctly
/// signed and present in here, which is what makes codes and refresh tokens
/// single-use and lets any token be revoked before it expires.
///
/// The store lives in memory, so a restart invalidates every issued token.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
	/// The sets of tokens, keyed by their encoded form
	inner: Arc<Mutex<TokenSets>>,
}

/// The three sets of issued tokens. Each entry remembers when the token
/// expires, so that the sweeper can drop it.
#[derive(Debug, Default)]
struct TokenSets {
	/// Codes waiting to be exchanged at `/authorize/token`
	authorization_codes: HashMap<String, OffsetDateTime>,
	/// Tokens accepted on protected routes
	access_tokens: HashMap<String, OffsetDateTime>,
	/// Tokens waiting to be exchanged for a new pair
	refresh_tokens: HashMap<String, OffsetDateTime>,
}

impl TokenSets {
	fn set_mut(&mut self, kind: TokenType) -> &mut HashMap<String, OffsetDateTime> {
		match kind {
			TokenType::AuthorizationCode => &mut self.authorization_codes,
			TokenType::AccessToken => &mut self.access_tokens,
			TokenType::RefreshToken => &mut self.refresh_tokens,
		}
	}

	fn set(&self, kind: TokenType) -> &HashMap<String, OffsetDateTime> {
		match kind {
			TokenType::AuthorizationCode => &self.authorization_codes,
			TokenType::AccessToken => &self.access_tokens,
			TokenType::RefreshToken => &self.refresh_tokens,
		}
	}
}

impl TokenStore {
	/// Creates an empty store
	pub fn new() -> Self {
		Self::default()
	}

	/// Records a newly issued token
	pub async fn insert(&self, kind: TokenType, token: String, expiry: OffsetDateTime) {
		self.inner.lock().await.set_mut(kind).insert(token, expiry);
	}

	/// Removes the token from its set. Returns whether it was there, so only
	/// the first caller to take a token gets `true`.
	pub async fn take(&self, kind: TokenType, token: &str) -> bool {
		self.inner.lock().await.set_mut(kind).remove(token).is_some()
	}

	/// Whether the token is currently in its set
	pub async fn contains(&self, kind: TokenType, token: &str) -> bool {
		self.inner.lock().await.set(kind).contains_key(token)
	}

	/// Removes the token from whichever set holds it, returning that set's
	/// kind. Revoking an unknown token is not an error.
	pub async fn revoke(&self, token: &str) -> Option<TokenType> {
		let mut sets = self.inner.lock().await;
		[
			TokenType::AuthorizationCode,
			TokenType::AccessToken,
			TokenType::RefreshToken,
		]
		.into_iter()
		.find(|&kind| sets.set_mut(kind).remove(token).is_some())
	}

	/// Drops every token that expired at or before `now`, returning how many
	/// were dropped
	pub async fn remove_expired(&self, now: OffsetDateTime) -> usize {
		let mut sets = self.inner.lock().await;
		[
			TokenType::AuthorizationCode,
			TokenType::AccessToken,
			TokenType::RefreshToken,
		]
		.into_iter()
		.map(|kind| {
			let set = sets.set_mut(kind);
			let before = set.len();
			set.retain(|_, expiry| *expiry > now);
			before - set.len()
		})
		.sum()
	}

	/// The number of tokens of the given kind currently in the store
	pub async fn len(&self, kind: TokenType) -> usize {
		self.inner.lock().await.set(kind).len()
	}
}
