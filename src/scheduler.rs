use time::OffsetDateTime;
use tokio::time::MissedTickBehavior;

use crate::{models::token_data::TokenType, prelude::*};

/// Starts the background jobs. They run until the runtime shuts down.
#[instrument(skip(state))]
pub fn initialize_jobs(state: &AppState) {
	tokio::spawn(sweep_expired_tokens(state.clone()));
}

/// Drops expired codes and tokens from the token store every
/// [`constants::TOKEN_SWEEP_INTERVAL`]
async fn sweep_expired_tokens(state: AppState) {
	let mut interval = tokio::time::interval(constants::TOKEN_SWEEP_INTERVAL);
	interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

	loop {
		interval.tick().await;

		let removed = state.tokens.remove_expired(OffsetDateTime::now_utc()).await;
		if removed > 0 {
			debug!("Swept {} expired tokens", removed);
		}
		trace!(
			"{} codes, {} access tokens and {} refresh tokens live",
			state.tokens.len(TokenType::AuthorizationCode).await,
			state.tokens.len(TokenType::AccessToken).await,
			state.tokens.len(TokenType::RefreshToken).await
		);
	}
}
