use tracing::{level_filters::LevelFilter, Dispatch, Level};
use tracing_subscriber::{
	fmt::{format::FmtSpan, Layer as FmtLayer},
	layer::SubscriberExt,
	Layer,
};

use crate::prelude::*;

/// Sets up the global default subscriber. Events from this crate are logged
/// down to TRACE in development and DEBUG in production. HTTP request spans
/// from `tower_http` and statement logs from `sqlx` are let through as well.
pub fn initialize(config: &AppConfig) {
	tracing::dispatcher::set_global_default(Dispatch::new(
		tracing_subscriber::registry().with(
			FmtLayer::new()
				.with_span_events(FmtSpan::NONE)
				.event_format(
					tracing_subscriber::fmt::format()
						.with_ansi(config.environment == RunningEnvironment::Development)
						.with_file(false)
						.compact(),
				)
				.with_filter(
					tracing_subscriber::filter::Targets::new()
						.with_target(env!("CARGO_CRATE_NAME"), LevelFilter::TRACE)
						.with_target("tower_http", LevelFilter::DEBUG)
						.with_target(
							"sqlx",
							if config.database.log_statements {
								LevelFilter::DEBUG
							} else {
								LevelFilter::WARN
							},
						),
				)
				.with_filter(LevelFilter::from_level(
					if config.environment == RunningEnvironment::Development {
						Level::TRACE
					} else {
						Level::DEBUG
					},
				)),
		),
	))
	.expect("Failed to set global default subscriber");
}
