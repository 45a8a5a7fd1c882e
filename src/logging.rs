use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr log subscriber for the CLI.
///
/// `RUST_LOG` takes precedence when set. Otherwise `verbosity` picks the
/// level: 0 is warn, 1 is info, anything higher is debug.
pub fn init_logging(verbosity: u8) {
	let default_level = match verbosity {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	// A second init (e.g. in tests) keeps the first subscriber
	let _ = tracing_subscriber::registry()
		.with(env_filter)
		.with(
			fmt::layer()
				.with_writer(std::io::stderr)
				.with_target(false),
		)
		.try_init();
}
