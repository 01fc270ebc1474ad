use log::LevelFilter;

/// Warnings and above on stderr; `RUST_LOG` overrides.
pub fn init() {
	env_logger::Builder::new()
		.filter_level(LevelFilter::Warn)
		.parse_default_env()
		.target(env_logger::Target::Stderr)
		.format_timestamp(None)
		.init();
}
