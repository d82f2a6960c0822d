use crate::config::{Config, RustEnv};
use log::LevelFilter;
use simplelog::{self, ColorChoice, ConfigBuilder, TerminalMode};

/// Dependency modules whose output is hidden unless running at Trace level.
const FILTERED_MODULES: &[&str] = &["sqlx", "sea_orm", "tower", "hyper", "axum", "reqwest"];

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger for the process.
    ///
    /// Dependency chatter is suppressed below Trace. Colors are disabled in
    /// production so log shippers receive plain text.
    pub fn init_logger(config: &Config) {
        let log_config = Self::build_log_config(config.log_level_filter != LevelFilter::Trace);

        simplelog::TermLogger::init(
            Self::convert_level_filter(config.log_level_filter),
            log_config,
            TerminalMode::Mixed,
            Self::color_choice(&config.runtime_env),
        )
        .expect("Failed to start simplelog");
    }

    fn convert_level_filter(level: LevelFilter) -> simplelog::LevelFilter {
        match level {
            LevelFilter::Off => simplelog::LevelFilter::Off,
            LevelFilter::Error => simplelog::LevelFilter::Error,
            LevelFilter::Warn => simplelog::LevelFilter::Warn,
            LevelFilter::Info => simplelog::LevelFilter::Info,
            LevelFilter::Debug => simplelog::LevelFilter::Debug,
            LevelFilter::Trace => simplelog::LevelFilter::Trace,
        }
    }

    fn color_choice(env: &RustEnv) -> ColorChoice {
        match env {
            RustEnv::Production => ColorChoice::Never,
            RustEnv::Development | RustEnv::Staging => ColorChoice::Auto,
        }
    }

    fn build_log_config(filter_dependencies: bool) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if filter_dependencies {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}
