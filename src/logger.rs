use log::LevelFilter;
use env_logger::Builder;
use std::io::Write;
use std::str::FromStr;
use chrono::Local;

/// Modules whose records follow the configured level. Everything else,
/// the HTTP and HTML stacks included, is held at [`DEPENDENCY_LEVEL`].
const OWN_MODULES: [&str; 2] = ["harvester_lib", "keyword_harvester"];

const DEPENDENCY_LEVEL: LevelFilter = LevelFilter::Warn;

/// Installs the global logger at info level. The level of this crate's own
/// modules can be changed afterwards with [`set_level`] once the
/// configuration is known.
pub fn init() {
    let mut builder = Builder::new();
    builder.filter(None, DEPENDENCY_LEVEL);
    for module in OWN_MODULES {
        builder.filter(Some(module), LevelFilter::Trace);
    }

    let installed = builder
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .try_init()
        .is_ok();

    // Own modules pass the builder at any level; this caps them
    log::set_max_level(LevelFilter::Info);

    if installed {
        log::info!("Logger initialized.");
    }
}

/// Applies a level name such as "warn" or "debug". Unknown names keep the
/// current level.
pub fn set_level(level: &str) {
    match LevelFilter::from_str(level) {
        Ok(filter) => log::set_max_level(filter),
        Err(_) => log::warn!("Unknown log level '{}', keeping {}.", level, log::max_level()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Metadata};

    fn metadata(level: Level, target: &str) -> Metadata<'_> {
        Metadata::builder().level(level).target(target).build()
    }

    // One test: the max level is process-global
    #[test]
    fn test_levels_apply_to_own_modules_only() {
        init();

        set_level("debug");
        assert_eq!(log::max_level(), LevelFilter::Debug);
        set_level("loud");
        assert_eq!(log::max_level(), LevelFilter::Debug);

        assert!(log::logger().enabled(&metadata(Level::Debug, "harvester_lib::harvester")));
        assert!(!log::logger().enabled(&metadata(Level::Debug, "reqwest::connect")));
        assert!(!log::logger().enabled(&metadata(Level::Info, "html5ever::tree_builder")));
        assert!(log::logger().enabled(&metadata(Level::Warn, "html5ever::tree_builder")));

        set_level("INFO");
        assert_eq!(log::max_level(), LevelFilter::Info);
    }
}
