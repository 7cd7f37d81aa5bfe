use clap::Arg;
use log::LevelFilter;
use simple_logger::SimpleLogger;

pub const DEFAULT_CONFIG_FILE: &str = "client_config.json";

/// The `--config` flag every demo binary understands.
pub fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("FILE")
        .default_value(DEFAULT_CONFIG_FILE)
        .help("Client .json configuration file")
}

pub fn config_path(matches: &clap::ArgMatches) -> String {
    matches
        .get_one::<String>("config")
        .cloned()
        .unwrap_or_else(|| String::from(DEFAULT_CONFIG_FILE))
}

/// `info` unless `RUST_LOG` says otherwise.
pub fn init_logger() -> Result<(), log::SetLoggerError> {
    SimpleLogger::new().with_level(LevelFilter::Info).env().init()
}
