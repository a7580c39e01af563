// SASEUL Pool Miner - Free and Open Source Software Statement
//
// This project, saseul-pool-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/utils/logging.rs
// Version: 1.0.0
//
// This file initializes log4rs, either from a YAML file (see
// log4rs_sample.yml) or with a console appender.

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

pub const CONSOLE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] {m}{n}";

/// Initialize the global logger
pub fn init_logging(config_file: Option<&Path>) -> anyhow::Result<()> {
    match config_file {
        Some(path) => {
            log4rs::init_file(path, Default::default())
                .map_err(|e| anyhow::anyhow!("Cannot load log config {:?}: {}", path, e))?;
        }
        None => {
            log4rs::init_config(console_config()?)?;
        }
    }
    Ok(())
}

fn console_config() -> anyhow::Result<Config> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_config_builds() {
        assert!(console_config().is_ok());
    }
}

// Changelog:
// - v1.0.0: log4rs initialization with a console fallback.
