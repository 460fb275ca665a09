use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use crate::config::General;
use crate::errors::LoggingError;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l:<5} {M} - {m}{n}";

/// Sets up logging according to the general configuration section.
///
/// Console logs are written to stderr when log_to_console is set, stdout only carries the
/// report. A log file is added when a log path is given.
///
/// # Arguments
///
/// * 'general' - general configuration
pub fn setup_logger(general: &General) -> Result<(), LoggingError> {
    let mut builder = log4rs::Config::builder();
    let mut root = Root::builder();

    if general.log_to_console {
        let console = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        builder = builder.appender(Appender::builder().build("console", Box::new(console)));
        root = root.appender("console");
    }

    if let Some(log_path) = &general.log_path {
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(log_path)?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file)));
        root = root.appender("file");
    }

    let config = builder.build(root.build(general.log_level))?;
    let _ = log4rs::init_config(config)?;

    Ok(())
}
