use thiserror::Error;

/// Error depicting errors that occur while loading the configuration
///
#[derive(Error, Debug)]
#[error("ConfigError: {0}")]
pub struct ConfigError(pub String);
impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self { ConfigError(e.to_string()) }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self { ConfigError(e.to_string()) }
}
impl From<&str> for ConfigError {
    fn from(e: &str) -> Self { ConfigError(e.to_string()) }
}

/// Error depicting errors that occur while setting up logging
///
#[derive(Error, Debug)]
#[error("LoggingError: {0}")]
pub struct LoggingError(pub String);
impl From<std::io::Error> for LoggingError {
    fn from(e: std::io::Error) -> Self { LoggingError(e.to_string()) }
}
impl From<log4rs::config::runtime::ConfigErrors> for LoggingError {
    fn from(e: log4rs::config::runtime::ConfigErrors) -> Self { LoggingError(e.to_string()) }
}
impl From<log::SetLoggerError> for LoggingError {
    fn from(e: log::SetLoggerError) -> Self { LoggingError(e.to_string()) }
}

/// Errors from turning raw input into a forecast request
///
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is not a number: '{value}'")]
    NotNumeric { field: &'static str, value: String },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange { field: &'static str, value: f64, min: f64, max: f64 },
    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum { field: &'static str, value: f64, min: f64 },
    #[error("hour must be an integer 0-23, got '{0}'")]
    InvalidHour(String),
    #[error("date must be formatted YYYY-MM-DD, got '{0}'")]
    InvalidDate(String),
    #[error("unknown model '{0}', expected one of ridge, rf, lstm")]
    UnknownModel(String),
    #[error("please upload a CSV file, got '{0}'")]
    InvalidFileType(String),
}

/// Errors reported by the prediction service
///
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("a prediction is already running")]
    Busy,
    #[error("prediction was cancelled")]
    Cancelled,
    #[error("prediction failed: there was an error generating the forecast")]
    Failed,
}

/// Errors from batch processing of CSV files
///
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("BatchError::Pattern: {0}")]
    Pattern(String),
    #[error("BatchError::NoFiles: no files match '{0}'")]
    NoFiles(String),
    #[error("BatchError::Validation: {0}")]
    Validation(#[from] ValidationError),
    #[error("BatchError::Csv: {0}")]
    Csv(String),
    #[error("BatchError::Io: {0}")]
    Io(String),
    #[error("BatchError::Prediction: {0}")]
    Prediction(#[from] PredictionError),
}
impl From<glob::PatternError> for BatchError {
    fn from(e: glob::PatternError) -> Self { BatchError::Pattern(e.to_string()) }
}
impl From<glob::GlobError> for BatchError {
    fn from(e: glob::GlobError) -> Self { BatchError::Pattern(e.to_string()) }
}
impl From<csv::Error> for BatchError {
    fn from(e: csv::Error) -> Self { BatchError::Csv(e.to_string()) }
}
