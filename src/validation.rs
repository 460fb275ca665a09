use std::path::Path;
use chrono::NaiveDate;
use serde::Deserialize;
use crate::config::ValidationParameters;
use crate::errors::ValidationError;
use crate::models::forecast_request::{ForecastRequest, Model};

/// Unvalidated forecast parameters as entered by the user or read from a CSV row
#[derive(Deserialize, Clone, Debug, Default)]
pub struct RawForecastInput {
    pub temperature: String,
    pub humidity: String,
    pub rainfall: String,
    #[serde(alias = "windSpeed")]
    pub wind_speed: String,
    pub date: String,
    pub hour: String,
    pub model: String,
}

/// Validates raw input and returns a forecast request ready for the generator
///
/// # Arguments
///
/// * 'raw' - raw input values
/// * 'bounds' - accepted ranges for temperature and humidity
pub fn validate(raw: &RawForecastInput, bounds: &ValidationParameters) -> Result<ForecastRequest, ValidationError> {
    let temperature = parse_number("temperature", &raw.temperature)?;
    check_range("temperature", temperature, bounds.min_temperature, bounds.max_temperature)?;

    let humidity = parse_number("humidity", &raw.humidity)?;
    check_range("humidity", humidity, bounds.min_humidity, bounds.max_humidity)?;

    let rainfall = parse_number("rainfall", &raw.rainfall)?;
    check_minimum("rainfall", rainfall, 0.0)?;

    let wind_speed = parse_number("wind speed", &raw.wind_speed)?;
    check_minimum("wind speed", wind_speed, 0.0)?;

    let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.date.clone()))?;

    let hour = raw.hour.trim().parse::<u8>()
        .ok()
        .filter(|h| *h < 24)
        .ok_or_else(|| ValidationError::InvalidHour(raw.hour.clone()))?;

    let model = raw.model.parse::<Model>()?;

    Ok(ForecastRequest { temperature, humidity, rainfall, wind_speed, date, hour, model })
}

/// Checks that an uploaded file is a CSV file
///
/// # Arguments
///
/// * 'path' - path to the file
pub fn check_file_type(path: &Path) -> Result<(), ValidationError> {
    let is_csv = path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        Ok(())
    } else {
        Err(ValidationError::InvalidFileType(path.display().to_string()))
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    value.trim().parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::NotNumeric { field, value: value.to_string() })
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if value < min || value > max {
        Err(ValidationError::OutOfRange { field, value, min, max })
    } else {
        Ok(())
    }
}

fn check_minimum(field: &'static str, value: f64, min: f64) -> Result<(), ValidationError> {
    if value < min {
        Err(ValidationError::BelowMinimum { field, value, min })
    } else {
        Ok(())
    }
}
