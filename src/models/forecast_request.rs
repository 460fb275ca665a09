use std::fmt;
use std::str::FromStr;
use chrono::NaiveDate;
use serde::Serialize;
use crate::config::ModelMultipliers;
use crate::errors::ValidationError;

/// Available forecasting model variants
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    Ridge,
    #[serde(rename = "rf")]
    RandomForest,
    #[default]
    #[serde(rename = "lstm")]
    LstmHybrid,
}

impl Model {
    pub const ALL: [Model; 3] = [Model::Ridge, Model::RandomForest, Model::LstmHybrid];

    /// Short identifier as accepted on input
    pub fn code(&self) -> &'static str {
        match self {
            Model::Ridge => "ridge",
            Model::RandomForest => "rf",
            Model::LstmHybrid => "lstm",
        }
    }

    /// Human readable model name
    pub fn display_name(&self) -> &'static str {
        match self {
            Model::Ridge => "Ridge Regression",
            Model::RandomForest => "Random Forest",
            Model::LstmHybrid => "LSTM Hybrid",
        }
    }

    /// Returns the output scalar configured for this model
    ///
    /// # Arguments
    ///
    /// * 'multipliers' - configured multipliers
    pub fn multiplier(&self, multipliers: &ModelMultipliers) -> f64 {
        match self {
            Model::Ridge => multipliers.ridge,
            Model::RandomForest => multipliers.random_forest,
            Model::LstmHybrid => multipliers.lstm_hybrid,
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Model {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ridge" => Ok(Model::Ridge),
            "rf" | "random-forest" | "random_forest" => Ok(Model::RandomForest),
            "lstm" | "lstm-hybrid" | "lstm_hybrid" => Ok(Model::LstmHybrid),
            _ => Err(ValidationError::UnknownModel(s.to_string())),
        }
    }
}

/// Parameters for one forecast run.
///
/// Rainfall and wind speed are carried along for display only, they don't affect
/// the generated series.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ForecastRequest {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub wind_speed: f64,
    pub date: NaiveDate,
    pub hour: u8,
    pub model: Model,
}

impl fmt::Display for ForecastRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {:0>2}:00 {}: temp {:.1}°C, humidity {:.0}%, rainfall {:.1} mm, wind {:.1} km/h",
               self.date, self.hour, self.model.code().to_uppercase(),
               self.temperature, self.humidity, self.rainfall, self.wind_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ridge", Model::Ridge)]
    #[case("RF", Model::RandomForest)]
    #[case("random-forest", Model::RandomForest)]
    #[case(" lstm ", Model::LstmHybrid)]
    #[case("lstm-hybrid", Model::LstmHybrid)]
    fn model_parses(#[case] input: &str, #[case] expected: Model) {
        assert_eq!(input.parse::<Model>().unwrap(), expected);
    }

    #[test]
    fn unknown_model_is_rejected() {
        assert_eq!("arima".parse::<Model>(), Err(ValidationError::UnknownModel("arima".to_string())));
    }

    #[test]
    fn multiplier_follows_config() {
        let m = ModelMultipliers::default();
        assert_eq!(Model::Ridge.multiplier(&m), 0.95);
        assert_eq!(Model::RandomForest.multiplier(&m), 1.05);
        assert_eq!(Model::LstmHybrid.multiplier(&m), 1.02);
    }

    #[test]
    fn model_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Model::RandomForest).unwrap(), "\"rf\"");
        assert_eq!(serde_json::to_string(&Model::Ridge).unwrap(), "\"ridge\"");
    }
}
