use std::fs;
use std::path::Path;
use log::LevelFilter;
use serde::Deserialize;
use crate::errors::ConfigError;

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct General {
    pub log_path: Option<String>,
    pub log_level: LevelFilter,
    pub log_to_console: bool,
}

impl Default for General {
    fn default() -> Self {
        Self { log_path: None, log_level: LevelFilter::Info, log_to_console: true }
    }
}

/// Output scalars, one per model variant
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ModelMultipliers {
    pub ridge: f64,
    pub random_forest: f64,
    pub lstm_hybrid: f64,
}

impl Default for ModelMultipliers {
    fn default() -> Self {
        Self { ridge: 0.95, random_forest: 1.05, lstm_hybrid: 1.02 }
    }
}

/// Constants used by the demand generator
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GeneratorParameters {
    pub base_load: f64,
    pub daily_swing: f64,
    pub reference_temperature: f64,
    pub temperature_coefficient: f64,
    pub reference_humidity: f64,
    pub humidity_coefficient: f64,
    pub noise_amplitude: f64,
    pub floor: f64,
    pub seed: Option<u64>,
    pub multipliers: ModelMultipliers,
}

impl Default for GeneratorParameters {
    fn default() -> Self {
        Self {
            base_load: 850.0,
            daily_swing: 200.0,
            reference_temperature: 25.0,
            temperature_coefficient: 15.0,
            reference_humidity: 50.0,
            humidity_coefficient: 2.0,
            noise_amplitude: 25.0,
            floor: 400.0,
            seed: None,
            multipliers: ModelMultipliers::default(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServiceParameters {
    /// Simulated network latency before a prediction completes
    pub latency_ms: u64,
}

impl Default for ServiceParameters {
    fn default() -> Self {
        Self { latency_ms: 1500 }
    }
}

/// Accepted input ranges
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ValidationParameters {
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub min_humidity: f64,
    pub max_humidity: f64,
}

impl Default for ValidationParameters {
    fn default() -> Self {
        Self { min_temperature: 0.0, max_temperature: 50.0, min_humidity: 0.0, max_humidity: 100.0 }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub generator: GeneratorParameters,
    pub service: ServiceParameters,
    pub validation: ValidationParameters,
}

/// Loads the configuration file and returns a struct with all configuration items.
/// A missing file gives the built-in defaults, any section or item left out of the
/// file also falls back to its default.
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let path = Path::new(config_path);
    if !path.exists() {
        return Ok(Config::default());
    }

    let toml = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&toml)?;
    check_config(&config)?;

    Ok(config)
}

/// Rejects configurations the generator or validation can't work with
///
/// # Arguments
///
/// * 'config' - the configuration to check
fn check_config(config: &Config) -> Result<(), ConfigError> {
    let g = &config.generator;
    let finite = [
        ("generator.base_load", g.base_load),
        ("generator.daily_swing", g.daily_swing),
        ("generator.reference_temperature", g.reference_temperature),
        ("generator.temperature_coefficient", g.temperature_coefficient),
        ("generator.reference_humidity", g.reference_humidity),
        ("generator.humidity_coefficient", g.humidity_coefficient),
        ("validation.min_temperature", config.validation.min_temperature),
        ("validation.max_temperature", config.validation.max_temperature),
        ("validation.min_humidity", config.validation.min_humidity),
        ("validation.max_humidity", config.validation.max_humidity),
    ];
    for (name, value) in finite {
        if !value.is_finite() {
            return Err(ConfigError(format!("{} must be a finite number", name)));
        }
    }

    if !(g.noise_amplitude.is_finite() && g.noise_amplitude >= 0.0) {
        return Err(ConfigError::from("generator.noise_amplitude must be a finite, non negative number"));
    }
    if !(g.floor.is_finite() && g.floor >= 0.0) {
        return Err(ConfigError::from("generator.floor must be a finite, non negative number"));
    }
    let m = &g.multipliers;
    if ![m.ridge, m.random_forest, m.lstm_hybrid].iter().all(|v| v.is_finite() && *v > 0.0) {
        return Err(ConfigError::from("generator.multipliers must be finite and positive"));
    }

    let v = &config.validation;
    if v.min_temperature > v.max_temperature || v.min_humidity > v.max_humidity {
        return Err(ConfigError::from("validation ranges must have min <= max"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn missing_file_gives_defaults() {
        let config = load_config("/nonexistent/demandcast.toml").unwrap();
        assert_eq!(config.generator, GeneratorParameters::default());
        assert_eq!(config.service.latency_ms, 1500);
        assert_eq!(config.general.log_level, LevelFilter::Info);
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let toml = r#"
            [general]
            log_level = "Debug"

            [generator]
            seed = 7
            noise_amplitude = 0.0

            [generator.multipliers]
            ridge = 0.9
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.general.log_level, LevelFilter::Debug);
        assert_eq!(config.generator.seed, Some(7));
        assert_eq!(config.generator.noise_amplitude, 0.0);
        assert_eq!(config.generator.base_load, 850.0);
        assert_eq!(config.generator.multipliers.ridge, 0.9);
        assert_eq!(config.generator.multipliers.random_forest, 1.05);
        assert_eq!(config.validation, ValidationParameters::default());
    }

    #[test]
    fn load_config_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[service]\nlatency_ms = 10\n").unwrap();

        let config = load_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.service.latency_ms, 10);
    }

    #[test]
    fn negative_multiplier_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[generator.multipliers]\nlstm_hybrid = -1.0\n").unwrap();

        assert!(load_config(path.to_str().unwrap()).is_err());
    }

    #[rstest]
    #[case("[generator.multipliers]\nridge = nan\n")]
    #[case("[generator.multipliers]\nrandom_forest = inf\n")]
    #[case("[generator]\nnoise_amplitude = nan\n")]
    #[case("[generator]\nfloor = nan\n")]
    #[case("[generator]\ntemperature_coefficient = inf\n")]
    #[case("[validation]\nmax_humidity = nan\n")]
    fn non_finite_values_are_rejected(#[case] toml: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, toml).unwrap();

        assert!(load_config(path.to_str().unwrap()).is_err());
    }
}
