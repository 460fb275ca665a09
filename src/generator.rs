use std::f64::consts::PI;
use crate::config::GeneratorParameters;
use crate::models::forecast_request::ForecastRequest;
use crate::models::forecast_series::{ForecastSeries, SERIES_LEN};
use crate::noise::NoiseSource;

/// Struct for generating hourly demand given weather parameters
///
/// The business logic is a daily sinusoid around a base load, shifted by linear
/// temperature and humidity effects and scaled by a per model factor. Rainfall and
/// wind speed are not part of the calculation.
pub struct DemandGenerator {
    params: GeneratorParameters,
}

impl DemandGenerator {
    /// Returns a new DemandGenerator
    ///
    /// # Arguments
    ///
    /// * 'params' - generator constants from configuration
    pub fn new(params: &GeneratorParameters) -> DemandGenerator {
        DemandGenerator { params: params.clone() }
    }

    /// Generates a 24-hour demand series starting at the request's hour
    ///
    /// Each slot gets its own noise sample. The result is rounded to whole MW and never
    /// goes below the configured floor.
    ///
    /// # Arguments
    ///
    /// * 'request' - the forecast parameters
    /// * 'noise' - noise source
    pub fn generate<N: NoiseSource + ?Sized>(&self, request: &ForecastRequest, noise: &mut N) -> ForecastSeries {
        let weather_effect = self.weather_effect(request);
        let multiplier = request.model.multiplier(&self.params.multipliers);

        let mut values = [0.0; SERIES_LEN];
        for (i, v) in values.iter_mut().enumerate() {
            let hour = ((request.hour as usize + i) % SERIES_LEN) as u8;
            let n = noise.symmetric(self.params.noise_amplitude);
            let demand = (self.daily_pattern(hour) + weather_effect + n) * multiplier;
            *v = demand.round().max(self.params.floor);
        }

        ForecastSeries::new(request.hour, values)
    }

    /// Baseline demand for an hour of day
    ///
    /// # Arguments
    ///
    /// * 'hour' - hour of day
    pub fn daily_pattern(&self, hour: u8) -> f64 {
        self.params.base_load + (hour as f64 * PI / 12.0).sin() * self.params.daily_swing
    }

    /// Combined temperature and humidity adjustment, the same for every slot
    ///
    /// # Arguments
    ///
    /// * 'request' - the forecast parameters
    pub fn weather_effect(&self, request: &ForecastRequest) -> f64 {
        let temp_effect = (request.temperature - self.params.reference_temperature) * self.params.temperature_coefficient;
        let humidity_effect = (request.humidity - self.params.reference_humidity) * self.params.humidity_coefficient;

        temp_effect + humidity_effect
    }
}
