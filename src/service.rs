use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use log::{debug, error, info};
use tokio_util::sync::CancellationToken;
use crate::config::Config;
use crate::errors::PredictionError;
use crate::generator::DemandGenerator;
use crate::models::forecast_request::ForecastRequest;
use crate::models::forecast_series::{ForecastSeries, Prediction};
use crate::noise::{NoiseSource, SeededNoise};

/// Anything that can turn a forecast request into a demand series
pub trait Forecaster: Send + Sync {
    fn forecast(&self, request: &ForecastRequest, noise: &mut dyn NoiseSource) -> ForecastSeries;
}

impl Forecaster for DemandGenerator {
    fn forecast(&self, request: &ForecastRequest, noise: &mut dyn NoiseSource) -> ForecastSeries {
        self.generate(request, noise)
    }
}

/// Runs forecasts behind a simulated remote call
///
/// The call waits the configured latency before the forecaster runs, can be cancelled
/// while waiting, and reports any failure in the forecaster as a generic failure.
pub struct PredictionService<F: Forecaster = DemandGenerator> {
    forecaster: F,
    noise: Mutex<Box<dyn NoiseSource + Send>>,
    latency: Duration,
}

impl PredictionService<DemandGenerator> {
    /// Returns a service using the demand generator from configuration
    ///
    /// # Arguments
    ///
    /// * 'config' - configuration struct
    pub fn from_config(config: &Config) -> PredictionService<DemandGenerator> {
        PredictionService::new(
            DemandGenerator::new(&config.generator),
            Box::new(SeededNoise::new(config.generator.seed)),
            Duration::from_millis(config.service.latency_ms),
        )
    }
}

impl<F: Forecaster> PredictionService<F> {
    /// # Arguments
    ///
    /// * 'forecaster' - the forecaster to run
    /// * 'noise' - noise source handed to the forecaster
    /// * 'latency' - simulated network latency
    pub fn new(forecaster: F, noise: Box<dyn NoiseSource + Send>, latency: Duration) -> PredictionService<F> {
        PredictionService { forecaster, noise: Mutex::new(noise), latency }
    }

    /// Waits the simulated latency and then runs the forecast
    ///
    /// # Arguments
    ///
    /// * 'request' - validated forecast request
    /// * 'cancel' - token that aborts the call while waiting
    pub async fn predict(&self, request: ForecastRequest, cancel: &CancellationToken) -> Result<Prediction, PredictionError> {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Prediction cancelled: {}", request);
                return Err(PredictionError::Cancelled);
            }
            _ = tokio::time::sleep(self.latency) => {}
        }

        let series = self.run(&request)?;
        info!("Generated 24-hour forecast using {} model", request.model.code().to_uppercase());

        Ok(Prediction { request, series })
    }

    /// Runs the forecaster without any latency, catching panics
    ///
    /// # Arguments
    ///
    /// * 'request' - validated forecast request
    pub fn run(&self, request: &ForecastRequest) -> Result<ForecastSeries, PredictionError> {
        let mut noise = self.noise.lock().map_err(|_| PredictionError::Failed)?;

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.forecaster.forecast(request, noise.as_mut())
        }));

        match result {
            Ok(series) if series.values().iter().all(|v| v.is_finite() && *v >= 0.0) => Ok(series),
            Ok(_) => {
                error!("Forecaster returned invalid values for {}", request);
                Err(PredictionError::Failed)
            }
            Err(_) => {
                error!("Forecaster panicked for {}", request);
                Err(PredictionError::Failed)
            }
        }
    }
}

/// Clears the in flight flag however the submission ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// One client's view of the prediction service
///
/// Only one submission can be in flight at a time. Results are published to the
/// display state only when their ticket is the latest one issued.
pub struct PredictionSession<F: Forecaster = DemandGenerator> {
    service: PredictionService<F>,
    in_flight: AtomicBool,
    latest_ticket: AtomicU64,
    cancel: Mutex<Option<CancellationToken>>,
    current: Mutex<Option<Prediction>>,
}

impl<F: Forecaster> PredictionSession<F> {
    /// # Arguments
    ///
    /// * 'service' - the prediction service to submit to
    pub fn new(service: PredictionService<F>) -> PredictionSession<F> {
        PredictionSession {
            service,
            in_flight: AtomicBool::new(false),
            latest_ticket: AtomicU64::new(0),
            cancel: Mutex::new(None),
            current: Mutex::new(None),
        }
    }

    /// Submits a request, rejecting it if another one is still running
    ///
    /// # Arguments
    ///
    /// * 'request' - validated forecast request
    pub async fn submit(&self, request: ForecastRequest) -> Result<Prediction, PredictionError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(PredictionError::Busy);
        }
        let _guard = InFlight(&self.in_flight);

        let ticket = self.issue_ticket();
        let token = CancellationToken::new();
        if let Ok(mut cancel) = self.cancel.lock() {
            *cancel = Some(token.clone());
        }

        let prediction = self.service.predict(request, &token).await?;
        self.publish(ticket, prediction.clone());

        Ok(prediction)
    }

    /// True while a submission is running
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Cancels the running submission, if any
    pub fn cancel(&self) {
        if let Ok(cancel) = self.cancel.lock() {
            if let Some(token) = cancel.as_ref() {
                token.cancel();
            }
        }
    }

    /// Issues a new ticket, making every earlier ticket stale
    pub fn issue_ticket(&self) -> u64 {
        self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publishes a prediction to the display state if its ticket is still the latest.
    /// Returns whether the prediction was published.
    ///
    /// # Arguments
    ///
    /// * 'ticket' - ticket issued when the request was submitted
    /// * 'prediction' - the finished prediction
    pub fn publish(&self, ticket: u64, prediction: Prediction) -> bool {
        if ticket != self.latest_ticket.load(Ordering::SeqCst) {
            debug!("Discarding stale prediction with ticket {}", ticket);
            return false;
        }

        match self.current.lock() {
            Ok(mut current) => {
                *current = Some(prediction);
                true
            }
            Err(_) => false,
        }
    }

    /// The prediction currently on display
    pub fn current(&self) -> Option<Prediction> {
        self.current.lock().ok().and_then(|c| c.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use chrono::NaiveDate;
    use crate::config::GeneratorParameters;
    use crate::models::forecast_request::Model;
    use crate::noise::FixedNoise;

    struct Panicking;

    impl Forecaster for Panicking {
        fn forecast(&self, _: &ForecastRequest, _: &mut dyn NoiseSource) -> ForecastSeries {
            panic!("model backend unavailable")
        }
    }

    struct NotANumber;

    impl Forecaster for NotANumber {
        fn forecast(&self, request: &ForecastRequest, _: &mut dyn NoiseSource) -> ForecastSeries {
            ForecastSeries::new(request.hour, [f64::NAN; 24])
        }
    }

    fn request(hour: u8) -> ForecastRequest {
        ForecastRequest {
            temperature: 28.0,
            humidity: 75.0,
            rainfall: 0.0,
            wind_speed: 12.0,
            date: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap(),
            hour,
            model: Model::Ridge,
        }
    }

    fn service(latency_ms: u64) -> PredictionService {
        PredictionService::new(
            DemandGenerator::new(&GeneratorParameters::default()),
            Box::new(FixedNoise::silent()),
            Duration::from_millis(latency_ms),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn predict_waits_and_returns_full_series() {
        let svc = service(1500);
        let prediction = svc.predict(request(0), &CancellationToken::new()).await.unwrap();
        assert_eq!(prediction.series.values().len(), 24);
        assert_eq!(prediction.series.values()[0], 898.0);
        assert_eq!(prediction.request, request(0));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_before_latency_elapses() {
        let svc = service(1500);
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(svc.predict(request(0), &token).await, Err(PredictionError::Cancelled));
    }

    #[tokio::test]
    async fn panicking_forecaster_reports_failure() {
        let svc = PredictionService::new(Panicking, Box::new(FixedNoise::silent()), Duration::ZERO);
        assert_eq!(svc.predict(request(0), &CancellationToken::new()).await, Err(PredictionError::Failed));
    }

    #[test]
    fn invalid_series_reports_failure() {
        let svc = PredictionService::new(NotANumber, Box::new(FixedNoise::silent()), Duration::ZERO);
        assert_eq!(svc.run(&request(0)), Err(PredictionError::Failed));
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_submission_is_rejected() {
        let session = Arc::new(PredictionSession::new(service(1500)));

        let first = {
            let session = session.clone();
            tokio::spawn(async move { session.submit(request(0)).await })
        };
        tokio::task::yield_now().await;
        assert!(session.is_busy());
        assert_eq!(session.submit(request(5)).await, Err(PredictionError::Busy));

        let prediction = first.await.unwrap().unwrap();
        assert!(!session.is_busy());
        assert_eq!(session.current(), Some(prediction));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_aborts_running_submission() {
        let session = Arc::new(PredictionSession::new(service(1500)));

        let running = {
            let session = session.clone();
            tokio::spawn(async move { session.submit(request(0)).await })
        };
        tokio::task::yield_now().await;
        session.cancel();

        assert_eq!(running.await.unwrap(), Err(PredictionError::Cancelled));
        assert!(!session.is_busy());
        assert_eq!(session.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_reaches_submission_polled_in_the_same_task() {
        let session = PredictionSession::new(service(1500));

        let submission = session.submit(request(0));
        tokio::pin!(submission);
        let result = tokio::select! {
            r = &mut submission => r,
            _ = tokio::time::sleep(Duration::from_millis(100)) => {
                session.cancel();
                submission.await
            }
        };

        assert_eq!(result, Err(PredictionError::Cancelled));
        assert!(!session.is_busy());
        assert_eq!(session.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn finished_submission_is_on_display() {
        let session = PredictionSession::new(service(1500));
        let prediction = session.submit(request(3)).await.unwrap();
        assert_eq!(session.current(), Some(prediction));
    }

    #[test]
    fn stale_results_are_discarded() {
        let session = PredictionSession::new(service(0));
        let svc = service(0);
        let old = Prediction { request: request(1), series: svc.run(&request(1)).unwrap() };
        let new = Prediction { request: request(2), series: svc.run(&request(2)).unwrap() };

        let first = session.issue_ticket();
        let second = session.issue_ticket();

        assert!(session.publish(second, new.clone()));
        assert!(!session.publish(first, old));
        assert_eq!(session.current(), Some(new));
    }
}
