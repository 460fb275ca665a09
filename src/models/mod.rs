pub mod forecast_request;
pub mod forecast_series;
pub mod analytics;
