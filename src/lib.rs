pub mod analytics;
pub mod batch;
pub mod config;
pub mod errors;
pub mod generator;
pub mod logging;
pub mod models;
pub mod noise;
pub mod report;
pub mod service;
pub mod validation;
