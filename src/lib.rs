pub mod client;
pub mod config;
pub mod controller;
pub mod query;
pub mod registry;
pub mod store;
pub mod stress;
pub mod vector;

pub use client::{HttpPredictionClient, NetworkFailure, Prediction, StressInference};
pub use config::ServiceConfig;
pub use controller::{SubmissionController, SubmissionState};
pub use query::{filter_records, ClassFilter};
pub use store::{
    HistoryStore, JsonFileStore, KeyValueStore, MemoryStore, PredictionRecord, HISTORY_CAPACITY,
    HISTORY_KEY,
};
pub use stress::StressClass;
pub use vector::{MeasurementVector, ValidationError};
