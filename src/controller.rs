use std::collections::BTreeMap;

use chrono::Local;
use tracing::{debug, warn};

use crate::client::StressInference;
use crate::store::{HistoryStore, KeyValueStore, PredictionRecord};
use crate::stress::StressClass;
use crate::vector::MeasurementVector;

/// Submission lifecycle. One submission at a time; `Submitting` re-arms to
/// `Idle` on the next submit or an explicit [`SubmissionController::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Success {
        result: StressClass,
        advice: Option<String>,
    },
    Failed {
        message: String,
    },
}

/// Drives one submission end to end: validate against the registry, call the
/// inference seam, and commit the record to history only on success. Sole
/// writer of the history log during a submission.
pub struct SubmissionController<C: StressInference, S: KeyValueStore> {
    client: C,
    history: HistoryStore<S>,
    state: SubmissionState,
}

impl<C: StressInference, S: KeyValueStore> SubmissionController<C, S> {
    pub fn new(client: C, history: HistoryStore<S>) -> Self {
        SubmissionController {
            client,
            history,
            state: SubmissionState::Idle,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    /// Deletion and clear are user-triggered actions outside the submission
    /// lifecycle; they go through the store directly.
    pub fn history_mut(&mut self) -> &mut HistoryStore<S> {
        &mut self.history
    }

    /// Run one submission. A call while a submission is in flight is a
    /// no-op that leaves the current state untouched. Validation failures
    /// never reach the network; network failures never touch history.
    pub async fn submit(&mut self, values: BTreeMap<String, u32>) -> &SubmissionState {
        if self.state == SubmissionState::Submitting {
            debug!("submit ignored: already submitting");
            return &self.state;
        }
        self.state = SubmissionState::Submitting;

        let vector = match MeasurementVector::new(values) {
            Ok(vector) => vector,
            Err(err) => {
                warn!(%err, "submission rejected before network call");
                self.state = SubmissionState::Failed {
                    message: err.to_string(),
                };
                return &self.state;
            }
        };

        match self.client.predict(&vector).await {
            Ok(prediction) => {
                let record = PredictionRecord {
                    inputs: vector,
                    result: prediction.stress_class,
                    advice: prediction.advice.clone(),
                    date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                };
                self.history.append(record);
                debug!(result = %prediction.stress_class, "submission succeeded");
                self.state = SubmissionState::Success {
                    result: prediction.stress_class,
                    advice: prediction.advice,
                };
            }
            Err(err) => {
                warn!(%err, "prediction call failed");
                self.state = SubmissionState::Failed {
                    message: err.to_string(),
                };
            }
        }
        &self.state
    }

    /// Back to `Idle`, clearing any previous result. History is untouched.
    pub fn reset(&mut self) {
        self.state = SubmissionState::Idle;
    }
}
