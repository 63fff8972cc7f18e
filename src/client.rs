use serde::Deserialize;
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::stress::StressClass;
use crate::vector::MeasurementVector;

/// Anything that stops a submission from producing a usable classification:
/// transport trouble, a non-success status, or a body that does not decode
/// to a known stress code. Single attempt; retrying is the caller's call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkFailure {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Decoded outcome of one inference call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub stress_class: StressClass,
    pub advice: Option<String>,
}

/// Seam between the submission pipeline and whatever produces
/// classifications. The HTTP client below is the production implementation;
/// tests substitute stubs.
#[allow(async_fn_in_trait)]
pub trait StressInference {
    async fn predict(&self, vector: &MeasurementVector) -> Result<Prediction, NetworkFailure>;
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    stress_level: u8,
    #[serde(default)]
    ai_recommendations: Option<String>,
}

/// Talks to the inference service over `POST {base_url}/predict`. Assumes the
/// vector is already schema-valid; it does not re-validate.
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPredictionClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, NetworkFailure> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| NetworkFailure::Transport(err.to_string()))?;
        Ok(HttpPredictionClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl StressInference for HttpPredictionClient {
    async fn predict(&self, vector: &MeasurementVector) -> Result<Prediction, NetworkFailure> {
        let url = format!("{}/predict", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(vector)
            .send()
            .await
            .map_err(|err| NetworkFailure::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkFailure::Status(status.as_u16()));
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|err| NetworkFailure::MalformedResponse(err.to_string()))?;

        let stress_class = StressClass::from_code(body.stress_level).ok_or(
            NetworkFailure::MalformedResponse(format!(
                "unrecognized stress code {}",
                body.stress_level
            )),
        )?;

        Ok(Prediction {
            stress_class,
            advice: body.ai_recommendations,
        })
    }
}
