use crate::config::ClientConfig;
use crate::error::PredictError;
use crate::prediction::Prediction;
use crate::upload::SelectedFile;
use reqwest::blocking::{Client, multipart};
use serde::Deserialize;
use std::time::Duration;

/// Anything that turns an image into a prediction. The HTTP client is the
/// real implementation; tests substitute their own.
pub trait Classifier: Send + Sync {
    fn classify(&self, file: &SelectedFile) -> Result<Prediction, PredictError>;
}

/// Reply of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

pub struct PredictClient {
    http: Client,
    predict_url: String,
    health_url: String,
}

impl PredictClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self, PredictError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .user_agent(concat!("pawph/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            predict_url: cfg.predict_url(),
            health_url: cfg.health_url(),
        })
    }

    /// Sends the image as multipart field `file` and parses the reply.
    pub fn predict(&self, file: &SelectedFile) -> Result<Prediction, PredictError> {
        let mut part = multipart::Part::bytes(file.bytes.to_vec()).file_name(file.name.clone());
        if !file.media_type.is_empty() {
            part = part.mime_str(&file.media_type)?;
        }
        let form = multipart::Form::new().part("file", part);

        tracing::info!(
            "POST {} ({}, {} bytes)",
            self.predict_url,
            file.name,
            file.size()
        );
        let resp = self.http.post(&self.predict_url).multipart(form).send()?;
        let status = resp.status();
        let body = resp.bytes()?;
        if !status.is_success() {
            tracing::warn!("Prediction failed with {status}");
            return Err(PredictError::from_response(status.as_u16(), &body));
        }
        let prediction: Prediction = serde_json::from_slice(&body)?;
        tracing::info!(
            "Predicted {} (pH {:.1}, confidence {:.3})",
            prediction.ph_class,
            prediction.ph_value,
            prediction.confidence
        );
        Ok(prediction)
    }

    pub fn health(&self) -> Result<HealthStatus, PredictError> {
        let resp = self.http.get(&self.health_url).send()?;
        let status = resp.status();
        let body = resp.bytes()?;
        if !status.is_success() {
            return Err(PredictError::from_response(status.as_u16(), &body));
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

impl Classifier for PredictClient {
    fn classify(&self, file: &SelectedFile) -> Result<Prediction, PredictError> {
        self.predict(file)
    }
}
