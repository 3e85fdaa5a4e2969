//! Core of the Paw pH client: file validation, the classification request,
//! result formatting and the upload controller. Nothing here touches a window,
//! so every rule can be tested headless.

pub mod advice;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod prediction;
pub mod upload;

pub use client::{Classifier, HealthStatus, PredictClient};
pub use config::{ClientConfig, LanguagePreference};
pub use controller::UploadController;
pub use error::{Failure, PredictError, UploadError};
pub use prediction::{Prediction, RankedClass};
pub use upload::{FileSource, MAX_UPLOAD_SIZE, PreviewImage, SelectedFile};
