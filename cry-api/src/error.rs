//! Error types for cry-api
//!
//! Every request failure is terminal for that request and is reported as
//! a flat JSON body: `{"error": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use cry_core::ClassifyError;

use crate::audio::DecodeError;

/// Request-level error taxonomy for `POST /classify`
#[derive(Debug, Error)]
pub enum ApiError {
    /// No multipart part named `file` carrying a filename (400)
    #[error("Please upload an audio file using the 'file' field.")]
    MissingFile,

    /// `file` part present but its filename is empty (400)
    #[error("Empty filename provided.")]
    EmptyFilename,

    /// Uploaded bytes could not be decoded as audio (400)
    #[error("Unable to read audio: {0}")]
    UndecodableAudio(#[from] DecodeError),

    /// Decoding succeeded but produced no samples (400)
    #[error("The uploaded file contains no audio samples.")]
    EmptyAudio,

    /// Decoded samples rejected by the classifier (400)
    #[error("Unable to classify audio: {0}")]
    Unclassifiable(ClassifyError),

    /// Upload exceeded the configured body limit (413)
    #[error("Uploaded file exceeds the {0} byte limit.")]
    PayloadTooLarge(usize),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFile
            | ApiError::EmptyFilename
            | ApiError::UndecodableAudio(_)
            | ApiError::EmptyAudio
            | ApiError::Unclassifiable(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Classification request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Classification request rejected");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ClassifyError> for ApiError {
    fn from(err: ClassifyError) -> Self {
        match err {
            ClassifyError::EmptySignal => ApiError::EmptyAudio,
            ClassifyError::Fft(detail) => ApiError::Internal(detail),
            other => ApiError::Unclassifiable(other),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
